// Cooperative cancellation for long-running proposals.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::ProposalError;

/// A cloneable cancellation flag. Every clone observes the same state, so the
/// caller can keep one handle and pass another into a proposal running on a
/// different thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Return `Err(ProposalError::Cancelled)` once cancellation was requested.
    pub fn check(&self) -> Result<(), ProposalError> {
        if self.is_cancelled() {
            Err(ProposalError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(token.check().is_ok());

        other.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(ProposalError::Cancelled)));
    }
}
