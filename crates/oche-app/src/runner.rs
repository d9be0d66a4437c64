// Runs a proposal off the async runtime and cancels it on Ctrl-C.

use std::future::Future;

use anyhow::Context;
use oche_core::{
    CancelToken, MatchContext, ProposalError, ProposalResult, SeasonData, Template,
    TemplatedSeasonProposal,
};
use tracing::{info, warn};

/// Propose fixtures on a blocking worker, cancelling if the process
/// receives Ctrl-C before the proposal completes.
pub async fn run_proposal(
    season: SeasonData,
    template: Template,
    cancel: CancelToken,
) -> anyhow::Result<ProposalResult> {
    run_until(season, template, cancel, ctrl_c()).await
}

/// Like [`run_proposal`], with the interrupt supplied by the caller.
///
/// When `interrupt` resolves first the token is cancelled, the worker is
/// awaited so it observes the cancellation, and the call fails with
/// [`ProposalError::Cancelled`].
pub async fn run_until<F>(
    season: SeasonData,
    template: Template,
    cancel: CancelToken,
    interrupt: F,
) -> anyhow::Result<ProposalResult>
where
    F: Future<Output = ()>,
{
    let job = move |cancel: &CancelToken| {
        let match_context = MatchContext::from(season);
        TemplatedSeasonProposal::standard().propose_fixtures(&match_context, &template, cancel)
    };
    run_job(job, cancel, interrupt).await
}

async fn run_job<J, F>(job: J, cancel: CancelToken, interrupt: F) -> anyhow::Result<ProposalResult>
where
    J: FnOnce(&CancelToken) -> Result<ProposalResult, ProposalError> + Send + 'static,
    F: Future<Output = ()>,
{
    let worker_cancel = cancel.clone();
    let mut task = tokio::task::spawn_blocking(move || job(&worker_cancel));

    tokio::select! {
        biased;

        _ = interrupt => {
            warn!("Interrupted; cancelling proposal");
            cancel.cancel();
            // The worker only stops at its next cancellation check.
            match task.await {
                Err(e) if e.is_panic() => {
                    warn!("Proposal worker panicked while cancelling: {e}");
                    Err(anyhow::Error::new(e).context("proposal worker panicked"))
                }
                _ => Err(ProposalError::Cancelled.into()),
            }
        }
        joined = &mut task => {
            let result = joined.context("proposal worker panicked")??;
            info!(
                "Proposal finished: success={}, {} fixture(s)",
                result.success,
                result.fixture_count()
            );
            Ok(result)
        }
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
