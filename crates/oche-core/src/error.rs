// Fatal proposal errors. Business-rule failures are reported as diagnostics on
// the proposal result instead.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProposalError {
    #[error("proposal was cancelled")]
    Cancelled,

    /// A template fixture references a placeholder that address assignment
    /// neither mapped to a team nor recorded as unfilled.
    #[error("division `{division}`: placeholder `{placeholder}` has no team assigned")]
    UnmappedPlaceholder {
        division: String,
        placeholder: String,
    },
}
