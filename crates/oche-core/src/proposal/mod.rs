// Season-template fixture proposal: match context, the address and date
// assignment stages, and the strategy that runs them.

pub mod address_assignment;
pub mod context;
pub mod date_assignment;
pub mod match_context;
pub mod strategy;

pub use address_assignment::{AddressAssignment, AddressAssignmentStrategy};
pub use context::{ProposalContext, ProposalResult};
pub use date_assignment::{FixtureDateAssignment, FixtureDateAssignmentStrategy};
pub use match_context::{DivisionMapping, DivisionTeam, MatchContext, SharedAddress};
pub use strategy::TemplatedSeasonProposal;
