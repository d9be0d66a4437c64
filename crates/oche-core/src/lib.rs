// Library root for the season-template fixture proposal engine.

pub mod address;
pub mod cancel;
pub mod error;
pub mod health;
pub mod model;
pub mod proposal;
pub mod template;

pub use cancel::CancelToken;
pub use error::ProposalError;
pub use model::{
    Division, Fixture, FixtureDate, FixtureTeam, Season, SeasonData, Team, TournamentFixture,
};
pub use proposal::{
    AddressAssignment, AddressAssignmentStrategy, FixtureDateAssignment,
    FixtureDateAssignmentStrategy, MatchContext, ProposalContext, ProposalResult,
    TemplatedSeasonProposal,
};
pub use template::{DateTemplate, DivisionTemplate, FixtureTemplate, Template};
