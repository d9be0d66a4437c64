// Proposes a whole season from a template: address assignment, then dates.

use tracing::{info, warn};

use super::address_assignment::{AddressAssignment, AddressAssignmentStrategy};
use super::context::{ProposalContext, ProposalResult};
use super::date_assignment::{FixtureDateAssignment, FixtureDateAssignmentStrategy};
use super::match_context::MatchContext;
use crate::cancel::CancelToken;
use crate::error::ProposalError;
use crate::template::Template;

pub const COULD_NOT_ASSIGN_TEAMS: &str =
    "Could not assign all teams to placeholders in the template";

/// Runs the two proposal stages in order.
///
/// The stages are pluggable so callers can substitute their own strategies;
/// [`TemplatedSeasonProposal::standard`] uses [`AddressAssignment`] and
/// [`FixtureDateAssignment`].
#[derive(Debug, Clone, Default)]
pub struct TemplatedSeasonProposal<A = AddressAssignment, D = FixtureDateAssignment> {
    address_assignment: A,
    date_assignment: D,
}

impl TemplatedSeasonProposal {
    pub fn standard() -> Self {
        TemplatedSeasonProposal::new(AddressAssignment, FixtureDateAssignment)
    }
}

impl<A, D> TemplatedSeasonProposal<A, D>
where
    A: AddressAssignmentStrategy,
    D: FixtureDateAssignmentStrategy,
{
    pub fn new(address_assignment: A, date_assignment: D) -> Self {
        TemplatedSeasonProposal {
            address_assignment,
            date_assignment,
        }
    }

    /// Propose fixtures for every division of the season in `match_context`.
    ///
    /// A season that does not fit the template yields an unsuccessful result
    /// carrying the diagnostics; no fixtures are produced in that case.
    /// `Err` is reserved for cancellation and internal inconsistencies.
    pub fn propose_fixtures(
        &self,
        match_context: &MatchContext,
        template: &Template,
        cancel: &CancelToken,
    ) -> Result<ProposalResult, ProposalError> {
        info!(
            "Proposing fixtures for season `{}` from template `{}`",
            match_context.season.name, template.name
        );
        let mut context = ProposalContext::new(match_context, template);

        if !self.address_assignment.assign_addresses(&mut context, cancel)? {
            warn!(
                "Template `{}` does not fit season `{}`: {}",
                template.name,
                match_context.season.name,
                context.result.errors.join("; ")
            );
            context.result.warnings.clear();
            context.warning(COULD_NOT_ASSIGN_TEAMS);
            context.placeholder_mapping.clear();
            context.result.unfilled_placeholders.clear();
            return Ok(context.into_result(false));
        }

        cancel.check()?;
        let success = self.date_assignment.assign_dates(&mut context, cancel)?;
        let result = context.into_result(success);

        info!(
            "Proposed {} fixture(s) across {} division(s) for season `{}`",
            result.fixture_count(),
            result.divisions.len(),
            result.season.name
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Division, Season, Team};
    use crate::template::{DateTemplate, DivisionTemplate, FixtureTemplate};
    use chrono::NaiveDate;
    use std::cell::Cell;

    fn match_context() -> MatchContext {
        MatchContext::new(
            Season {
                id: "s1".into(),
                name: "Season".into(),
                start_date: NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
                end_date: None,
            },
            vec![Division {
                id: "d1".into(),
                name: "Division 1".into(),
                teams: vec![Team::new("t1", "Team 1", "x"), Team::new("t2", "Team 2", "y")],
                fixture_dates: vec![],
            }],
        )
    }

    fn template() -> Template {
        Template {
            id: "tmpl".into(),
            name: "Two teams".into(),
            shared_addresses: vec![],
            divisions: vec![DivisionTemplate {
                shared_addresses: vec![],
                dates: vec![DateTemplate {
                    fixtures: vec![FixtureTemplate::new("A", Some("B"))],
                }],
            }],
        }
    }

    struct Failing;

    impl AddressAssignmentStrategy for Failing {
        fn assign_addresses(
            &self,
            context: &mut ProposalContext<'_>,
            _cancel: &CancelToken,
        ) -> Result<bool, ProposalError> {
            context.warning("Division 1: 1 placeholder(s) have no team: D");
            context.error("nope");
            Ok(false)
        }
    }

    #[derive(Default)]
    struct CountingDates {
        calls: Cell<usize>,
    }

    impl FixtureDateAssignmentStrategy for CountingDates {
        fn assign_dates(
            &self,
            _context: &mut ProposalContext<'_>,
            _cancel: &CancelToken,
        ) -> Result<bool, ProposalError> {
            self.calls.set(self.calls.get() + 1);
            Ok(true)
        }
    }

    #[test]
    fn successful_proposal_carries_fixtures_and_mapping() {
        let result = TemplatedSeasonProposal::standard()
            .propose_fixtures(&match_context(), &template(), &CancelToken::new())
            .unwrap();

        assert!(result.success);
        assert_eq!(result.template_id, "tmpl");
        assert_eq!(result.season.id, "s1");
        assert_eq!(result.placeholder_mapping.len(), 2);
        assert_eq!(result.divisions.len(), 1);
        assert_eq!(result.fixture_count(), 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn failed_assignment_skips_dates_and_warns() {
        let dates = CountingDates::default();
        let proposal = TemplatedSeasonProposal::new(Failing, dates);
        let result = proposal
            .propose_fixtures(&match_context(), &template(), &CancelToken::new())
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.errors, vec!["nope".to_string()]);
        assert_eq!(result.warnings, vec![COULD_NOT_ASSIGN_TEAMS.to_string()]);
        assert!(result.divisions.is_empty());
        assert!(result.placeholder_mapping.is_empty());
        assert_eq!(proposal.date_assignment.calls.get(), 0);
    }

    #[test]
    fn cancelled_proposal_has_no_result() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = TemplatedSeasonProposal::standard()
            .propose_fixtures(&match_context(), &template(), &cancel)
            .unwrap_err();
        assert_eq!(err, ProposalError::Cancelled);
    }
}
