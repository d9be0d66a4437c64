// Lays the template's weeks onto real calendar dates for every division.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use super::context::ProposalContext;
use super::match_context::DivisionMapping;
use crate::cancel::CancelToken;
use crate::error::ProposalError;
use crate::model::{Division, Fixture, FixtureDate, FixtureTeam};
use crate::template::{DateTemplate, FixtureTemplate};

/// Materializes dated fixtures into `ProposalContext::result.divisions`.
pub trait FixtureDateAssignmentStrategy {
    fn assign_dates(
        &self,
        context: &mut ProposalContext<'_>,
        cancel: &CancelToken,
    ) -> Result<bool, ProposalError>;
}

/// Weekly date assignment starting at the season start date.
///
/// Existing locked dates (notes, knockout or tournament fixtures) are kept
/// as they are and the template week moves on to the following week. Once a
/// division's template weeks are used up no further dates are produced, even
/// if that runs past the season end date; a warning is recorded instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureDateAssignment;

impl FixtureDateAssignmentStrategy for FixtureDateAssignment {
    fn assign_dates(
        &self,
        context: &mut ProposalContext<'_>,
        cancel: &CancelToken,
    ) -> Result<bool, ProposalError> {
        let match_context = context.match_context;
        let mappings = match_context.division_mappings(context.template);

        let mut divisions = Vec::with_capacity(mappings.len());
        for mapping in &mappings {
            cancel.check()?;
            divisions.push(propose_division(context, mapping)?);
        }

        context.result.divisions = divisions;
        Ok(true)
    }
}

fn propose_division(
    context: &mut ProposalContext<'_>,
    mapping: &DivisionMapping<'_>,
) -> Result<Division, ProposalError> {
    let match_context = context.match_context;
    let season = &match_context.season;
    let name = &mapping.division.name;
    let week = Duration::weeks(1);

    let mut output = mapping.division.clone();
    let mut date = season.start_date;
    let mut fixture_count = 0;
    let mut skipped = 0;
    let mut first_beyond_end: Option<NaiveDate> = None;

    for date_template in &mapping.template.dates {
        while output
            .fixture_dates
            .iter()
            .any(|fd| fd.date == date && fd.is_locked())
        {
            debug!("{name}: {date} is locked, skipping");
            skipped += 1;
            date += week;
        }

        let fixtures = resolve_date(context, name, date_template)?;
        debug!("{name}: {date} gets {} fixture(s)", fixtures.len());
        fixture_count += fixtures.len();

        if let Some(end) = season.end_date {
            if date > end && first_beyond_end.is_none() {
                first_beyond_end = Some(date);
            }
        }

        // Anything left on this date is unlocked league fixtures; the
        // proposal replaces them.
        output.fixture_dates.retain(|fd| fd.date != date);
        output.fixture_dates.push(FixtureDate {
            fixtures,
            ..FixtureDate::new(date)
        });

        date += week;
    }

    output.fixture_dates.sort_by_key(|fd| fd.date);

    if let Some(beyond) = first_beyond_end {
        context.warning(format!(
            "{name}: Fixtures proposed beyond the end of the season ({beyond})"
        ));
    }
    context.message(format!(
        "{name}: Proposed {fixture_count} fixture(s) across {} date(s), {skipped} locked date(s) skipped",
        mapping.template.dates.len()
    ));

    Ok(output)
}

fn resolve_date(
    context: &ProposalContext<'_>,
    division: &str,
    date_template: &DateTemplate,
) -> Result<Vec<Fixture>, ProposalError> {
    let mut fixtures = Vec::with_capacity(date_template.fixtures.len());
    for fixture_template in &date_template.fixtures {
        if let Some(fixture) = resolve_fixture(context, division, fixture_template)? {
            fixtures.push(fixture);
        }
    }
    Ok(fixtures)
}

/// Turn a templated fixture into a real one. A placeholder left without a
/// team (the division is smaller than the template) drops out of the
/// fixture, leaving its opponent with a bye.
fn resolve_fixture(
    context: &ProposalContext<'_>,
    division: &str,
    fixture_template: &FixtureTemplate,
) -> Result<Option<Fixture>, ProposalError> {
    let home = resolve_team(context, division, &fixture_template.home)?;
    let away = match &fixture_template.away {
        Some(placeholder) => resolve_team(context, division, placeholder)?,
        None => None,
    };

    let fixture = match (home, away) {
        (Some(home), away) => Some(Fixture {
            home,
            away,
            is_knockout: false,
        }),
        (None, Some(away)) => Some(Fixture {
            home: away,
            away: None,
            is_knockout: false,
        }),
        (None, None) => None,
    };
    Ok(fixture)
}

fn resolve_team(
    context: &ProposalContext<'_>,
    division: &str,
    placeholder: &str,
) -> Result<Option<FixtureTeam>, ProposalError> {
    if let Some(team) = context.placeholder_mapping.get(placeholder) {
        return Ok(Some(FixtureTeam::from(team)));
    }
    if context.result.unfilled_placeholders.contains(placeholder) {
        return Ok(None);
    }
    Err(ProposalError::UnmappedPlaceholder {
        division: division.to_string(),
        placeholder: placeholder.to_string(),
    })
}
