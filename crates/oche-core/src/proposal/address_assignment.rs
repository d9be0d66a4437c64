// Assigns real teams to template placeholders, honouring shared venues.
//
// Teams that share a venue must land on placeholders the template groups
// together, otherwise the template may schedule two home fixtures at one
// venue on the same night. Assignment runs in three passes: venues shared
// across divisions, venues shared within a division, then everyone else.

use tracing::debug;

use super::context::ProposalContext;
use super::match_context::{DivisionMapping, DivisionTeam};
use crate::cancel::CancelToken;
use crate::error::ProposalError;
use crate::model::Team;

pub const TOO_MANY_SEASON_SHARED_ADDRESSES: &str =
    "Too many teams in the season with addresses shared across the divisions";
pub const SHARED_ADDRESS_TOO_LARGE: &str =
    "Shared address has more teams than the template supports";

/// Populates `ProposalContext::placeholder_mapping`.
pub trait AddressAssignmentStrategy {
    /// Returns `Ok(false)` when the season cannot be fitted onto the
    /// template; the reason has then been added to `result.errors`.
    fn assign_addresses(
        &self,
        context: &mut ProposalContext<'_>,
        cancel: &CancelToken,
    ) -> Result<bool, ProposalError>;
}

/// The standard assignment: positional group matching followed by a
/// deterministic pairing of the remaining teams.
///
/// Any valid one-to-one pairing inside a group satisfies the contract. Teams
/// are paired in (name, id) order with placeholders in template order so
/// that the same input always yields the same mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressAssignment;

impl AddressAssignmentStrategy for AddressAssignment {
    fn assign_addresses(
        &self,
        context: &mut ProposalContext<'_>,
        cancel: &CancelToken,
    ) -> Result<bool, ProposalError> {
        if !assign_season_shared_addresses(context, cancel)? {
            return Ok(false);
        }

        let match_context = context.match_context;
        let mappings = match_context.division_mappings(context.template);

        for mapping in &mappings {
            cancel.check()?;
            if !assign_division_shared_addresses(context, mapping, cancel)? {
                return Ok(false);
            }
        }

        let mut spare = Vec::with_capacity(mappings.len());
        for mapping in &mappings {
            cancel.check()?;
            match assign_remaining_teams(context, mapping) {
                Some(unfilled) => spare.push((&mapping.division.name, unfilled)),
                None => return Ok(false),
            }
        }

        // Spare placeholders are only reported once every division fits.
        for (name, unfilled) in spare {
            let unfilled: Vec<String> = unfilled
                .into_iter()
                .filter(|p| !context.is_consumed(p))
                .collect();
            if unfilled.is_empty() {
                continue;
            }
            context.warning(format!(
                "Division {name}: {} placeholder(s) have no team: {}",
                unfilled.len(),
                unfilled.join(", ")
            ));
            context.result.unfilled_placeholders.extend(unfilled);
        }

        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Pass 1: venues shared across divisions
// ---------------------------------------------------------------------------

fn assign_season_shared_addresses(
    context: &mut ProposalContext<'_>,
    cancel: &CancelToken,
) -> Result<bool, ProposalError> {
    let match_context = context.match_context;
    let template = context.template;
    let season_groups = match_context.season_shared_addresses();

    if season_groups.len() > template.shared_addresses.len() {
        context.error(TOO_MANY_SEASON_SHARED_ADDRESSES);
        return Ok(false);
    }

    // First fit by position, not best fit by size.
    for (group, placeholders) in season_groups.iter().zip(&template.shared_addresses) {
        cancel.check()?;
        if group.len() > placeholders.len() {
            context.error(SHARED_ADDRESS_TOO_LARGE);
            return Ok(false);
        }

        debug!(
            "Season shared address `{}`: {} team(s) onto {:?}",
            group.address,
            group.len(),
            placeholders
        );
        if !assign_group(context, &group.teams, placeholders) {
            context.error(SHARED_ADDRESS_TOO_LARGE);
            return Ok(false);
        }
    }

    Ok(true)
}

// ---------------------------------------------------------------------------
// Pass 2: venues shared within one division
// ---------------------------------------------------------------------------

fn assign_division_shared_addresses(
    context: &mut ProposalContext<'_>,
    mapping: &DivisionMapping<'_>,
    cancel: &CancelToken,
) -> Result<bool, ProposalError> {
    let match_context = context.match_context;
    let division_groups = match_context.division_shared_addresses(mapping.index);
    let template_groups = &mapping.template.shared_addresses;
    let name = &mapping.division.name;

    if division_groups.len() > template_groups.len() {
        context.error(format!("{name}: Too many teams with addresses shared"));
        return Ok(false);
    }

    for (group, placeholders) in division_groups.iter().zip(template_groups) {
        cancel.check()?;
        if group.len() > placeholders.len() {
            context.error(format!("{name}: {SHARED_ADDRESS_TOO_LARGE}"));
            return Ok(false);
        }

        debug!(
            "{name}: shared address `{}`: {} team(s) onto {:?}",
            group.address,
            group.len(),
            placeholders
        );
        if !assign_group(context, &group.teams, placeholders) {
            context.error(format!("{name}: {SHARED_ADDRESS_TOO_LARGE}"));
            return Ok(false);
        }
    }

    Ok(true)
}

// ---------------------------------------------------------------------------
// Pass 3: everyone else
// ---------------------------------------------------------------------------

/// Returns the placeholders left without a team, or `None` when the
/// division has more teams than free placeholders.
fn assign_remaining_teams(
    context: &mut ProposalContext<'_>,
    mapping: &DivisionMapping<'_>,
) -> Option<Vec<String>> {
    let name = &mapping.division.name;

    let placeholders: Vec<String> = mapping
        .template
        .placeholders()
        .into_iter()
        .filter(|p| !context.is_consumed(p))
        .collect();
    let mut teams: Vec<&Team> = mapping
        .division
        .teams
        .iter()
        .filter(|t| !context.is_assigned(t))
        .collect();

    if teams.len() > placeholders.len() {
        context.error(format!(
            "Division {name}: More teams in division than templates support"
        ));
        return None;
    }

    teams.sort_by_key(|t| t.sort_key());
    for (team, placeholder) in teams.iter().zip(&placeholders) {
        debug!("{name}: {placeholder} -> {}", team.name);
        context.assign(placeholder, team);
    }

    Some(placeholders[teams.len()..].to_vec())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Pair a group of co-located teams with a template group's placeholders.
///
/// A team only takes a free group placeholder that its own division's
/// template plays, so it never ends up in another division's fixtures.
/// Returns `false` when some team finds no such placeholder. Placeholders
/// left over stay unconsumed and can still be handed out in pass 3.
fn assign_group(
    context: &mut ProposalContext<'_>,
    teams: &[DivisionTeam<'_>],
    placeholders: &[String],
) -> bool {
    let template = context.template;
    let mut ordered: Vec<&DivisionTeam<'_>> = teams.iter().collect();
    ordered.sort_by_key(|t| t.team.sort_key());

    for member in ordered {
        if context.is_assigned(member.team) {
            continue;
        }

        // Divisions beyond the template are not proposed.
        let Some(division_template) = template.divisions.get(member.division_index) else {
            continue;
        };
        let chosen = placeholders
            .iter()
            .find(|p| !context.is_consumed(p) && division_template.references(p))
            .cloned();

        match chosen {
            Some(placeholder) => context.assign(&placeholder, member.team),
            None => {
                debug!(
                    "No placeholder of the group is played in {}'s division",
                    member.team.name
                );
                return false;
            }
        }
    }

    true
}
