// Read-only view over a season's divisions and teams: shared venues and
// season-to-template division pairing.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Division, Season, SeasonData, Team};
use crate::template::{DivisionTemplate, Template};

/// A team together with the index of the division it plays in.
#[derive(Debug, Clone, Copy)]
pub struct DivisionTeam<'a> {
    pub division_index: usize,
    pub team: &'a Team,
}

/// Teams that play out of the same (normalized) venue address.
#[derive(Debug, Clone)]
pub struct SharedAddress<'a> {
    pub address: String,
    /// One entry per team at this address, in division then roster order.
    pub teams: Vec<DivisionTeam<'a>>,
}

impl SharedAddress<'_> {
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// A season division paired with the template division at the same position.
#[derive(Debug, Clone, Copy)]
pub struct DivisionMapping<'a> {
    pub index: usize,
    pub division: &'a Division,
    pub template: &'a DivisionTemplate,
}

/// The season as it currently stands, before any proposal is applied.
#[derive(Debug, Clone)]
pub struct MatchContext {
    pub season: Season,
    pub divisions: Vec<Division>,
}

impl From<SeasonData> for MatchContext {
    fn from(data: SeasonData) -> Self {
        MatchContext {
            season: data.season,
            divisions: data.divisions,
        }
    }
}

impl MatchContext {
    pub fn new(season: Season, divisions: Vec<Division>) -> Self {
        MatchContext { season, divisions }
    }

    /// Addresses used by teams in more than one division.
    ///
    /// Groups are ordered by normalized address so the result is stable for a
    /// given snapshot. An address used by several teams of a single division
    /// is not a season-level group; it belongs to that division's own
    /// grouping (see [`MatchContext::division_shared_addresses`]).
    pub fn season_shared_addresses(&self) -> Vec<SharedAddress<'_>> {
        self.teams_by_address()
            .into_iter()
            .filter(|(_, teams)| spans_divisions(teams))
            .map(|(address, teams)| SharedAddress { address, teams })
            .collect()
    }

    /// Groups of two or more teams within one division that share a venue.
    ///
    /// Addresses that are also used in another division are left out: those
    /// teams are already covered by the season-level grouping.
    pub fn division_shared_addresses(&self, division_index: usize) -> Vec<SharedAddress<'_>> {
        let Some(division) = self.divisions.get(division_index) else {
            return Vec::new();
        };
        let season_level: BTreeSet<String> = self
            .season_shared_addresses()
            .into_iter()
            .map(|g| g.address)
            .collect();

        let mut by_address: BTreeMap<String, Vec<DivisionTeam<'_>>> = BTreeMap::new();
        for team in &division.teams {
            let address = team.normalized_address();
            if address.is_empty() || season_level.contains(&address) {
                continue;
            }
            by_address.entry(address).or_default().push(DivisionTeam {
                division_index,
                team,
            });
        }

        by_address
            .into_iter()
            .filter(|(_, teams)| teams.len() >= 2)
            .map(|(address, teams)| SharedAddress { address, teams })
            .collect()
    }

    /// Pair season divisions with template divisions by position. Extra
    /// divisions on either side are ignored.
    pub fn division_mappings<'a>(&'a self, template: &'a Template) -> Vec<DivisionMapping<'a>> {
        self.divisions
            .iter()
            .zip(template.divisions.iter())
            .enumerate()
            .map(|(index, (division, template))| DivisionMapping {
                index,
                division,
                template,
            })
            .collect()
    }

    fn teams_by_address(&self) -> BTreeMap<String, Vec<DivisionTeam<'_>>> {
        let mut by_address: BTreeMap<String, Vec<DivisionTeam<'_>>> = BTreeMap::new();
        for (division_index, division) in self.divisions.iter().enumerate() {
            for team in &division.teams {
                let address = team.normalized_address();
                if address.is_empty() {
                    continue;
                }
                by_address.entry(address).or_default().push(DivisionTeam {
                    division_index,
                    team,
                });
            }
        }
        by_address
    }
}

fn spans_divisions(teams: &[DivisionTeam<'_>]) -> bool {
    match teams.first() {
        Some(first) => teams.iter().any(|t| t.division_index != first.division_index),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn season() -> Season {
        Season {
            id: "s1".into(),
            name: "Season".into(),
            start_date: NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
            end_date: None,
        }
    }

    fn division(name: &str, teams: &[(&str, &str)]) -> Division {
        Division {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.into(),
            teams: teams
                .iter()
                .map(|(n, a)| Team::new(&n.to_lowercase(), n, a))
                .collect(),
            fixture_dates: vec![],
        }
    }

    fn names(group: &SharedAddress<'_>) -> Vec<String> {
        group.teams.iter().map(|t| t.team.name.clone()).collect()
    }

    #[test]
    fn season_groups_only_span_divisions() {
        let ctx = MatchContext::new(
            season(),
            vec![
                division("Division 1", &[("A1", "Red Lion"), ("B1", "Crown"), ("C1", "crown")]),
                division("Division 2", &[("A2", " red lion "), ("B2", "Swan")]),
            ],
        );

        let groups = ctx.season_shared_addresses();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].address, "red lion");
        assert_eq!(names(&groups[0]), vec!["A1", "A2"]);
    }

    #[test]
    fn single_team_or_empty_address_is_not_shared() {
        let ctx = MatchContext::new(
            season(),
            vec![
                division("Division 1", &[("A1", ""), ("B1", "Crown")]),
                division("Division 2", &[("A2", "  "), ("B2", "Swan")]),
            ],
        );
        assert!(ctx.season_shared_addresses().is_empty());
        assert!(ctx.division_shared_addresses(0).is_empty());
        assert!(ctx.division_shared_addresses(1).is_empty());
    }

    #[test]
    fn season_group_includes_every_team_at_the_address() {
        let ctx = MatchContext::new(
            season(),
            vec![
                division("Division 1", &[("A1", "Crown"), ("B1", "CROWN")]),
                division("Division 2", &[("A2", "crown")]),
            ],
        );
        let groups = ctx.season_shared_addresses();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
        // Covered at season level, so not repeated for the division.
        assert!(ctx.division_shared_addresses(0).is_empty());
    }

    #[test]
    fn division_groups_within_one_division() {
        let ctx = MatchContext::new(
            season(),
            vec![division(
                "Division 1",
                &[("A", "Crown"), ("B", "Swan"), ("C", "crown "), ("D", "swan")],
            )],
        );
        let groups = ctx.division_shared_addresses(0);
        assert_eq!(groups.len(), 2);
        assert_eq!(names(&groups[0]), vec!["A", "C"]);
        assert_eq!(names(&groups[1]), vec!["B", "D"]);
        assert!(ctx.division_shared_addresses(5).is_empty());
    }

    #[test]
    fn division_mappings_zip_by_position() {
        let ctx = MatchContext::new(
            season(),
            vec![
                division("Division 1", &[]),
                division("Division 2", &[]),
                division("Division 3", &[]),
            ],
        );
        let template = Template {
            divisions: vec![DivisionTemplate::default(), DivisionTemplate::default()],
            ..Template::default()
        };

        let mappings = ctx.division_mappings(&template);
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].division.name, "Division 1");
        assert_eq!(mappings[1].index, 1);
        assert_eq!(mappings[1].division.name, "Division 2");

        assert!(ctx.division_mappings(&Template::default()).is_empty());
        let empty = MatchContext::new(season(), vec![]);
        assert!(empty.division_mappings(&template).is_empty());
    }
}
