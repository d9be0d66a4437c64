// Reusable, team-agnostic season templates expressed with placeholders.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One templated fixture. `away == None` is a bye for the home placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureTemplate {
    pub home: String,
    #[serde(default)]
    pub away: Option<String>,
}

impl FixtureTemplate {
    pub fn new(home: &str, away: Option<&str>) -> Self {
        FixtureTemplate {
            home: home.to_string(),
            away: away.map(str::to_string),
        }
    }

    /// The home placeholder followed by the away placeholder, if any.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.home.as_str()).chain(self.away.as_deref())
    }
}

/// The fixtures played on one templated week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTemplate {
    #[serde(default)]
    pub fixtures: Vec<FixtureTemplate>,
}

/// The schedule pattern for a single division.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionTemplate {
    /// Groups of placeholders expected to share one venue within this division.
    #[serde(default)]
    pub shared_addresses: Vec<Vec<String>>,
    #[serde(default)]
    pub dates: Vec<DateTemplate>,
}

impl DivisionTemplate {
    /// Every placeholder referenced by this division's fixtures, in order of
    /// first appearance (date by date, home before away). No duplicates.
    pub fn placeholders(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();
        for fixture in self.dates.iter().flat_map(|d| d.fixtures.iter()) {
            for placeholder in fixture.placeholders() {
                if seen.insert(placeholder) {
                    ordered.push(placeholder.to_string());
                }
            }
        }
        ordered
    }

    /// Whether any fixture of this division references `placeholder`.
    pub fn references(&self, placeholder: &str) -> bool {
        self.dates
            .iter()
            .flat_map(|d| d.fixtures.iter())
            .any(|f| f.placeholders().any(|p| p == placeholder))
    }
}

/// A complete season template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    /// Groups of placeholders expected to share one venue across divisions.
    #[serde(default)]
    pub shared_addresses: Vec<Vec<String>>,
    #[serde(default)]
    pub divisions: Vec<DivisionTemplate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(fixtures: &[(&str, Option<&str>)]) -> DateTemplate {
        DateTemplate {
            fixtures: fixtures
                .iter()
                .map(|(h, a)| FixtureTemplate::new(h, *a))
                .collect(),
        }
    }

    #[test]
    fn placeholders_in_first_appearance_order() {
        let division = DivisionTemplate {
            shared_addresses: vec![],
            dates: vec![
                date(&[("A", Some("B")), ("C", None)]),
                date(&[("B", Some("C")), ("D", Some("A"))]),
            ],
        };
        assert_eq!(division.placeholders(), vec!["A", "B", "C", "D"]);
        assert!(division.references("D"));
        assert!(!division.references("E"));
    }

    #[test]
    fn deserializes_bye_without_away() {
        let json = r#"{ "id": "t", "name": "Four teams",
            "divisions": [ { "dates": [ { "fixtures": [ { "home": "A" } ] } ] } ] }"#;
        let template: Template = serde_json::from_str(json).unwrap();
        let fixture = &template.divisions[0].dates[0].fixtures[0];
        assert_eq!(fixture.home, "A");
        assert!(fixture.away.is_none());
        assert!(template.shared_addresses.is_empty());
    }
}
