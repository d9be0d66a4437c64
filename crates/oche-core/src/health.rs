// Template health check.
//
// Inspects a template on its own, independently of any season, and reports
// patterns that would produce an unplayable schedule. The proposal stages
// never run this implicitly.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::Team;
use crate::template::{FixtureTemplate, Template};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Findings of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub name: String,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl HealthCheckResult {
    fn new(name: &str) -> Self {
        HealthCheckResult {
            name: name.to_string(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The outcome of [`check_template`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateHealth {
    pub checks: Vec<HealthCheckResult>,
}

impl TemplateHealth {
    /// A template is healthy when no check reported an error. Warnings do
    /// not count against it.
    pub fn success(&self) -> bool {
        self.checks.iter().all(HealthCheckResult::success)
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.checks
            .iter()
            .flat_map(|c| c.errors.iter().map(String::as_str))
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.checks
            .iter()
            .flat_map(|c| c.warnings.iter().map(String::as_str))
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Run every template check. Divisions and dates are numbered from 1 in the
/// messages.
pub fn check_template(template: &Template) -> TemplateHealth {
    TemplateHealth {
        checks: vec![
            placeholder_plays_once_per_date(template),
            shared_addresses_not_home_together(template),
            shared_address_placeholders_play(template),
        ],
    }
}

/// A placeholder cannot play twice on the same night.
fn placeholder_plays_once_per_date(template: &Template) -> HealthCheckResult {
    let mut check = HealthCheckResult::new("Placeholder plays once per date");

    for (d, division) in template.divisions.iter().enumerate() {
        for (w, date) in division.dates.iter().enumerate() {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for placeholder in date.fixtures.iter().flat_map(FixtureTemplate::placeholders) {
                *counts.entry(placeholder).or_default() += 1;
            }
            for (placeholder, _) in counts.iter().filter(|(_, n)| **n > 1) {
                check.errors.push(format!(
                    "Division {}, date {}: {placeholder} is playing more than once",
                    d + 1,
                    w + 1
                ));
            }
        }
    }

    check
}

/// Teams that share a venue cannot both host on the same night.
///
/// Division-level groups are compared within their division; season-level
/// groups are compared across all divisions for the same date position.
fn shared_addresses_not_home_together(template: &Template) -> HealthCheckResult {
    let mut check = HealthCheckResult::new("Shared addresses are not at home together");

    for (d, division) in template.divisions.iter().enumerate() {
        for group in &division.shared_addresses {
            for (w, date) in division.dates.iter().enumerate() {
                let at_home = homes_in_group(date.fixtures.iter(), group);
                for (a, b) in pairs(&at_home) {
                    check.warnings.push(format!(
                        "Division {}, date {}: {a} and {b} share an address and are both playing at home",
                        d + 1,
                        w + 1
                    ));
                }
            }
        }
    }

    let longest = template
        .divisions
        .iter()
        .map(|d| d.dates.len())
        .max()
        .unwrap_or(0);
    for group in &template.shared_addresses {
        for w in 0..longest {
            let fixtures = template
                .divisions
                .iter()
                .filter_map(|d| d.dates.get(w))
                .flat_map(|date| date.fixtures.iter());
            let at_home = homes_in_group(fixtures, group);
            for (a, b) in pairs(&at_home) {
                check.warnings.push(format!(
                    "Date {}: {a} and {b} share an address and are both playing at home",
                    w + 1
                ));
            }
        }
    }

    check
}

/// A placeholder listed in a shared-address group that never plays is
/// almost certainly a typo in the template.
fn shared_address_placeholders_play(template: &Template) -> HealthCheckResult {
    let mut check = HealthCheckResult::new("Shared address placeholders play");

    let everywhere: BTreeSet<String> = template
        .divisions
        .iter()
        .flat_map(|d| d.placeholders())
        .collect();
    for placeholder in template.shared_addresses.iter().flatten() {
        if !everywhere.contains(placeholder) {
            check.warnings.push(format!(
                "{placeholder} shares an address but has no fixtures"
            ));
        }
    }

    for (d, division) in template.divisions.iter().enumerate() {
        for placeholder in division.shared_addresses.iter().flatten() {
            if !division.references(placeholder) {
                check.warnings.push(format!(
                    "Division {}: {placeholder} shares an address but has no fixtures",
                    d + 1
                ));
            }
        }
    }

    check
}

fn homes_in_group<'a>(
    fixtures: impl Iterator<Item = &'a FixtureTemplate>,
    group: &[String],
) -> Vec<&'a str> {
    fixtures
        .map(|f| f.home.as_str())
        .filter(|home| group.iter().any(|p| p == home))
        .collect()
}

fn pairs<'a>(items: &[&'a str]) -> Vec<(&'a str, &'a str)> {
    let mut out = Vec::new();
    for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            out.push((*a, *b));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Human-readable fixtures
// ---------------------------------------------------------------------------

/// One templated week rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateDescription {
    /// 1-based position of the date within the division template.
    pub week: usize,
    pub fixtures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionDescription {
    /// 1-based position of the division within the template.
    pub division: usize,
    pub dates: Vec<DateDescription>,
}

/// Render every templated fixture as `"Home - Away"` (or `"Home - bye"`),
/// naming the mapped team where there is one and the placeholder otherwise.
pub fn describe_fixtures(
    template: &Template,
    mapping: &BTreeMap<String, Team>,
) -> Vec<DivisionDescription> {
    let name = |placeholder: &str| -> String {
        mapping
            .get(placeholder)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| placeholder.to_string())
    };

    template
        .divisions
        .iter()
        .enumerate()
        .map(|(d, division)| DivisionDescription {
            division: d + 1,
            dates: division
                .dates
                .iter()
                .enumerate()
                .map(|(w, date)| DateDescription {
                    week: w + 1,
                    fixtures: date
                        .fixtures
                        .iter()
                        .map(|f| match &f.away {
                            Some(away) => format!("{} - {}", name(&f.home), name(away)),
                            None => format!("{} - bye", name(&f.home)),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}
