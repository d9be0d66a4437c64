// Rendering proposal results and template health reports for stdout.

use std::fmt::Write as _;

use oche_core::health::{DivisionDescription, TemplateHealth};
use oche_core::{Fixture, FixtureDate, ProposalResult};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Proposal results
// ---------------------------------------------------------------------------

/// Plain-text report: outcome, diagnostics, optional mapping, then each
/// division's dates in order.
pub fn render_text(result: &ProposalResult, show_mapping: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Season: {}  Template: {}",
        result.season.name, result.template_name
    );
    let _ = writeln!(
        out,
        "Result: {}",
        if result.success { "success" } else { "failed" }
    );

    write_list(&mut out, "Errors", &result.errors);
    write_list(&mut out, "Warnings", &result.warnings);
    write_list(&mut out, "Messages", &result.messages);

    if show_mapping && !result.placeholder_mapping.is_empty() {
        let _ = writeln!(out, "\nPlaceholders:");
        for (placeholder, team) in &result.placeholder_mapping {
            let _ = writeln!(out, "  {placeholder} -> {}", team.name);
        }
        for placeholder in &result.unfilled_placeholders {
            let _ = writeln!(out, "  {placeholder} -> (no team)");
        }
    }

    for division in &result.divisions {
        let _ = writeln!(out, "\n{}", division.name);
        for date in &division.fixture_dates {
            write_date(&mut out, date);
        }
    }

    out
}

fn write_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{heading}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

fn write_date(out: &mut String, date: &FixtureDate) {
    let locked = if date.is_locked() { " (locked)" } else { "" };
    let _ = writeln!(out, "  {}{locked}", date.date.format("%Y-%m-%d"));
    for note in &date.notes {
        let _ = writeln!(out, "    note: {note}");
    }
    for fixture in &date.fixtures {
        let _ = writeln!(out, "    {}", describe(fixture));
    }
    for tournament in &date.tournament_fixtures {
        let _ = writeln!(out, "    tournament: {}", tournament.kind);
    }
}

fn describe(fixture: &Fixture) -> String {
    let knockout = if fixture.is_knockout { " [knockout]" } else { "" };
    match &fixture.away {
        Some(away) => format!("{} v {}{knockout}", fixture.home.name, away.name),
        None => format!("{} - bye{knockout}", fixture.home.name),
    }
}

pub fn render_json(result: &ProposalResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    division: &'a str,
    date: String,
    home: &'a str,
    away: &'a str,
}

/// One row per fixture. A bye has an empty `away` column.
pub fn render_csv(result: &ProposalResult) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for division in &result.divisions {
        for date in &division.fixture_dates {
            for fixture in &date.fixtures {
                writer.serialize(CsvRow {
                    division: &division.name,
                    date: date.date.format("%Y-%m-%d").to_string(),
                    home: &fixture.home.name,
                    away: fixture.away.as_ref().map_or("", |a| a.name.as_str()),
                })?;
            }
        }
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

// ---------------------------------------------------------------------------
// Template health
// ---------------------------------------------------------------------------

pub fn render_health(health: &TemplateHealth, fixtures: &[DivisionDescription]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Template health: {}",
        if health.success() { "ok" } else { "errors found" }
    );
    for check in &health.checks {
        let status = if !check.success() {
            "FAIL"
        } else if check.warnings.is_empty() {
            "ok"
        } else {
            "warn"
        };
        let _ = writeln!(out, "  [{status}] {}", check.name);
        for error in &check.errors {
            let _ = writeln!(out, "      error: {error}");
        }
        for warning in &check.warnings {
            let _ = writeln!(out, "      warning: {warning}");
        }
    }

    for division in fixtures {
        let _ = writeln!(out, "\nDivision {}", division.division);
        for date in &division.dates {
            let _ = writeln!(out, "  Week {}", date.week);
            for fixture in &date.fixtures {
                let _ = writeln!(out, "    {fixture}");
            }
        }
    }

    out
}
