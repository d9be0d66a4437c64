// Working state for one proposal attempt and the result it accumulates.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::match_context::MatchContext;
use crate::model::{Division, Season, Team};
use crate::template::Template;

/// The outcome of proposing a season from a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalResult {
    pub season: Season,
    pub template_id: String,
    pub template_name: String,
    /// Per-division fixture output, in season division order. Empty unless
    /// the proposal succeeded.
    pub divisions: Vec<Division>,
    /// Placeholder key -> assigned team.
    pub placeholder_mapping: BTreeMap<String, Team>,
    /// Placeholders left without a team because a division has fewer teams
    /// than the template expects.
    #[serde(default)]
    pub unfilled_placeholders: BTreeSet<String>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub messages: Vec<String>,
}

impl ProposalResult {
    pub fn new(season: &Season, template: &Template) -> Self {
        ProposalResult {
            season: season.clone(),
            template_id: template.id.clone(),
            template_name: template.name.clone(),
            divisions: Vec::new(),
            placeholder_mapping: BTreeMap::new(),
            unfilled_placeholders: BTreeSet::new(),
            success: false,
            errors: Vec::new(),
            warnings: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Total number of fixtures across all proposed divisions.
    pub fn fixture_count(&self) -> usize {
        self.divisions
            .iter()
            .flat_map(|d| d.fixture_dates.iter())
            .map(|fd| fd.fixtures.len())
            .sum()
    }
}

/// Mutable state threaded through the address and date strategies.
///
/// Field ownership:
/// - `match_context` and `template` are read-only inputs.
/// - `placeholder_mapping` is written by address assignment and read by date
///   assignment.
/// - `result` collects diagnostics from both stages; date assignment also
///   fills `result.divisions`. The mapping is copied into the result when
///   the proposal finishes.
#[derive(Debug)]
pub struct ProposalContext<'a> {
    pub match_context: &'a MatchContext,
    pub template: &'a Template,
    pub placeholder_mapping: BTreeMap<String, Team>,
    pub result: ProposalResult,
}

impl<'a> ProposalContext<'a> {
    pub fn new(match_context: &'a MatchContext, template: &'a Template) -> Self {
        ProposalContext {
            match_context,
            template,
            placeholder_mapping: BTreeMap::new(),
            result: ProposalResult::new(&match_context.season, template),
        }
    }

    /// Whether `team` has already been given a placeholder.
    pub fn is_assigned(&self, team: &Team) -> bool {
        self.placeholder_mapping.values().any(|t| t.id == team.id)
    }

    /// Whether `placeholder` already has a team.
    pub fn is_consumed(&self, placeholder: &str) -> bool {
        self.placeholder_mapping.contains_key(placeholder)
    }

    pub fn assign(&mut self, placeholder: &str, team: &Team) {
        self.placeholder_mapping
            .insert(placeholder.to_string(), team.clone());
    }

    /// Record a business-rule failure.
    pub fn error(&mut self, message: impl Into<String>) {
        self.result.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.result.warnings.push(message.into());
    }

    pub fn message(&mut self, message: impl Into<String>) {
        self.result.messages.push(message.into());
    }

    /// Finish the attempt, moving the mapping into the result.
    pub fn into_result(mut self, success: bool) -> ProposalResult {
        self.result.success = success;
        self.result.placeholder_mapping = self.placeholder_mapping;
        self.result
    }
}
