// Season, division, team and fixture data handed in by the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::address::normalize_address;

/// A team entered in a division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    /// Venue address. May be empty or carry incidental whitespace.
    #[serde(default)]
    pub address: String,
}

impl Team {
    pub fn new(id: &str, name: &str, address: &str) -> Self {
        Team {
            id: id.to_string(),
            name: name.to_string(),
            address: address.to_string(),
        }
    }

    /// The trimmed, lowercased venue address.
    pub fn normalized_address(&self) -> String {
        normalize_address(&self.address)
    }

    /// Canonical ordering key used wherever teams are paired with placeholders.
    pub(crate) fn sort_key(&self) -> (String, String) {
        (self.name.to_lowercase(), self.id.clone())
    }
}

/// The team reference stored on a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureTeam {
    pub id: String,
    pub name: String,
}

impl From<&Team> for FixtureTeam {
    fn from(team: &Team) -> Self {
        FixtureTeam {
            id: team.id.clone(),
            name: team.name.clone(),
        }
    }
}

/// A single league (or knockout) fixture. No away team means a bye.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub home: FixtureTeam,
    #[serde(default)]
    pub away: Option<FixtureTeam>,
    #[serde(default)]
    pub is_knockout: bool,
}

impl Fixture {
    pub fn is_bye(&self) -> bool {
        self.away.is_none()
    }
}

/// A tournament held on a fixture date, outside of the league fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentFixture {
    pub id: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub address: String,
}

/// Everything scheduled for one division on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureDate {
    pub date: NaiveDate,
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub tournament_fixtures: Vec<TournamentFixture>,
}

impl FixtureDate {
    pub fn new(date: NaiveDate) -> Self {
        FixtureDate {
            date,
            fixtures: Vec::new(),
            notes: Vec::new(),
            tournament_fixtures: Vec::new(),
        }
    }

    /// A date is locked when it carries a note, a knockout fixture or a
    /// tournament fixture. Locked dates are never overwritten by a proposal.
    pub fn is_locked(&self) -> bool {
        !self.notes.is_empty()
            || self.fixtures.iter().any(|f| f.is_knockout)
            || !self.tournament_fixtures.is_empty()
    }
}

/// A division with its current roster and fixture dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub fixture_dates: Vec<FixtureDate>,
}

/// Season metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// A snapshot of one season: metadata plus every division's teams and
/// existing fixture dates, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonData {
    pub season: Season,
    #[serde(default)]
    pub divisions: Vec<Division>,
}
