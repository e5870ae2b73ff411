use anyhow::Result;
use chrono::NaiveDate;

use crate::streaks::GameRecord;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Participant {
    pub id: u64,
    pub name: String,
    // Team name for hitters, league name for teams.
    pub group: String,
    pub short: Option<String>,
}

impl Participant {
    pub fn new(id: u64, name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            group: group.into(),
            short: None,
        }
    }

    pub fn label(&self) -> &str {
        self.short.as_deref().unwrap_or(&self.name)
    }
}

/// A completed game between two teams as reported by the schedule feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredGame {
    pub game_pk: u64,
    pub date: Option<NaiveDate>,
    pub away: String,
    pub home: String,
    pub away_runs: u32,
    pub home_runs: u32,
}

impl ScoredGame {
    pub fn total_runs(&self) -> f64 {
        f64::from(self.away_runs) + f64::from(self.home_runs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotFetched(String),
    Unparseable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedGame {
    pub game_pk: u64,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadToHead {
    pub games: Vec<ScoredGame>,
    pub skipped: Vec<SkippedGame>,
}

impl HeadToHead {
    pub fn not_fetched(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::NotFetched(_)))
            .count()
    }

    pub fn unparseable(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::Unparseable(_)))
            .count()
    }
}

/// Participants plus the groups that could not be listed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantListing {
    pub participants: Vec<Participant>,
    pub errors: Vec<String>,
}

/// Where participants, game logs and head-to-head results come from.
///
/// `fetch_recent_games` must return records most-recent-first.
pub trait DataSource: Sync {
    fn list_participants(&self) -> Result<ParticipantListing>;

    fn list_teams(&self) -> Result<Vec<Participant>>;

    fn fetch_recent_games(&self, participant_id: u64, limit: usize) -> Result<Vec<GameRecord>>;

    fn fetch_head_to_head(&self, id_a: u64, id_b: u64, max_games: usize) -> Result<HeadToHead>;
}
