use std::collections::HashMap;

use chrono::NaiveDate;

use crate::source::Participant;

pub const DEFAULT_MIN_TOTAL_BASES: u32 = 2;

/// One completed game's stat line for one player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameRecord {
    pub date: Option<NaiveDate>,
    pub game_pk: Option<u64>,
    pub statistics: HashMap<String, f64>,
}

impl GameRecord {
    pub fn from_stats<'a>(stats: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self {
            date: None,
            game_pk: None,
            statistics: stats
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        }
    }

    /// Missing stats read as zero; feeds do not report every stat for every game.
    pub fn stat(&self, key: &str) -> f64 {
        self.statistics.get(key).copied().unwrap_or(0.0)
    }
}

/// Length of the current run, counted from `records[0]` (the most recent game)
/// until the first game that fails `predicate`.
pub fn compute_streak(records: &[GameRecord], stat_key: &str, predicate: impl Fn(f64) -> bool) -> usize {
    records
        .iter()
        .take_while(|record| predicate(record.stat(stat_key)))
        .count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreakKind {
    Hitting,
    Rbi,
    TotalBases,
    Runs,
}

impl StreakKind {
    pub const ALL: [StreakKind; 4] = [
        StreakKind::Hitting,
        StreakKind::Rbi,
        StreakKind::TotalBases,
        StreakKind::Runs,
    ];

    pub fn stat_key(self) -> &'static str {
        match self {
            StreakKind::Hitting => "hits",
            StreakKind::Rbi => "rbi",
            StreakKind::TotalBases => "totalBases",
            StreakKind::Runs => "runs",
        }
    }

    pub fn qualifies(self, value: f64, min_total_bases: u32) -> bool {
        match self {
            StreakKind::Hitting | StreakKind::Rbi | StreakKind::Runs => value > 0.0,
            StreakKind::TotalBases => value >= f64::from(min_total_bases),
        }
    }

    pub fn label(self, min_total_bases: u32) -> String {
        match self {
            StreakKind::Hitting => "Hitting".to_string(),
            StreakKind::Rbi => "RBI".to_string(),
            StreakKind::TotalBases => total_bases_label(min_total_bases),
            StreakKind::Runs => "Runs".to_string(),
        }
    }
}

pub fn total_bases_label(min_total_bases: u32) -> String {
    format!("Total Bases ({min_total_bases}+)")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStreaks {
    pub hitting: usize,
    pub rbi: usize,
    pub total_bases: usize,
    pub runs: usize,
}

impl PlayerStreaks {
    pub fn get(&self, kind: StreakKind) -> usize {
        match kind {
            StreakKind::Hitting => self.hitting,
            StreakKind::Rbi => self.rbi,
            StreakKind::TotalBases => self.total_bases,
            StreakKind::Runs => self.runs,
        }
    }

    pub fn longest(&self) -> usize {
        StreakKind::ALL
            .iter()
            .map(|kind| self.get(*kind))
            .max()
            .unwrap_or(0)
    }

    /// Only players with at least one running streak are reported.
    pub fn is_live(&self) -> bool {
        self.longest() > 0
    }
}

pub fn compute_player_streaks(records: &[GameRecord], min_total_bases: u32) -> PlayerStreaks {
    let streak = |kind: StreakKind| {
        compute_streak(records, kind.stat_key(), |value| {
            kind.qualifies(value, min_total_bases)
        })
    };
    PlayerStreaks {
        hitting: streak(StreakKind::Hitting),
        rbi: streak(StreakKind::Rbi),
        total_bases: streak(StreakKind::TotalBases),
        runs: streak(StreakKind::Runs),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakRow {
    pub player_id: u64,
    pub player: String,
    pub team: String,
    pub streaks: PlayerStreaks,
}

impl StreakRow {
    pub fn get(&self, kind: StreakKind) -> usize {
        self.streaks.get(kind)
    }
}

pub fn build_streak_rows<'a>(
    players: impl IntoIterator<Item = (&'a Participant, &'a [GameRecord])>,
    min_total_bases: u32,
) -> Vec<StreakRow> {
    let mut rows = Vec::new();
    for (player, records) in players {
        let streaks = compute_player_streaks(records, min_total_bases);
        if !streaks.is_live() {
            continue;
        }
        rows.push(StreakRow {
            player_id: player.id,
            player: player.name.clone(),
            team: player.group.clone(),
            streaks,
        });
    }
    rows
}
