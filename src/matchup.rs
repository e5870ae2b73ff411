use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use chrono::NaiveDate;
use rayon::prelude::*;

use crate::source::{HeadToHead, Participant, ScoredGame};

pub const DEFAULT_THRESHOLD: f64 = 8.5;
pub const DEFAULT_MAX_GAMES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverUnder {
    Over,
    Under,
}

impl OverUnder {
    pub fn label(self) -> &'static str {
        match self {
            OverUnder::Over => "Over",
            OverUnder::Under => "Under",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchupGame {
    pub total_outcome: f64,
    pub threshold: f64,
}

impl MatchupGame {
    pub fn new(total_outcome: f64, threshold: f64) -> Self {
        Self {
            total_outcome,
            threshold,
        }
    }

    pub fn from_scored(game: &ScoredGame, threshold: f64) -> Self {
        Self::new(game.total_runs(), threshold)
    }

    pub fn classification(&self) -> OverUnder {
        classify(self)
    }
}

/// Strictly above the line is Over; landing exactly on it is Under.
pub fn classify(game: &MatchupGame) -> OverUnder {
    if game.total_outcome > game.threshold {
        OverUnder::Over
    } else {
        OverUnder::Under
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairwiseAggregate {
    pub games: usize,
    pub overs: usize,
    pub over_fraction: f64,
}

/// `None` means no games were observed, which callers must render differently
/// from an observed 0%.
pub fn aggregate(games: &[MatchupGame]) -> Option<PairwiseAggregate> {
    if games.is_empty() {
        return None;
    }
    let overs = games
        .iter()
        .filter(|game| classify(game) == OverUnder::Over)
        .count();
    Some(PairwiseAggregate {
        games: games.len(),
        overs,
        over_fraction: overs as f64 / games.len() as f64,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchupRow {
    pub game_pk: u64,
    pub date: Option<NaiveDate>,
    pub away: String,
    pub home: String,
    pub away_runs: u32,
    pub home_runs: u32,
    pub total: f64,
    pub threshold: f64,
    pub result: OverUnder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchupSummary {
    pub team_a: Participant,
    pub team_b: Participant,
    pub threshold: f64,
    pub rows: Vec<MatchupRow>,
    pub aggregate: Option<PairwiseAggregate>,
    pub not_fetched: usize,
    pub unparseable: usize,
}

impl MatchupSummary {
    pub fn skipped(&self) -> usize {
        self.not_fetched + self.unparseable
    }
}

pub fn summarize_matchup(
    team_a: &Participant,
    team_b: &Participant,
    threshold: f64,
    head_to_head: &HeadToHead,
) -> MatchupSummary {
    let mut rows = Vec::with_capacity(head_to_head.games.len());
    let mut games = Vec::with_capacity(head_to_head.games.len());
    for scored in &head_to_head.games {
        let game = MatchupGame::from_scored(scored, threshold);
        rows.push(MatchupRow {
            game_pk: scored.game_pk,
            date: scored.date,
            away: scored.away.clone(),
            home: scored.home.clone(),
            away_runs: scored.away_runs,
            home_runs: scored.home_runs,
            total: game.total_outcome,
            threshold,
            result: game.classification(),
        });
        games.push(game);
    }

    MatchupSummary {
        team_a: team_a.clone(),
        team_b: team_b.clone(),
        threshold,
        rows,
        aggregate: aggregate(&games),
        not_fetched: head_to_head.not_fetched(),
        unparseable: head_to_head.unparseable(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseCell {
    pub team_a: u64,
    pub team_b: u64,
    pub aggregate: PairwiseAggregate,
}

impl PairwiseCell {
    pub fn over_fraction(&self) -> f64 {
        self.aggregate.over_fraction
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairwiseMatrix {
    pub participants: Vec<Participant>,
    pub threshold: f64,
    pub cells: Vec<PairwiseCell>,
    pub skipped_games: usize,
    pub errors: Vec<String>,
}

impl PairwiseMatrix {
    pub fn get(&self, team_a: u64, team_b: u64) -> Option<&PairwiseCell> {
        self.cells
            .iter()
            .find(|cell| cell.team_a == team_a && cell.team_b == team_b)
    }

    pub fn max_cells(&self) -> usize {
        let n = self.participants.len();
        n * n.saturating_sub(1)
    }
}

/// Every ordered pair `(a, b)` with `a != b`, in participant order.
pub fn ordered_pairs(participants: &[Participant]) -> Vec<(&Participant, &Participant)> {
    let mut pairs = Vec::with_capacity(participants.len() * participants.len().saturating_sub(1));
    for a in participants {
        for b in participants {
            if a.id == b.id {
                continue;
            }
            pairs.push((a, b));
        }
    }
    pairs
}

/// Aggregates every ordered pair using `fetch` for the head-to-head games.
///
/// Pairs are evaluated in parallel on the current rayon pool. Pairs with no
/// games or a failed fetch are left out of the matrix.
pub fn build_pairwise_matrix<F>(
    participants: &[Participant],
    threshold: f64,
    max_games: usize,
    fetch: F,
    on_progress: &(dyn Fn(usize, usize) + Sync),
) -> PairwiseMatrix
where
    F: Fn(&Participant, &Participant, usize) -> Result<HeadToHead> + Sync,
{
    let pairs = ordered_pairs(participants);
    let total = pairs.len();
    let done = AtomicUsize::new(0);

    let results: Vec<(Option<PairwiseCell>, usize, Option<String>)> = pairs
        .par_iter()
        .map(|&(a, b)| {
            let outcome = match fetch(a, b, max_games) {
                Ok(h2h) => {
                    let games = h2h
                        .games
                        .iter()
                        .take(max_games)
                        .map(|g| MatchupGame::from_scored(g, threshold))
                        .collect::<Vec<_>>();
                    let cell = aggregate(&games).map(|aggregate| PairwiseCell {
                        team_a: a.id,
                        team_b: b.id,
                        aggregate,
                    });
                    (cell, h2h.skipped.len(), None)
                }
                Err(err) => (None, 0, Some(format!("{} vs {}: {err}", a.name, b.name))),
            };
            let current = done.fetch_add(1, Ordering::Relaxed) + 1;
            on_progress(current, total);
            outcome
        })
        .collect();

    let order: HashMap<u64, usize> = participants
        .iter()
        .enumerate()
        .map(|(idx, p)| (p.id, idx))
        .collect();

    let mut matrix = PairwiseMatrix {
        participants: participants.to_vec(),
        threshold,
        ..PairwiseMatrix::default()
    };
    for (cell, skipped, err) in results {
        matrix.skipped_games += skipped;
        if let Some(err) = err {
            matrix.errors.push(err);
        }
        if let Some(cell) = cell {
            matrix.cells.push(cell);
        }
    }
    matrix.cells.sort_by_key(|cell| {
        (
            order.get(&cell.team_a).copied().unwrap_or(usize::MAX),
            order.get(&cell.team_b).copied().unwrap_or(usize::MAX),
        )
    });
    matrix
}
