use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::matchup::{self, MatchupSummary, PairwiseMatrix};
use crate::source::{DataSource, Participant};
use crate::streaks::{GameRecord, StreakRow, build_streak_rows};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreakOptions {
    pub min_total_bases: u32,
    pub game_log_limit: usize,
    pub parallelism: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreakTable {
    pub rows: Vec<StreakRow>,
    pub min_total_bases: u32,
    pub players_checked: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakProgress {
    pub current: usize,
    pub total: usize,
}

/// Fetches every eligible hitter's recent games and keeps those with a live streak.
pub fn build_streak_table(
    source: &dyn DataSource,
    options: StreakOptions,
    on_progress: &(dyn Fn(StreakProgress) + Sync),
) -> Result<StreakTable> {
    let listing = source
        .list_participants()
        .context("participant list unavailable")?;
    let players = listing.participants;
    let total = players.len();
    let done = AtomicUsize::new(0);

    let fetched: Vec<(Participant, Result<Vec<GameRecord>>)> = with_fetch_pool(options.parallelism, || {
        players
            .into_par_iter()
            .map(|player| {
                let records = source.fetch_recent_games(player.id, options.game_log_limit);
                let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                on_progress(StreakProgress { current, total });
                (player, records)
            })
            .collect()
    });

    let mut errors = listing.errors;
    let mut logs = Vec::with_capacity(fetched.len());
    for (player, records) in fetched {
        match records {
            Ok(records) => logs.push((player, records)),
            Err(err) => {
                warn!(player = %player.name, error = %err, "game log fetch failed");
                errors.push(format!("{} game log failed: {err}", player.name));
            }
        }
    }

    let rows = build_streak_rows(
        logs.iter().map(|(p, records)| (p, records.as_slice())),
        options.min_total_bases,
    );
    info!(
        checked = total,
        live = rows.len(),
        errors = errors.len(),
        "streak table built"
    );
    Ok(StreakTable {
        rows,
        min_total_bases: options.min_total_bases,
        players_checked: total,
        errors,
    })
}

pub fn build_matchup_summary(
    source: &dyn DataSource,
    team_a: &Participant,
    team_b: &Participant,
    threshold: f64,
    max_games: usize,
) -> Result<MatchupSummary> {
    let h2h = source
        .fetch_head_to_head(team_a.id, team_b.id, max_games)
        .with_context(|| format!("{} vs {} unavailable", team_a.name, team_b.name))?;
    let summary = matchup::summarize_matchup(team_a, team_b, threshold, &h2h);
    info!(
        team_a = %team_a.name,
        team_b = %team_b.name,
        games = summary.rows.len(),
        skipped = summary.skipped(),
        "matchup summarized"
    );
    Ok(summary)
}

pub fn build_pairwise_matrix(
    source: &dyn DataSource,
    threshold: f64,
    max_games: usize,
    parallelism: usize,
    on_progress: &(dyn Fn(usize, usize) + Sync),
) -> Result<PairwiseMatrix> {
    let teams = source.list_teams().context("team list unavailable")?;
    let matrix = with_fetch_pool(parallelism, || {
        matchup::build_pairwise_matrix(
            &teams,
            threshold,
            max_games,
            |a, b, max_games| source.fetch_head_to_head(a.id, b.id, max_games),
            on_progress,
        )
    });
    info!(
        teams = teams.len(),
        cells = matrix.cells.len(),
        skipped = matrix.skipped_games,
        errors = matrix.errors.len(),
        "pairwise matrix built"
    );
    Ok(matrix)
}

fn with_fetch_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(threads.clamp(2, 32)).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}
