use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::export;
use crate::http_cache;
use crate::matchup::{MatchupSummary, PairwiseMatrix};
use crate::source::DataSource;
use crate::state::{Delta, Progress, ProviderCommand};
use crate::statsapi::StatsApi;
use crate::tables::{self, StreakOptions, StreakTable};

/// Runs provider commands against the Stats API, one worker thread per command
/// so a long streak refresh does not hold up a matchup lookup.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>, config: AppConfig) {
    thread::spawn(move || {
        let api = Arc::new(StatsApi::new(&config));
        let _ = tx.send(Delta::Log(format!(
            "[INFO] Stats API provider ready (season {})",
            api.season()
        )));

        while let Ok(cmd) = cmd_rx.recv() {
            let api = Arc::clone(&api);
            let tx = tx.clone();
            let config = config.clone();
            thread::spawn(move || run_command(api.as_ref(), &config, cmd, &tx));
        }
        info!("provider command channel closed");
    });
}

pub fn run_command(
    source: &dyn DataSource,
    config: &AppConfig,
    cmd: ProviderCommand,
    tx: &Sender<Delta>,
) {
    match cmd {
        ProviderCommand::FetchStreaks => fetch_streaks(source, config, tx),
        ProviderCommand::FetchTeams => match source.list_teams() {
            Ok(teams) => {
                let _ = tx.send(Delta::SetTeams(teams));
            }
            Err(err) => {
                warn!(error = %err, "team list failed");
                let _ = tx.send(Delta::Log(format!("[WARN] Team list error: {err}")));
            }
        },
        ProviderCommand::FetchMatchup {
            team_a,
            team_b,
            threshold,
            max_games,
        } => {
            let delta = match tables::build_matchup_summary(
                source, &team_a, &team_b, threshold, max_games,
            ) {
                Ok(summary) => Delta::SetMatchup(summary),
                Err(err) => Delta::MatchupFailed(format!("{err:#}")),
            };
            let _ = tx.send(delta);
        }
        ProviderCommand::BuildHeatmap {
            threshold,
            max_games,
        } => {
            let progress_tx = tx.clone();
            let on_progress = move |current: usize, total: usize| {
                let _ = progress_tx.send(Delta::HeatmapProgress(Progress { current, total }));
            };
            let delta = match tables::build_pairwise_matrix(
                source,
                threshold,
                max_games,
                config.fetch_parallelism,
                &on_progress,
            ) {
                Ok(matrix) => Delta::SetHeatmap(matrix),
                Err(err) => Delta::HeatmapFailed(format!("{err:#}")),
            };
            let _ = tx.send(delta);
        }
        ProviderCommand::Export {
            path,
            streaks,
            matchup,
            heatmap,
        } => {
            let _ = tx.send(export_delta(path, streaks, matchup, heatmap));
            return;
        }
    }
    flush_cache(tx);
}

fn fetch_streaks(source: &dyn DataSource, config: &AppConfig, tx: &Sender<Delta>) {
    let options = StreakOptions {
        min_total_bases: config.min_total_bases,
        game_log_limit: config.game_log_limit,
        parallelism: config.fetch_parallelism,
    };
    let progress_tx = tx.clone();
    let on_progress = move |progress: tables::StreakProgress| {
        let _ = progress_tx.send(Delta::StreaksProgress(Progress {
            current: progress.current,
            total: progress.total,
        }));
    };
    let delta = match tables::build_streak_table(source, options, &on_progress) {
        Ok(table) => Delta::SetStreaks(table),
        Err(err) => Delta::StreaksFailed(format!("{err:#}")),
    };
    let _ = tx.send(delta);
}

fn export_delta(
    path: PathBuf,
    streaks: Option<StreakTable>,
    matchup: Option<MatchupSummary>,
    heatmap: Option<PairwiseMatrix>,
) -> Delta {
    match export::export_workbook(&path, streaks.as_ref(), matchup.as_ref(), heatmap.as_ref()) {
        Ok(report) => Delta::export_finished(path, &report),
        Err(err) => Delta::ExportFailed(format!("{err:#}")),
    }
}

fn flush_cache(tx: &Sender<Delta>) {
    if let Err(err) = http_cache::flush() {
        warn!(error = %err, "http cache flush failed");
        let _ = tx.send(Delta::Log(format!("[WARN] Cache write failed: {err}")));
    }
}
