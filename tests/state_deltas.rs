use std::path::PathBuf;
use std::time::Duration;

use mlb_streak_terminal::matchup::{
    PairwiseAggregate, PairwiseCell, PairwiseMatrix, summarize_matchup,
};
use mlb_streak_terminal::source::{HeadToHead, Participant, ScoredGame, SkipReason, SkippedGame};
use mlb_streak_terminal::state::{AppState, Delta, Progress, apply_delta, heat_bucket};
use mlb_streak_terminal::streaks::{PlayerStreaks, StreakRow};
use mlb_streak_terminal::tables::StreakTable;

fn team(id: u64, name: &str) -> Participant {
    Participant::new(id, name, "League")
}

fn table(rows: usize) -> StreakTable {
    StreakTable {
        rows: (0..rows)
            .map(|i| StreakRow {
                player_id: i as u64,
                player: format!("Player {i}"),
                team: "Team".to_string(),
                streaks: PlayerStreaks {
                    hitting: 3,
                    ..PlayerStreaks::default()
                },
            })
            .collect(),
        min_total_bases: 3,
        players_checked: 40,
        errors: vec!["Player X game log failed: http 503".to_string()],
    }
}

#[test]
fn streak_deltas_update_loading_and_logs() {
    let mut state = AppState::new();
    assert!(state.streaks_stale(Duration::from_secs(3_600)));

    apply_delta(&mut state, Delta::StreaksProgress(Progress { current: 4, total: 40 }));
    assert!(state.streaks_loading);
    assert_eq!(state.streaks_progress.current, 4);
    assert!(!state.streaks_stale(Duration::from_secs(3_600)));

    state.selected = 99;
    apply_delta(&mut state, Delta::SetStreaks(table(2)));
    assert!(!state.streaks_loading);
    assert_eq!(state.min_total_bases, 3);
    assert_eq!(state.selected, 1);
    assert!(state.streaks_fetched_at.is_some());
    assert!(!state.streaks_stale(Duration::from_secs(3_600)));
    assert!(state.streaks_stale(Duration::ZERO));

    let logs = state.logs.iter().cloned().collect::<Vec<_>>();
    assert!(logs.iter().any(|l| l == "[INFO] Streaks: 2 live of 40 hitters"));
    assert!(logs.iter().any(|l| l == "[WARN] Streak fetch errors: 1 (Player X game log failed: http 503)"));
}

#[test]
fn failed_streak_fetch_is_logged() {
    let mut state = AppState::new();
    state.streaks_loading = true;
    apply_delta(&mut state, Delta::StreaksFailed("teams fetch failed".to_string()));
    assert!(!state.streaks_loading);
    assert!(state.streaks.is_none());
    assert_eq!(
        state.logs.back().map(String::as_str),
        Some("[WARN] Streaks error: teams fetch failed")
    );
}

#[test]
fn set_teams_keeps_the_current_pair() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetTeams(vec![team(1, "A"), team(2, "B"), team(3, "C")]),
    );
    assert_eq!(state.matchup_a, 0);
    assert_eq!(state.matchup_b, 1);

    state.matchup_b = 2;
    apply_delta(
        &mut state,
        Delta::SetTeams(vec![team(3, "C"), team(0, "Z"), team(1, "A")]),
    );
    let (a, b) = state.matchup_pair().expect("distinct pair");
    assert_eq!(a.id, 1);
    assert_eq!(b.id, 3);
}

#[test]
fn matchup_picker_cycles_and_rejects_same_team() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetTeams(vec![team(1, "A"), team(2, "B")]));
    state.screen = mlb_streak_terminal::state::Screen::Matchup;
    state.select_next();
    assert_eq!(state.matchup_a, 1);
    assert!(state.matchup_pair().is_none());
    state.toggle_matchup_side();
    state.select_prev();
    assert_eq!(state.matchup_b, 0);
    assert!(state.matchup_pair().is_some());

    state.lower_threshold();
    assert_eq!(state.threshold, 8.0);
    for _ in 0..40 {
        state.lower_threshold();
    }
    assert_eq!(state.threshold, 0.0);
    state.raise_threshold();
    assert_eq!(state.threshold, 0.5);
}

#[test]
fn matchup_delta_reports_no_data_and_skips() {
    let mut state = AppState::new();
    state.matchup_loading = true;
    let h2h = HeadToHead {
        games: Vec::new(),
        skipped: vec![SkippedGame {
            game_pk: 5,
            reason: SkipReason::NotFetched("timeout".to_string()),
        }],
    };
    let summary = summarize_matchup(&team(1, "A"), &team(2, "B"), 8.5, &h2h);
    apply_delta(&mut state, Delta::SetMatchup(summary));

    assert!(!state.matchup_loading);
    assert!(state.matchup.is_some());
    let logs = state.logs.iter().cloned().collect::<Vec<_>>();
    assert!(logs.iter().any(|l| l == "[INFO] A vs B: no completed games"));
    assert!(logs.iter().any(|l| l.contains("1 not fetched, 0 unparseable")));
}

#[test]
fn matchup_delta_reports_overs() {
    let mut state = AppState::new();
    let h2h = HeadToHead {
        games: vec![ScoredGame {
            game_pk: 1,
            date: None,
            away: "A".to_string(),
            home: "B".to_string(),
            away_runs: 6,
            home_runs: 5,
        }],
        skipped: Vec::new(),
    };
    let summary = summarize_matchup(&team(1, "A"), &team(2, "B"), 8.5, &h2h);
    apply_delta(&mut state, Delta::SetMatchup(summary));
    assert_eq!(
        state.logs.back().map(String::as_str),
        Some("[INFO] A vs B: 1 of 1 over 8.5")
    );
}

#[test]
fn heatmap_deltas_track_progress() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::HeatmapProgress(Progress { current: 3, total: 6 }));
    assert!(state.heatmap_loading);

    let matrix = PairwiseMatrix {
        participants: vec![team(1, "A"), team(2, "B"), team(3, "C")],
        threshold: 8.5,
        cells: vec![PairwiseCell {
            team_a: 1,
            team_b: 2,
            aggregate: PairwiseAggregate {
                games: 4,
                overs: 1,
                over_fraction: 0.25,
            },
        }],
        skipped_games: 2,
        errors: Vec::new(),
    };
    apply_delta(&mut state, Delta::SetHeatmap(matrix));
    assert!(!state.heatmap_loading);
    let logs = state.logs.iter().cloned().collect::<Vec<_>>();
    assert!(logs.iter().any(|l| l == "[INFO] Heatmap: 1 of 6 pairs with games"));
    assert!(logs.iter().any(|l| l.starts_with("[WARN] Heatmap skipped 2 games")));
}

#[test]
fn export_deltas_update_status() {
    let mut state = AppState::new();
    state.export.active = true;
    apply_delta(
        &mut state,
        Delta::ExportFinished {
            path: PathBuf::from("out.xlsx"),
            streak_rows: 4,
            matchup_rows: 3,
            heatmap_cells: 0,
        },
    );
    assert!(!state.export.active);
    assert_eq!(state.export.path, Some(PathBuf::from("out.xlsx")));
    assert_eq!(state.export.message, "Exported 4 streaks, 3 games, 0 cells");

    state.export.active = true;
    apply_delta(&mut state, Delta::ExportFailed("disk full".to_string()));
    assert!(!state.export.active);
    assert_eq!(state.export.message, "Export failed: disk full");
}

#[test]
fn log_buffer_is_bounded() {
    let mut state = AppState::new();
    for i in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] line 50"));
}

#[test]
fn heat_buckets_span_under_to_over() {
    assert_eq!(heat_bucket(0.0), 0);
    assert_eq!(heat_bucket(0.4), 1);
    assert_eq!(heat_bucket(0.5), 2);
    assert_eq!(heat_bucket(0.6), 3);
    assert_eq!(heat_bucket(1.0), 4);
}
