use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use mlb_streak_terminal::matchup::{
    MatchupGame, OverUnder, aggregate, build_pairwise_matrix, classify, summarize_matchup,
};
use mlb_streak_terminal::source::{HeadToHead, Participant, ScoredGame, SkipReason, SkippedGame};

fn team(id: u64, short: &str) -> Participant {
    Participant {
        short: Some(short.to_string()),
        ..Participant::new(id, format!("Team {short}"), "League")
    }
}

fn scored(game_pk: u64, away_runs: u32, home_runs: u32) -> ScoredGame {
    ScoredGame {
        game_pk,
        date: None,
        away: "Away".to_string(),
        home: "Home".to_string(),
        away_runs,
        home_runs,
    }
}

#[test]
fn landing_on_the_line_is_under() {
    assert_eq!(classify(&MatchupGame::new(8.5, 8.5)), OverUnder::Under);
    assert_eq!(classify(&MatchupGame::new(9.0, 8.5)), OverUnder::Over);
    assert_eq!(classify(&MatchupGame::new(8.0, 8.0)), OverUnder::Under);
}

#[test]
fn no_games_differs_from_zero_percent() {
    assert_eq!(aggregate(&[]), None);

    let unders = [MatchupGame::new(3.0, 8.5), MatchupGame::new(8.5, 8.5)];
    let agg = aggregate(&unders).expect("two games aggregate");
    assert_eq!(agg.games, 2);
    assert_eq!(agg.overs, 0);
    assert_eq!(agg.over_fraction, 0.0);
}

#[test]
fn extreme_scores_total_without_overflow() {
    let game = scored(1, u32::MAX, u32::MAX);
    assert_eq!(game.total_runs(), 2.0 * f64::from(u32::MAX));
    assert_eq!(classify(&MatchupGame::new(game.total_runs(), 8.5)), OverUnder::Over);
}

#[test]
fn aggregate_ignores_order() {
    let games = [
        MatchupGame::new(12.0, 8.5),
        MatchupGame::new(4.0, 8.5),
        MatchupGame::new(9.0, 8.5),
    ];
    let mut reversed = games;
    reversed.reverse();
    assert_eq!(aggregate(&games), aggregate(&reversed));
    let agg = aggregate(&games).expect("games present");
    assert!((agg.over_fraction - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn summary_rows_and_skip_counts() {
    let a = team(1, "NYY");
    let b = team(2, "BOS");
    let h2h = HeadToHead {
        games: vec![scored(10, 7, 4), scored(9, 3, 5)],
        skipped: vec![
            SkippedGame {
                game_pk: 8,
                reason: SkipReason::NotFetched("timeout".to_string()),
            },
            SkippedGame {
                game_pk: 7,
                reason: SkipReason::Unparseable("missing field".to_string()),
            },
            SkippedGame {
                game_pk: 6,
                reason: SkipReason::Unparseable("missing field".to_string()),
            },
        ],
    };
    let summary = summarize_matchup(&a, &b, 8.5, &h2h);
    assert_eq!(summary.rows.len(), 2);
    assert_eq!(summary.rows[0].total, 11.0);
    assert_eq!(summary.rows[0].result, OverUnder::Over);
    assert_eq!(summary.rows[1].total, 8.0);
    assert_eq!(summary.rows[1].result, OverUnder::Under);
    let agg = summary.aggregate.expect("two games");
    assert_eq!(agg.overs, 1);
    assert_eq!(summary.not_fetched, 1);
    assert_eq!(summary.unparseable, 2);
    assert_eq!(summary.skipped(), 3);
}

#[test]
fn summary_without_games_has_no_aggregate() {
    let summary = summarize_matchup(&team(1, "A"), &team(2, "B"), 8.5, &HeadToHead::default());
    assert!(summary.rows.is_empty());
    assert_eq!(summary.aggregate, None);
    assert_eq!(summary.skipped(), 0);
}

#[test]
fn matrix_skips_self_pairs_and_empty_pairs() {
    let teams = vec![team(1, "A"), team(2, "B"), team(3, "C"), team(4, "D")];
    let mut schedule: HashMap<(u64, u64), Vec<ScoredGame>> = HashMap::new();
    schedule.insert((1, 2), vec![scored(1, 6, 5), scored(2, 1, 2)]);
    schedule.insert((2, 1), vec![scored(1, 6, 5)]);
    schedule.insert((3, 4), vec![scored(3, 2, 2)]);

    let calls = AtomicUsize::new(0);
    let last_progress = AtomicUsize::new(0);
    let matrix = build_pairwise_matrix(
        &teams,
        8.5,
        10,
        |a, b, _max| {
            calls.fetch_add(1, Ordering::Relaxed);
            assert_ne!(a.id, b.id);
            Ok(HeadToHead {
                games: schedule.get(&(a.id, b.id)).cloned().unwrap_or_default(),
                skipped: Vec::new(),
            })
        },
        &|current, total| {
            assert!(current <= total);
            last_progress.fetch_max(current, Ordering::Relaxed);
        },
    );

    let n = teams.len();
    assert_eq!(calls.load(Ordering::Relaxed), n * (n - 1));
    assert_eq!(last_progress.load(Ordering::Relaxed), n * (n - 1));
    assert!(matrix.cells.len() <= matrix.max_cells());
    assert!(matrix.cells.iter().all(|c| c.team_a != c.team_b));
    assert_eq!(matrix.cells.len(), 3);

    let ab = matrix.get(1, 2).expect("A vs B has games");
    assert_eq!(ab.aggregate.games, 2);
    assert_eq!(ab.over_fraction(), 0.5);
    let ba = matrix.get(2, 1).expect("B vs A has games");
    assert_eq!(ba.over_fraction(), 1.0);
    let cd = matrix.get(3, 4).expect("C vs D has games");
    assert_eq!(cd.over_fraction(), 0.0);
    assert!(matrix.get(4, 3).is_none());
    assert!(matrix.get(1, 1).is_none());

    let order = matrix
        .cells
        .iter()
        .map(|c| (c.team_a, c.team_b))
        .collect::<Vec<_>>();
    assert_eq!(order, vec![(1, 2), (2, 1), (3, 4)]);
}

#[test]
fn matrix_caps_games_and_records_failures() {
    let teams = vec![team(1, "A"), team(2, "B")];
    let fetch = |a: &Participant, _b: &Participant, _max: usize| -> Result<HeadToHead> {
        if a.id == 2 {
            return Err(anyhow!("schedule unavailable"));
        }
        Ok(HeadToHead {
            games: vec![scored(3, 9, 9), scored(2, 0, 1), scored(1, 0, 1)],
            skipped: vec![SkippedGame {
                game_pk: 99,
                reason: SkipReason::NotFetched("503".to_string()),
            }],
        })
    };
    let matrix = build_pairwise_matrix(&teams, 8.5, 2, fetch, &|_, _| {});

    assert_eq!(matrix.cells.len(), 1);
    let cell = matrix.get(1, 2).expect("A vs B present");
    assert_eq!(cell.aggregate.games, 2);
    assert_eq!(cell.aggregate.overs, 1);
    assert_eq!(matrix.skipped_games, 1);
    assert_eq!(matrix.errors.len(), 1);
    assert!(matrix.errors[0].contains("schedule unavailable"));
}

#[test]
fn single_participant_matrix_is_empty() {
    let matrix = build_pairwise_matrix(
        &[team(1, "A")],
        8.5,
        10,
        |_, _, _| Ok(HeadToHead::default()),
        &|_, _| {},
    );
    assert!(matrix.cells.is_empty());
    assert_eq!(matrix.max_cells(), 0);
}
