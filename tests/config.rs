use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use mlb_streak_terminal::config::{AppConfig, detect_season};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn resolve(vars: &[(&str, &str)], today: NaiveDate) -> AppConfig {
    let vars = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<HashMap<_, _>>();
    AppConfig::resolve(|key| vars.get(key).cloned(), today)
}

#[test]
fn season_rolls_back_before_march() {
    assert_eq!(detect_season(day(2026, 1, 15)), 2025);
    assert_eq!(detect_season(day(2026, 2, 28)), 2025);
    assert_eq!(detect_season(day(2026, 3, 1)), 2026);
    assert_eq!(detect_season(day(2026, 10, 19)), 2026);
}

#[test]
fn defaults_without_environment() {
    let config = resolve(&[], day(2025, 7, 1));
    assert_eq!(config.season, 2025);
    assert_eq!(config.min_total_bases, 2);
    assert_eq!(config.game_log_limit, 20);
    assert_eq!(config.matchup_threshold, 8.5);
    assert_eq!(config.matchup_max_games, 10);
    assert!(config.heatmap_enabled);
    assert_eq!(config.roster_ttl, Duration::from_secs(86_400));
    assert_eq!(config.game_log_ttl, Duration::from_secs(3_600));
    assert_eq!(config.streaks_refresh, Duration::from_secs(3_600));
    assert_eq!(config.fetch_parallelism, 6);
    assert_eq!(config.export_dir, PathBuf::from("."));
}

#[test]
fn overrides_are_parsed_and_clamped() {
    let config = resolve(
        &[
            ("STREAK_SEASON", "2023"),
            ("STREAK_MIN_TOTAL_BASES", "3"),
            ("GAME_LOG_LIMIT", "500"),
            ("MATCHUP_THRESHOLD", "9.5"),
            ("MATCHUP_MAX_GAMES", "0"),
            ("HEATMAP_ENABLED", "off"),
            ("ROSTER_TTL_SECS", "5"),
            ("STREAKS_REFRESH_SECS", "60"),
            ("FETCH_PARALLELISM", "64"),
            ("EXPORT_DIR", "/tmp/exports"),
        ],
        day(2025, 7, 1),
    );
    assert_eq!(config.season, 2023);
    assert_eq!(config.min_total_bases, 3);
    assert_eq!(config.game_log_limit, 162);
    assert_eq!(config.matchup_threshold, 9.5);
    assert_eq!(config.matchup_max_games, 1);
    assert!(!config.heatmap_enabled);
    assert_eq!(config.roster_ttl, Duration::from_secs(60));
    assert_eq!(config.streaks_refresh, Duration::from_secs(300));
    assert_eq!(config.fetch_parallelism, 32);
    assert_eq!(config.export_dir, PathBuf::from("/tmp/exports"));
}

#[test]
fn bad_values_fall_back_to_defaults() {
    let config = resolve(
        &[
            ("STREAK_SEASON", "next year"),
            ("STREAK_MIN_TOTAL_BASES", "-1"),
            ("MATCHUP_THRESHOLD", "-3"),
            ("HEATMAP_ENABLED", "yes"),
            ("EXPORT_DIR", "  "),
        ],
        day(2026, 2, 1),
    );
    assert_eq!(config.season, 2025);
    assert_eq!(config.min_total_bases, 2);
    assert_eq!(config.matchup_threshold, 8.5);
    assert!(config.heatmap_enabled);
    assert_eq!(config.export_dir, PathBuf::from("."));

    let ancient = resolve(&[("STREAK_SEASON", "1800")], day(2025, 7, 1));
    assert_eq!(ancient.season, 2025);
}
