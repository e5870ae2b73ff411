use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};

use crate::matchup::{DEFAULT_MAX_GAMES, DEFAULT_THRESHOLD};
use crate::streaks::DEFAULT_MIN_TOTAL_BASES;

pub const DEFAULT_GAME_LOG_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub season: i32,
    pub min_total_bases: u32,
    pub game_log_limit: usize,
    pub matchup_threshold: f64,
    pub matchup_max_games: usize,
    pub heatmap_enabled: bool,
    pub roster_ttl: Duration,
    pub game_log_ttl: Duration,
    pub streaks_refresh: Duration,
    pub fetch_parallelism: usize,
    pub export_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::resolve(|key| env::var(key).ok(), Local::now().date_naive())
    }

    /// Resolves every setting from `lookup`, falling back to defaults for
    /// missing or unparseable values.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>, today: NaiveDate) -> Self {
        let season = lookup("STREAK_SEASON")
            .and_then(|val| val.trim().parse::<i32>().ok())
            .filter(|year| (1876..=2100).contains(year))
            .unwrap_or_else(|| detect_season(today));
        let min_total_bases = parse_or(&lookup, "STREAK_MIN_TOTAL_BASES", DEFAULT_MIN_TOTAL_BASES)
            .clamp(1, 10);
        let game_log_limit =
            parse_or(&lookup, "GAME_LOG_LIMIT", DEFAULT_GAME_LOG_LIMIT).clamp(1, 162);
        let matchup_threshold = parse_or(&lookup, "MATCHUP_THRESHOLD", DEFAULT_THRESHOLD);
        let matchup_threshold = if matchup_threshold.is_finite() && matchup_threshold >= 0.0 {
            matchup_threshold
        } else {
            DEFAULT_THRESHOLD
        };
        let matchup_max_games =
            parse_or(&lookup, "MATCHUP_MAX_GAMES", DEFAULT_MAX_GAMES).clamp(1, 50);
        let heatmap_enabled = lookup("HEATMAP_ENABLED")
            .map(|val| parse_flag(&val))
            .unwrap_or(true);
        let roster_ttl = parse_or(&lookup, "ROSTER_TTL_SECS", 86_400u64).max(60);
        let game_log_ttl = parse_or(&lookup, "GAME_LOG_TTL_SECS", 3_600u64).max(60);
        let streaks_refresh = parse_or(&lookup, "STREAKS_REFRESH_SECS", 3_600u64).max(300);
        let fetch_parallelism = parse_or(&lookup, "FETCH_PARALLELISM", 6usize).clamp(2, 32);
        let export_dir = lookup("EXPORT_DIR")
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            season,
            min_total_bases,
            game_log_limit,
            matchup_threshold,
            matchup_max_games,
            heatmap_enabled,
            roster_ttl: Duration::from_secs(roster_ttl),
            game_log_ttl: Duration::from_secs(game_log_ttl),
            streaks_refresh: Duration::from_secs(streaks_refresh),
            fetch_parallelism,
            export_dir,
        }
    }
}

/// Before March there are no regular-season games yet, so the dashboard shows
/// the previous season.
pub fn detect_season(today: NaiveDate) -> i32 {
    if today.month() < 3 {
        today.year() - 1
    } else {
        today.year()
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
