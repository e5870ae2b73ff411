use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::http_cache::fetch_json_cached;
use crate::http_client::http_client;
use crate::source::{
    DataSource, HeadToHead, Participant, ParticipantListing, ScoredGame, SkipReason, SkippedGame,
};
use crate::streaks::GameRecord;

pub const STATSAPI_BASE: &str = "https://statsapi.mlb.com/api/v1";

pub const HITTER_POSITIONS: [&str; 9] = ["DH", "1B", "2B", "3B", "SS", "LF", "CF", "RF", "C"];

#[derive(Debug, Error)]
pub enum StatsApiError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("invalid json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
}

impl StatsApiError {
    pub fn skip_reason(&self) -> SkipReason {
        match self {
            StatsApiError::Request(reason) => SkipReason::NotFetched(reason.clone()),
            other => SkipReason::Unparseable(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatsApi {
    season: i32,
    roster_ttl: Duration,
    game_log_ttl: Duration,
}

impl StatsApi {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            season: config.season,
            roster_ttl: config.roster_ttl,
            game_log_ttl: config.game_log_ttl,
        }
    }

    pub fn season(&self) -> i32 {
        self.season
    }

    fn get(&self, url: &str, ttl: Duration) -> std::result::Result<String, StatsApiError> {
        let client = http_client().map_err(|err| StatsApiError::Request(format!("{err:#}")))?;
        fetch_json_cached(client, url, ttl).map_err(|err| StatsApiError::Request(format!("{err:#}")))
    }

    fn fetch_teams(&self) -> Result<Vec<TeamInfo>> {
        let url = format!("{STATSAPI_BASE}/teams?sportId=1&season={}", self.season);
        let body = self.get(&url, self.roster_ttl)?;
        Ok(parse_teams_json(&body)?)
    }

    fn fetch_roster(&self, team: &TeamInfo) -> Result<Vec<Participant>> {
        let url = format!(
            "{STATSAPI_BASE}/teams/{}/roster?rosterType=active&season={}",
            team.id, self.season
        );
        let body = self.get(&url, self.roster_ttl)?;
        Ok(parse_roster_json(&body, &team.name)?)
    }

    fn fetch_linescore(&self, game_pk: u64) -> std::result::Result<(u32, u32), StatsApiError> {
        let url = format!("{STATSAPI_BASE}/game/{game_pk}/linescore");
        let body = self.get(&url, self.game_log_ttl)?;
        parse_linescore_json(&body)
    }
}

impl DataSource for StatsApi {
    fn list_participants(&self) -> Result<ParticipantListing> {
        let teams = self.fetch_teams().context("teams fetch failed")?;
        let rosters: Vec<(&TeamInfo, Result<Vec<Participant>>)> = teams
            .par_iter()
            .map(|team| (team, self.fetch_roster(team)))
            .collect();

        let mut listing = ParticipantListing::default();
        for (team, roster) in rosters {
            match roster {
                Ok(players) => listing.participants.extend(players),
                Err(err) => {
                    warn!(team = %team.name, error = %err, "roster fetch failed");
                    listing.errors.push(format!("{} roster failed: {err:#}", team.name));
                }
            }
        }
        debug!(
            players = listing.participants.len(),
            failed_teams = listing.errors.len(),
            "active hitters listed"
        );
        Ok(listing)
    }

    fn list_teams(&self) -> Result<Vec<Participant>> {
        let mut teams = self
            .fetch_teams()
            .context("teams fetch failed")?
            .into_iter()
            .map(TeamInfo::into_participant)
            .collect::<Vec<_>>();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teams)
    }

    fn fetch_recent_games(&self, participant_id: u64, limit: usize) -> Result<Vec<GameRecord>> {
        let url = format!(
            "{STATSAPI_BASE}/people/{participant_id}/stats?stats=gameLog&group=hitting&season={}",
            self.season
        );
        let body = self.get(&url, self.game_log_ttl)?;
        Ok(parse_game_log_json(&body, limit)?)
    }

    fn fetch_head_to_head(&self, id_a: u64, id_b: u64, max_games: usize) -> Result<HeadToHead> {
        let url = format!(
            "{STATSAPI_BASE}/schedule?sportId=1&gameType=R&season={}&teamId={id_a}&opponentId={id_b}",
            self.season
        );
        let body = self.get(&url, self.game_log_ttl)?;
        let candidates = parse_schedule_json(&body)?;
        Ok(resolve_head_to_head(candidates, max_games, |game_pk| {
            self.fetch_linescore(game_pk)
        }))
    }
}

/// Scores the `max_games` most recent candidates, asking `linescore` for any
/// game the schedule left unscored. Games it cannot score are skipped with
/// the reason attached.
pub fn resolve_head_to_head(
    candidates: Vec<ScheduleGame>,
    max_games: usize,
    linescore: impl Fn(u64) -> std::result::Result<(u32, u32), StatsApiError>,
) -> HeadToHead {
    let mut out = HeadToHead::default();
    for game in candidates.into_iter().take(max_games) {
        let score = match (game.away_runs, game.home_runs) {
            (Some(away_runs), Some(home_runs)) => Ok((away_runs, home_runs)),
            _ => linescore(game.game_pk),
        };
        match score {
            Ok((away_runs, home_runs)) => out.games.push(game.scored(away_runs, home_runs)),
            Err(err) => {
                warn!(game_pk = game.game_pk, error = %err, "skipping game without score");
                out.skipped.push(SkippedGame {
                    game_pk: game.game_pk,
                    reason: err.skip_reason(),
                });
            }
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamInfo {
    pub id: u64,
    pub name: String,
    pub abbreviation: Option<String>,
    pub league: String,
}

impl TeamInfo {
    fn into_participant(self) -> Participant {
        Participant {
            id: self.id,
            name: self.name,
            group: self.league,
            short: self.abbreviation,
        }
    }
}

/// A final game from the schedule feed; scores may be absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleGame {
    pub game_pk: u64,
    pub date: Option<NaiveDate>,
    pub away: String,
    pub home: String,
    pub away_runs: Option<u32>,
    pub home_runs: Option<u32>,
}

impl ScheduleGame {
    fn scored(&self, away_runs: u32, home_runs: u32) -> ScoredGame {
        ScoredGame {
            game_pk: self.game_pk,
            date: self.date,
            away: self.away.clone(),
            home: self.home.clone(),
            away_runs,
            home_runs,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    #[serde(default)]
    teams: Vec<ApiTeam>,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    id: u64,
    name: String,
    #[serde(default)]
    abbreviation: Option<String>,
    #[serde(default)]
    league: Option<ApiNamed>,
    #[serde(default = "default_true")]
    active: bool,
}

#[derive(Debug, Deserialize)]
struct ApiNamed {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RosterResponse {
    #[serde(default)]
    roster: Vec<RosterEntry>,
}

#[derive(Debug, Deserialize)]
struct RosterEntry {
    person: ApiPerson,
    #[serde(default)]
    position: Option<ApiPosition>,
}

#[derive(Debug, Deserialize)]
struct ApiPerson {
    id: u64,
    #[serde(rename = "fullName")]
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct ApiPosition {
    #[serde(default)]
    abbreviation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    stats: Vec<StatsBlock>,
}

#[derive(Debug, Deserialize)]
struct StatsBlock {
    #[serde(default)]
    splits: Vec<GameLogSplit>,
}

#[derive(Debug, Deserialize)]
struct GameLogSplit {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    game: Option<ApiGameRef>,
    #[serde(default)]
    stat: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ApiGameRef {
    #[serde(rename = "gamePk")]
    game_pk: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    #[serde(default)]
    dates: Vec<ScheduleDate>,
}

#[derive(Debug, Deserialize)]
struct ScheduleDate {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    games: Vec<ApiScheduleGame>,
}

#[derive(Debug, Deserialize)]
struct ApiScheduleGame {
    #[serde(rename = "gamePk")]
    game_pk: u64,
    #[serde(rename = "officialDate", default)]
    official_date: Option<String>,
    status: ApiStatus,
    teams: ApiScheduleTeams,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(rename = "abstractGameState", default)]
    abstract_game_state: String,
    #[serde(rename = "detailedState", default)]
    detailed_state: String,
}

#[derive(Debug, Deserialize)]
struct ApiScheduleTeams {
    away: ApiScheduleSide,
    home: ApiScheduleSide,
}

#[derive(Debug, Deserialize)]
struct ApiScheduleSide {
    #[serde(default)]
    score: Option<u32>,
    team: ApiNamed,
}

fn default_true() -> bool {
    true
}

pub fn parse_teams_json(raw: &str) -> std::result::Result<Vec<TeamInfo>, StatsApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let data: TeamsResponse = serde_json::from_str(trimmed)?;
    Ok(data
        .teams
        .into_iter()
        .filter(|team| team.active)
        .map(|team| TeamInfo {
            id: team.id,
            name: team.name,
            abbreviation: team.abbreviation.filter(|abbr| !abbr.trim().is_empty()),
            league: team.league.and_then(|l| l.name).unwrap_or_default(),
        })
        .collect())
}

/// Active-roster hitters only; pitchers and two-way listings are skipped.
pub fn parse_roster_json(raw: &str, team_name: &str) -> std::result::Result<Vec<Participant>, StatsApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let data: RosterResponse = serde_json::from_str(trimmed)?;
    Ok(data
        .roster
        .into_iter()
        .filter(|entry| {
            entry
                .position
                .as_ref()
                .and_then(|p| p.abbreviation.as_deref())
                .is_some_and(|abbr| HITTER_POSITIONS.contains(&abbr))
        })
        .map(|entry| Participant::new(entry.person.id, entry.person.full_name, team_name))
        .collect())
}

/// Game log records, most recent first, capped at `limit`.
///
/// The feed lists splits oldest first. Reversing keeps the played order within a
/// date (doubleheaders, makeup games with older pks) before the stable date sort.
pub fn parse_game_log_json(raw: &str, limit: usize) -> std::result::Result<Vec<GameRecord>, StatsApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let data: StatsResponse = serde_json::from_str(trimmed)?;
    let Some(block) = data.stats.into_iter().next() else {
        return Ok(Vec::new());
    };

    let mut records = block
        .splits
        .into_iter()
        .rev()
        .map(|split| GameRecord {
            date: split.date.as_deref().and_then(parse_date),
            game_pk: split.game.and_then(|g| g.game_pk),
            statistics: split
                .stat
                .iter()
                .filter_map(|(key, value)| stat_number(value).map(|n| (key.clone(), n)))
                .collect(),
        })
        .collect::<Vec<_>>();
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records.truncate(limit);
    Ok(records)
}

/// Completed games from a schedule payload, most recent first.
pub fn parse_schedule_json(raw: &str) -> std::result::Result<Vec<ScheduleGame>, StatsApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let data: ScheduleResponse = serde_json::from_str(trimmed)?;
    let mut games = Vec::new();
    for day in data.dates {
        let day_date = day.date.as_deref().and_then(parse_date);
        for game in day.games {
            if !is_completed(&game.status) {
                continue;
            }
            games.push(ScheduleGame {
                game_pk: game.game_pk,
                date: game
                    .official_date
                    .as_deref()
                    .and_then(parse_date)
                    .or(day_date),
                away: team_name(&game.teams.away.team),
                home: team_name(&game.teams.home.team),
                away_runs: game.teams.away.score,
                home_runs: game.teams.home.score,
            });
        }
    }
    games.sort_by(|a, b| (b.date, b.game_pk).cmp(&(a.date, a.game_pk)));
    Ok(games)
}

/// `(away_runs, home_runs)` from a linescore payload.
pub fn parse_linescore_json(raw: &str) -> std::result::Result<(u32, u32), StatsApiError> {
    let root: Value = serde_json::from_str(raw.trim())?;
    let teams = root.get("teams").ok_or(StatsApiError::MissingField("teams"))?;
    let away = teams
        .get("away")
        .and_then(|t| t.get("runs"))
        .and_then(stat_number)
        .ok_or(StatsApiError::MissingField("teams.away.runs"))?;
    let home = teams
        .get("home")
        .and_then(|t| t.get("runs"))
        .and_then(stat_number)
        .ok_or(StatsApiError::MissingField("teams.home.runs"))?;
    Ok((away.max(0.0) as u32, home.max(0.0) as u32))
}

fn is_completed(status: &ApiStatus) -> bool {
    if !status.abstract_game_state.eq_ignore_ascii_case("final") {
        return false;
    }
    let detailed = status.detailed_state.to_ascii_lowercase();
    !(detailed.contains("postponed") || detailed.contains("cancelled") || detailed.contains("suspended"))
}

fn team_name(team: &ApiNamed) -> String {
    team.name
        .clone()
        .or_else(|| team.id.map(|id| format!("Team {id}")))
        .unwrap_or_default()
}

// Counting stats arrive as numbers, rate stats as strings like ".312".
fn stat_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
