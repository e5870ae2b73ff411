use std::collections::{BTreeSet, VecDeque};
use std::path::PathBuf;
use std::time::Instant;

use crate::config::AppConfig;
use crate::export::ExportReport;
use crate::matchup::{DEFAULT_MAX_GAMES, DEFAULT_THRESHOLD, MatchupSummary, PairwiseMatrix};
use crate::source::Participant;
use crate::streaks::{DEFAULT_MIN_TOTAL_BASES, StreakKind, StreakRow};
use crate::tables::StreakTable;

pub const MIN_LENGTH_RANGE: (usize, usize) = (1, 15);
pub const DEFAULT_MIN_LENGTH: usize = 2;
const THRESHOLD_STEP: f64 = 0.5;
const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Streaks,
    Matchup,
    Heatmap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchupSide {
    TeamA,
    TeamB,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub sort: StreakKind,
    pub min_length: usize,
    pub min_total_bases: u32,
    pub team_filter: BTreeSet<String>,
    pub team_picker: Option<usize>,
    pub selected: usize,
    pub streaks: Option<StreakTable>,
    pub streaks_loading: bool,
    pub streaks_progress: Progress,
    pub streaks_fetched_at: Option<Instant>,
    pub teams: Vec<Participant>,
    pub matchup_a: usize,
    pub matchup_b: usize,
    pub matchup_side: MatchupSide,
    pub threshold: f64,
    pub max_games: usize,
    pub matchup: Option<MatchupSummary>,
    pub matchup_loading: bool,
    pub heatmap_enabled: bool,
    pub heatmap: Option<PairwiseMatrix>,
    pub heatmap_loading: bool,
    pub heatmap_progress: Progress,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub export: ExportState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Streaks,
            sort: StreakKind::Hitting,
            min_length: DEFAULT_MIN_LENGTH,
            min_total_bases: DEFAULT_MIN_TOTAL_BASES,
            team_filter: BTreeSet::new(),
            team_picker: None,
            selected: 0,
            streaks: None,
            streaks_loading: false,
            streaks_progress: Progress::default(),
            streaks_fetched_at: None,
            teams: Vec::new(),
            matchup_a: 0,
            matchup_b: 1,
            matchup_side: MatchupSide::TeamA,
            threshold: DEFAULT_THRESHOLD,
            max_games: DEFAULT_MAX_GAMES,
            matchup: None,
            matchup_loading: false,
            heatmap_enabled: true,
            heatmap: None,
            heatmap_loading: false,
            heatmap_progress: Progress::default(),
            logs: VecDeque::new(),
            help_overlay: false,
            export: ExportState::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            min_total_bases: config.min_total_bases,
            threshold: config.matchup_threshold,
            max_games: config.matchup_max_games,
            heatmap_enabled: config.heatmap_enabled,
            ..Self::new()
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn cycle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Streaks => Screen::Matchup,
            Screen::Matchup if self.heatmap_enabled => Screen::Heatmap,
            Screen::Matchup | Screen::Heatmap => Screen::Streaks,
        };
    }

    /// Rows the streak table currently shows, after the minimum length and
    /// team filters, sorted by the active column (longest first).
    pub fn visible_streak_rows(&self) -> Vec<&StreakRow> {
        let Some(table) = &self.streaks else {
            return Vec::new();
        };
        let mut rows = table
            .rows
            .iter()
            .filter(|row| row.get(self.sort) >= self.min_length)
            .filter(|row| self.team_filter.is_empty() || self.team_filter.contains(&row.team))
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| {
            b.get(self.sort)
                .cmp(&a.get(self.sort))
                .then_with(|| a.player.cmp(&b.player))
        });
        rows
    }

    pub fn streak_teams(&self) -> Vec<String> {
        let Some(table) = &self.streaks else {
            return Vec::new();
        };
        table
            .rows
            .iter()
            .map(|row| row.team.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn cycle_sort(&mut self) {
        self.sort = match self.sort {
            StreakKind::Hitting => StreakKind::Rbi,
            StreakKind::Rbi => StreakKind::TotalBases,
            StreakKind::TotalBases => StreakKind::Runs,
            StreakKind::Runs => StreakKind::Hitting,
        };
        self.selected = 0;
    }

    pub fn raise_min_length(&mut self) {
        self.min_length = (self.min_length + 1).min(MIN_LENGTH_RANGE.1);
        self.clamp_selection();
    }

    pub fn lower_min_length(&mut self) {
        self.min_length = self.min_length.saturating_sub(1).max(MIN_LENGTH_RANGE.0);
        self.clamp_selection();
    }

    pub fn toggle_team_filter(&mut self, team: &str) {
        if !self.team_filter.remove(team) {
            self.team_filter.insert(team.to_string());
        }
        self.clamp_selection();
    }

    pub fn clear_team_filter(&mut self) {
        self.team_filter.clear();
        self.clamp_selection();
    }

    pub fn open_team_picker(&mut self) {
        self.team_picker = if self.streak_teams().is_empty() {
            None
        } else {
            Some(0)
        };
    }

    pub fn toggle_picked_team(&mut self) {
        let Some(idx) = self.team_picker else {
            return;
        };
        if let Some(team) = self.streak_teams().get(idx).cloned() {
            self.toggle_team_filter(&team);
        }
    }

    pub fn select_next(&mut self) {
        if let Some(idx) = self.team_picker {
            let total = self.streak_teams().len();
            if total > 0 {
                self.team_picker = Some((idx + 1) % total);
            }
            return;
        }
        match self.screen {
            Screen::Streaks => {
                let total = self.visible_streak_rows().len();
                self.selected = if total == 0 { 0 } else { (self.selected + 1) % total };
            }
            Screen::Matchup => self.cycle_matchup_team(1),
            Screen::Heatmap => {}
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(idx) = self.team_picker {
            let total = self.streak_teams().len();
            if total > 0 {
                self.team_picker = Some(if idx == 0 { total - 1 } else { idx - 1 });
            }
            return;
        }
        match self.screen {
            Screen::Streaks => {
                let total = self.visible_streak_rows().len();
                self.selected = if total == 0 {
                    0
                } else if self.selected == 0 {
                    total - 1
                } else {
                    self.selected - 1
                };
            }
            Screen::Matchup => self.cycle_matchup_team(-1),
            Screen::Heatmap => {}
        }
    }

    pub fn toggle_matchup_side(&mut self) {
        self.matchup_side = match self.matchup_side {
            MatchupSide::TeamA => MatchupSide::TeamB,
            MatchupSide::TeamB => MatchupSide::TeamA,
        };
    }

    fn cycle_matchup_team(&mut self, step: isize) {
        let total = self.teams.len();
        if total == 0 {
            return;
        }
        let slot = match self.matchup_side {
            MatchupSide::TeamA => &mut self.matchup_a,
            MatchupSide::TeamB => &mut self.matchup_b,
        };
        *slot = (*slot as isize + step).rem_euclid(total as isize) as usize;
    }

    pub fn raise_threshold(&mut self) {
        self.threshold += THRESHOLD_STEP;
    }

    pub fn lower_threshold(&mut self) {
        self.threshold = (self.threshold - THRESHOLD_STEP).max(0.0);
    }

    /// The two teams picked on the matchup screen, if they are distinct.
    pub fn matchup_pair(&self) -> Option<(Participant, Participant)> {
        let a = self.teams.get(self.matchup_a)?;
        let b = self.teams.get(self.matchup_b)?;
        if a.id == b.id {
            return None;
        }
        Some((a.clone(), b.clone()))
    }

    pub fn streaks_stale(&self, refresh: std::time::Duration) -> bool {
        !self.streaks_loading
            && self
                .streaks_fetched_at
                .is_none_or(|at| at.elapsed() >= refresh)
    }

    fn clamp_selection(&mut self) {
        let total = self.visible_streak_rows().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportState {
    pub active: bool,
    pub path: Option<PathBuf>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum Delta {
    StreaksProgress(Progress),
    SetStreaks(StreakTable),
    StreaksFailed(String),
    SetTeams(Vec<Participant>),
    SetMatchup(MatchupSummary),
    MatchupFailed(String),
    HeatmapProgress(Progress),
    SetHeatmap(PairwiseMatrix),
    HeatmapFailed(String),
    ExportFinished {
        path: PathBuf,
        streak_rows: usize,
        matchup_rows: usize,
        heatmap_cells: usize,
    },
    ExportFailed(String),
    Log(String),
}

impl Delta {
    pub fn export_finished(path: PathBuf, report: &ExportReport) -> Self {
        Delta::ExportFinished {
            path,
            streak_rows: report.streak_rows,
            matchup_rows: report.matchup_rows,
            heatmap_cells: report.heatmap_cells,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchStreaks,
    FetchTeams,
    FetchMatchup {
        team_a: Participant,
        team_b: Participant,
        threshold: f64,
        max_games: usize,
    },
    BuildHeatmap {
        threshold: f64,
        max_games: usize,
    },
    Export {
        path: PathBuf,
        streaks: Option<StreakTable>,
        matchup: Option<MatchupSummary>,
        heatmap: Option<PairwiseMatrix>,
    },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::StreaksProgress(progress) => {
            state.streaks_loading = true;
            state.streaks_progress = progress;
        }
        Delta::SetStreaks(table) => {
            state.push_log(format!(
                "[INFO] Streaks: {} live of {} hitters",
                table.rows.len(),
                table.players_checked
            ));
            if let Some(first) = table.errors.first() {
                state.push_log(format!(
                    "[WARN] Streak fetch errors: {} ({first})",
                    table.errors.len()
                ));
            }
            state.min_total_bases = table.min_total_bases;
            state.streaks = Some(table);
            state.streaks_loading = false;
            state.streaks_fetched_at = Some(Instant::now());
            state.clamp_selection();
        }
        Delta::StreaksFailed(err) => {
            state.streaks_loading = false;
            state.streaks_fetched_at = Some(Instant::now());
            state.push_log(format!("[WARN] Streaks error: {err}"));
        }
        Delta::SetTeams(teams) => {
            let selected = state.matchup_pair();
            state.teams = teams;
            match selected {
                Some((a, b)) => {
                    state.matchup_a = team_index(&state.teams, a.id).unwrap_or(0);
                    state.matchup_b = team_index(&state.teams, b.id).unwrap_or(1);
                }
                None => {
                    state.matchup_a = 0;
                    state.matchup_b = 1usize.min(state.teams.len().saturating_sub(1));
                }
            }
        }
        Delta::SetMatchup(summary) => {
            state.matchup_loading = false;
            match summary.aggregate {
                Some(agg) => state.push_log(format!(
                    "[INFO] {} vs {}: {} of {} over {}",
                    summary.team_a.label(),
                    summary.team_b.label(),
                    agg.overs,
                    agg.games,
                    summary.threshold
                )),
                None => state.push_log(format!(
                    "[INFO] {} vs {}: no completed games",
                    summary.team_a.label(),
                    summary.team_b.label()
                )),
            }
            if summary.skipped() > 0 {
                state.push_log(format!(
                    "[WARN] Skipped {} games ({} not fetched, {} unparseable)",
                    summary.skipped(),
                    summary.not_fetched,
                    summary.unparseable
                ));
            }
            state.matchup = Some(summary);
        }
        Delta::MatchupFailed(err) => {
            state.matchup_loading = false;
            state.push_log(format!("[WARN] Matchup error: {err}"));
        }
        Delta::HeatmapProgress(progress) => {
            state.heatmap_loading = true;
            state.heatmap_progress = progress;
        }
        Delta::SetHeatmap(matrix) => {
            state.heatmap_loading = false;
            state.push_log(format!(
                "[INFO] Heatmap: {} of {} pairs with games",
                matrix.cells.len(),
                matrix.max_cells()
            ));
            if matrix.skipped_games > 0 || !matrix.errors.is_empty() {
                state.push_log(format!(
                    "[WARN] Heatmap skipped {} games, {} pairs failed",
                    matrix.skipped_games,
                    matrix.errors.len()
                ));
            }
            state.heatmap = Some(matrix);
        }
        Delta::HeatmapFailed(err) => {
            state.heatmap_loading = false;
            state.push_log(format!("[WARN] Heatmap error: {err}"));
        }
        Delta::ExportFinished {
            path,
            streak_rows,
            matchup_rows,
            heatmap_cells,
        } => {
            state.export.active = false;
            state.export.message = format!(
                "Exported {streak_rows} streaks, {matchup_rows} games, {heatmap_cells} cells"
            );
            state.push_log(format!("[INFO] Export saved to {}", path.display()));
            state.export.path = Some(path);
        }
        Delta::ExportFailed(err) => {
            state.export.active = false;
            state.export.message = format!("Export failed: {err}");
            state.push_log(format!("[WARN] Export error: {err}"));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

fn team_index(teams: &[Participant], id: u64) -> Option<usize> {
    teams.iter().position(|t| t.id == id)
}

/// Cell shading bucket for an over fraction, 0 (mostly under) through 4 (mostly over).
pub fn heat_bucket(fraction: f64) -> u8 {
    if fraction < 0.3 {
        0
    } else if fraction < 0.45 {
        1
    } else if fraction <= 0.55 {
        2
    } else if fraction <= 0.7 {
        3
    } else {
        4
    }
}
