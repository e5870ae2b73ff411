use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tracing::info;

use mlb_streak_terminal::config::AppConfig;
use mlb_streak_terminal::logging;
use mlb_streak_terminal::matchup::OverUnder;
use mlb_streak_terminal::provider;
use mlb_streak_terminal::state::{
    self, AppState, MatchupSide, ProviderCommand, Screen, apply_delta, heat_bucket,
};
use mlb_streak_terminal::streaks::StreakKind;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    config: AppConfig,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>, config: AppConfig) -> Self {
        Self {
            state: AppState::from_config(&config),
            should_quit: false,
            cmd_tx,
            config,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.team_picker.is_some() {
            self.on_picker_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Streaks,
            KeyCode::Char('2') => self.state.screen = Screen::Matchup,
            KeyCode::Char('3') if self.state.heatmap_enabled => self.state.screen = Screen::Heatmap,
            KeyCode::Tab => self.state.cycle_screen(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('e') | KeyCode::Char('E') => self.request_export(),
            KeyCode::Char('r') | KeyCode::Char('R') => match self.state.screen {
                Screen::Streaks => self.request_streaks(true),
                Screen::Matchup => self.request_matchup(),
                Screen::Heatmap => self.request_heatmap(),
            },
            _ => match self.state.screen {
                Screen::Streaks => self.on_streaks_key(key),
                Screen::Matchup => self.on_matchup_key(key),
                Screen::Heatmap => {
                    if key.code == KeyCode::Enter {
                        self.request_heatmap();
                    }
                }
            },
        }
    }

    fn on_streaks_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('s') => self.state.cycle_sort(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.state.raise_min_length(),
            KeyCode::Char('-') => self.state.lower_min_length(),
            KeyCode::Char('f') => {
                self.state.open_team_picker();
                if self.state.team_picker.is_none() {
                    self.state.push_log("[INFO] No teams to filter yet");
                }
            }
            KeyCode::Char('c') => self.state.clear_team_filter(),
            _ => {}
        }
    }

    fn on_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char(' ') => self.state.toggle_picked_team(),
            KeyCode::Char('c') => self.state.clear_team_filter(),
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('f') => self.state.team_picker = None,
            _ => {}
        }
    }

    fn on_matchup_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                self.state.toggle_matchup_side()
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.state.raise_threshold(),
            KeyCode::Char('-') => self.state.lower_threshold(),
            KeyCode::Enter => self.request_matchup(),
            _ => {}
        }
    }

    fn send(&mut self, cmd: ProviderCommand, what: &str) -> bool {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log(format!("[INFO] {what} unavailable"));
            return false;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log(format!("[WARN] {what} request failed"));
            return false;
        }
        true
    }

    fn request_streaks(&mut self, announce: bool) {
        if self.state.streaks_loading {
            return;
        }
        if self.send(ProviderCommand::FetchStreaks, "Streak refresh") {
            self.state.streaks_loading = true;
            self.state.streaks_progress = state::Progress::default();
            if announce {
                self.state.push_log("[INFO] Streak refresh request sent");
            }
        }
    }

    fn request_matchup(&mut self) {
        if self.state.teams.is_empty() {
            self.send(ProviderCommand::FetchTeams, "Team list");
            self.state.push_log("[INFO] Team list not loaded yet");
            return;
        }
        let Some((team_a, team_b)) = self.state.matchup_pair() else {
            self.state.push_log("[INFO] Pick two different teams");
            return;
        };
        let cmd = ProviderCommand::FetchMatchup {
            team_a,
            team_b,
            threshold: self.state.threshold,
            max_games: self.state.max_games,
        };
        if self.send(cmd, "Matchup") {
            self.state.matchup_loading = true;
        }
    }

    fn request_heatmap(&mut self) {
        if !self.state.heatmap_enabled || self.state.heatmap_loading {
            return;
        }
        let cmd = ProviderCommand::BuildHeatmap {
            threshold: self.state.threshold,
            max_games: self.state.max_games,
        };
        if self.send(cmd, "Heatmap") {
            self.state.heatmap_loading = true;
            self.state.heatmap_progress = state::Progress::default();
            self.state.push_log("[INFO] Heatmap build started");
        }
    }

    fn request_export(&mut self) {
        if self.state.export.active {
            return;
        }
        let path = self.config.export_dir.join(format!(
            "mlb_streaks_{}.xlsx",
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        let cmd = ProviderCommand::Export {
            path: path.clone(),
            streaks: self.state.streaks.clone(),
            matchup: self.state.matchup.clone(),
            heatmap: self.state.heatmap.clone(),
        };
        if self.send(cmd, "Export") {
            self.state.export.active = true;
            self.state.export.message = format!("Exporting to {}", path.display());
        }
    }

    fn maybe_refresh_streaks(&mut self) {
        if self.state.streaks_stale(self.config.streaks_refresh) {
            self.request_streaks(false);
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let log_guard = logging::init_logging();
    let config = AppConfig::from_env();
    info!(season = config.season, "starting mlb_streak_terminal");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_provider(tx, cmd_rx, config.clone());

    let mut app = App::new(Some(cmd_tx), config);
    match &log_guard {
        Some((_, dir)) => app.state.push_log(format!("[INFO] Logging to {}", dir.display())),
        None => app.state.push_log("[WARN] File logging unavailable"),
    }
    app.send(ProviderCommand::FetchTeams, "Team list");
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    drop(log_guard);
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.maybe_refresh_streaks();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Streaks => render_streaks(frame, chunks[1], &app.state),
        Screen::Matchup => render_matchup(frame, chunks[1], &app.state),
        Screen::Heatmap => render_heatmap(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.team_picker.is_some() {
        render_team_picker(frame, frame.size(), &app.state);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let state = &app.state;
    let title = match state.screen {
        Screen::Streaks => {
            let filter = if state.team_filter.is_empty() {
                "All teams".to_string()
            } else {
                format!("{} teams", state.team_filter.len())
            };
            format!(
                "STREAKS | Season {} | Sort: {} | Min: {} | {}",
                app.config.season,
                state.sort.label(state.min_total_bases),
                state.min_length,
                filter
            )
        }
        Screen::Matchup => format!(
            "MATCHUP | Season {} | Line {} | Last {} games",
            app.config.season, state.threshold, state.max_games
        ),
        Screen::Heatmap => format!(
            "HEATMAP | Season {} | Line {} | Over % by pair",
            app.config.season, state.threshold
        ),
    };
    if state.export.message.is_empty() {
        title
    } else {
        format!("{title} | {}", state.export.message)
    }
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Streaks => {
            "1/2/3 Screens | j/k Move | s Sort | +/- Min length | f Teams | c Clear | r Refresh | e Export | ? Help | q Quit".to_string()
        }
        Screen::Matchup => {
            "1/2/3 Screens | h/l Side | j/k Team | +/- Line | Enter Fetch | e Export | ? Help | q Quit".to_string()
        }
        Screen::Heatmap => "1/2/3 Screens | Enter Build | e Export | ? Help | q Quit".to_string(),
    }
}

fn streak_columns() -> [Constraint; 6] {
    [
        Constraint::Min(20),
        Constraint::Length(24),
        Constraint::Length(9),
        Constraint::Length(6),
        Constraint::Length(18),
        Constraint::Length(6),
    ]
}

fn render_streaks(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);
    let widths = streak_columns();

    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[0]);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    render_cell_text(frame, header_cols[0], "Player", bold);
    render_cell_text(frame, header_cols[1], "Team", bold);
    for (i, kind) in StreakKind::ALL.into_iter().enumerate() {
        let style = if kind == state.sort {
            bold.fg(Color::Yellow)
        } else {
            bold
        };
        render_cell_text(frame, header_cols[i + 2], &kind.label(state.min_total_bases), style);
    }

    let list_area = sections[1];
    let rows = state.visible_streak_rows();
    if rows.is_empty() {
        let msg = if state.streaks_loading {
            format!(
                "Fetching game logs {}/{}",
                state.streaks_progress.current, state.streaks_progress.total
            )
        } else if state.streaks.is_none() {
            "No streak data yet".to_string()
        } else {
            format!("No {} streaks of {}+ games", state.sort.label(state.min_total_bases), state.min_length)
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
            list_area,
        );
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, rows.len(), visible);
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let row = rows[idx];
        render_cell_text(frame, cols[0], &row.player, row_style);
        render_cell_text(frame, cols[1], &row.team, row_style);
        for (c, kind) in StreakKind::ALL.into_iter().enumerate() {
            let value = row.get(kind);
            let text = if value == 0 { "-".to_string() } else { value.to_string() };
            let style = if kind == state.sort {
                row_style.add_modifier(Modifier::BOLD)
            } else {
                row_style
            };
            render_cell_text(frame, cols[c + 2], &text, style);
        }
    }
}

fn render_matchup(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1), Constraint::Length(2)])
        .split(area);

    let team_name = |idx: usize| {
        state
            .teams
            .get(idx)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "-".to_string())
    };
    let side_style = |side: MatchupSide| {
        if state.matchup_side == side {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        }
    };
    let picker = Line::from(vec![
        Span::raw("Team A: "),
        Span::styled(team_name(state.matchup_a), side_style(MatchupSide::TeamA)),
        Span::raw("   vs   Team B: "),
        Span::styled(team_name(state.matchup_b), side_style(MatchupSide::TeamB)),
    ]);
    frame.render_widget(Paragraph::new(picker), sections[0]);

    let Some(summary) = &state.matchup else {
        let msg = if state.matchup_loading {
            "Fetching head-to-head games..."
        } else if state.teams.is_empty() {
            "Loading teams..."
        } else {
            "Press Enter to fetch the head-to-head record"
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
            sections[1],
        );
        return;
    };

    let mut lines = vec![Line::styled(
        format!(
            "{:<12} {:<24} {:<24} {:>7} {:>6} {:>6}  {}",
            "Date", "Away", "Home", "Score", "Total", "Line", "Result"
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if summary.rows.is_empty() {
        lines.push(Line::styled(
            "No completed head-to-head games",
            Style::default().fg(Color::DarkGray),
        ));
    }
    for row in &summary.rows {
        let date = row
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let result_style = match row.result {
            OverUnder::Over => Style::default().fg(Color::Green),
            OverUnder::Under => Style::default().fg(Color::Red),
        };
        lines.push(Line::from(vec![
            Span::raw(format!(
                "{:<12} {:<24} {:<24} {:>3}-{:<3} {:>6} {:>6}  ",
                date, row.away, row.home, row.away_runs, row.home_runs, row.total, row.threshold
            )),
            Span::styled(row.result.label(), result_style),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), sections[1]);

    let aggregate = match summary.aggregate {
        Some(agg) => format!(
            "{} vs {}: {} of {} over {} ({:.1}%)",
            summary.team_a.label(),
            summary.team_b.label(),
            agg.overs,
            agg.games,
            summary.threshold,
            agg.over_fraction * 100.0
        ),
        None => format!(
            "{} vs {}: no data",
            summary.team_a.label(),
            summary.team_b.label()
        ),
    };
    let skipped = if summary.skipped() > 0 {
        format!(
            "Skipped {} ({} not fetched, {} unparseable)",
            summary.skipped(),
            summary.not_fetched,
            summary.unparseable
        )
    } else {
        String::new()
    };
    frame.render_widget(
        Paragraph::new(format!("{aggregate}\n{skipped}"))
            .style(Style::default().add_modifier(Modifier::BOLD)),
        sections[2],
    );
}

const HEAT_CELL_WIDTH: usize = 4;

fn render_heatmap(frame: &mut Frame, area: Rect, state: &AppState) {
    if !state.heatmap_enabled {
        frame.render_widget(
            Paragraph::new("Heatmap disabled (HEATMAP_ENABLED)")
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }
    if state.heatmap_loading {
        let msg = format!(
            "Building pairwise matrix {}/{}",
            state.heatmap_progress.current, state.heatmap_progress.total
        );
        frame.render_widget(Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)), area);
        return;
    }
    let Some(matrix) = &state.heatmap else {
        frame.render_widget(
            Paragraph::new("Press Enter to build the heatmap (one request per team pair)")
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    };

    let mut header = vec![Span::raw(" ".repeat(HEAT_CELL_WIDTH + 1))];
    header.extend(matrix.participants.iter().map(|p| {
        Span::styled(
            format!("{:>w$}", short_label(p.label()), w = HEAT_CELL_WIDTH),
            Style::default().add_modifier(Modifier::BOLD),
        )
    }));
    let mut lines = vec![Line::from(header)];

    for a in &matrix.participants {
        let mut spans = vec![Span::styled(
            format!("{:<w$} ", short_label(a.label()), w = HEAT_CELL_WIDTH),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        for b in &matrix.participants {
            if a.id == b.id {
                spans.push(Span::styled(
                    format!("{:>w$}", "·", w = HEAT_CELL_WIDTH),
                    Style::default().fg(Color::DarkGray),
                ));
                continue;
            }
            match matrix.get(a.id, b.id) {
                Some(cell) => {
                    let pct = cell.over_fraction() * 100.0;
                    spans.push(Span::styled(
                        format!("{:>w$.0}", pct, w = HEAT_CELL_WIDTH),
                        Style::default().fg(Color::Black).bg(heat_color(cell.over_fraction())),
                    ));
                }
                None => spans.push(Span::raw(" ".repeat(HEAT_CELL_WIDTH))),
            }
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        format!(
            "{} of {} pairs with games | {} games skipped | {} pairs failed",
            matrix.cells.len(),
            matrix.max_cells(),
            matrix.skipped_games,
            matrix.errors.len()
        ),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(lines), area);
}

fn heat_color(fraction: f64) -> Color {
    match heat_bucket(fraction) {
        0 => Color::Blue,
        1 => Color::Cyan,
        2 => Color::White,
        3 => Color::LightRed,
        _ => Color::Red,
    }
}

fn short_label(label: &str) -> String {
    label.chars().take(HEAT_CELL_WIDTH - 1).collect()
}

fn render_team_picker(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(40, 70, area);
    frame.render_widget(Clear, popup_area);

    let cursor = state.team_picker.unwrap_or(0);
    let teams = state.streak_teams();
    let height = popup_area.height.saturating_sub(2) as usize;
    let (start, end) = visible_range(cursor, teams.len(), height);
    let lines = teams[start..end]
        .iter()
        .enumerate()
        .map(|(i, team)| {
            let mark = if state.team_filter.contains(team) { "[x]" } else { "[ ]" };
            let style = if start + i == cursor {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::styled(format!("{mark} {team}"), style)
        })
        .collect::<Vec<_>>();

    let picker = Paragraph::new(lines).block(
        Block::default()
            .title("Teams (Space toggle, c clear, Enter close)")
            .borders(Borders::ALL),
    );
    frame.render_widget(picker, popup_area);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "MLB Streak Terminal - Help",
        "",
        "Global:",
        "  1 / 2 / 3    Streaks / Matchup / Heatmap",
        "  Tab          Next screen",
        "  r            Refresh current screen",
        "  e            Export workbook",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Streaks:",
        "  j/k or ↑/↓   Move",
        "  s            Cycle sort column",
        "  + / -        Minimum streak length",
        "  f / c        Team filter / clear",
        "",
        "Matchup:",
        "  h/l or ←/→   Switch team slot",
        "  j/k or ↑/↓   Change team",
        "  + / -        Move the line by 0.5",
        "  Enter        Fetch head-to-head",
        "",
        "Heatmap:",
        "  Enter        Build every team pair",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
