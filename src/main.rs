use std::fs;
use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use soccer_dash::config::{DashConfig, app_cache_dir};
use soccer_dash::dashboard::{Dashboard, NamedChart};
use soccer_dash::dataset;
use soccer_dash::export;
use soccer_dash::figure::{Figure, Trace, XyTrace};
use soccer_dash::positions::Page;
use soccer_dash::state::{AppState, Focus};

const LOG_FILE: &str = "soccer_dash.log";

struct App {
    state: AppState,
    dash: Dashboard<'static>,
    config: DashConfig,
    should_quit: bool,
}

impl App {
    fn new(dash: Dashboard<'static>, config: DashConfig) -> Self {
        let mut state = AppState::new();
        state.set_page(Page::Home, &dash);
        state.push_log(format!(
            "[INFO] {} players loaded from {}",
            dash.data().players().len(),
            config.data_dir.display()
        ));
        Self {
            state,
            dash,
            config,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.set_page(Page::Home, &self.dash),
            KeyCode::Char('2') => self.state.set_page(Page::Goalkeepers, &self.dash),
            KeyCode::Char('3') => self.state.set_page(Page::Defenders, &self.dash),
            KeyCode::Char('4') => self.state.set_page(Page::Midfielders, &self.dash),
            KeyCode::Char('5') => self.state.set_page(Page::Forwards, &self.dash),
            KeyCode::Tab | KeyCode::BackTab => self.state.toggle_focus(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(&self.dash),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(&self.dash),
            KeyCode::Char('x') | KeyCode::Char('X') => self.export_selected(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn export_selected(&mut self) {
        let Some(name) = self.state.selected_player().map(str::to_string) else {
            self.state.push_log("[INFO] No player selected for export");
            return;
        };
        let path = export::report_path(&self.config.export_dir, &name);
        match export::export_player_report(self.dash.data(), &name, &path) {
            Ok(report) => {
                let msg = format!(
                    "[INFO] Exported {name}: {} sheets, {} season rows -> {}",
                    report.sheets,
                    report.season_rows,
                    report.path.display()
                );
                for skipped in &report.skipped {
                    self.state.push_log(format!("[WARN] export skipped: {skipped}"));
                }
                self.state.push_log(msg.clone());
                self.state
                    .export
                    .finish(msg, Some(report.path.display().to_string()));
            }
            Err(err) => {
                let msg = format!("[WARN] Export failed: {err:#}");
                self.state.push_log(msg.clone());
                self.state.export.finish(msg, None);
            }
        }
    }
}

fn main() -> Result<()> {
    DashConfig::load_env_files();
    init_file_logging();
    let mut config = DashConfig::from_env();
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    config.apply_args(&args);

    let data = dataset::init_global(&config.data_dir)
        .with_context(|| format!("load tables from {}", config.data_dir.display()))?;
    let dash = Dashboard::new(data, config.chart_options());
    let mut app = App::new(dash, config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

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
    Ok(())
}

/// Logs go to a file so they do not draw over the alternate screen.
fn init_file_logging() {
    let Some(dir) = app_cache_dir() else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
    else {
        return;
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.state.maybe_clear_export(Instant::now());
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
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_line(app.state.page))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_body(frame, chunks[1], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(
        "1-5 Pages | Tab Focus | j/k/↑/↓ Move | x Export | ? Help | q Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_line(current: Page) -> Line<'static> {
    let mut spans = vec![Span::styled(
        " SOCCER STATS ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (idx, page) in Page::ALL.into_iter().enumerate() {
        let style = if page == current {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!("{} {}", idx + 1, page.label()), style));
    }
    Line::from(spans)
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(40)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(columns[0]);

    render_list(
        frame,
        left[0],
        "Position",
        &state.positions,
        state.position_selected,
        state.focus == Focus::Positions,
    );
    render_list(
        frame,
        left[1],
        "Player",
        &state.players,
        state.player_selected,
        state.focus == Focus::Players,
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(1)])
        .split(columns[1]);

    let profile = Paragraph::new(profile_text(state))
        .block(Block::default().title("Player").borders(Borders::ALL));
    frame.render_widget(profile, right[0]);

    match &state.view {
        Some(view) => render_chart_grid(frame, right[1], &view.charts),
        None => {
            let msg = state
                .view_error
                .clone()
                .unwrap_or_else(|| "No player selected".to_string());
            let empty = Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title("Charts").borders(Borders::ALL));
            frame.render_widget(empty, right[1]);
        }
    }
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: &[String],
    selected: usize,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if items.is_empty() {
        let empty = Paragraph::new("(none)").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(selected, items.len(), visible);
    let lines: Vec<Line> = (start..end)
        .map(|idx| {
            let prefix = if idx == selected { "> " } else { "  " };
            let style = if idx == selected {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::styled(format!("{prefix}{}", items[idx]), style)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
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

fn profile_text(state: &AppState) -> String {
    let Some(view) = &state.view else {
        return "No player selected".to_string();
    };
    view.profile
        .lines()
        .into_iter()
        .map(|(label, value)| format!("{label:<12} {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_chart_grid(frame: &mut Frame, area: Rect, charts: &[NamedChart]) {
    if charts.is_empty() {
        return;
    }
    let rows = charts.len().div_ceil(2);
    let row_constraints: Vec<Constraint> = (0..rows)
        .map(|_| Constraint::Ratio(1, rows as u32))
        .collect();
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    for (row_idx, pair) in charts.chunks(2).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row_areas[row_idx]);
        for (col_idx, chart) in pair.iter().enumerate() {
            render_figure(frame, cells[col_idx], &chart.figure);
        }
    }
}

fn render_figure(frame: &mut Frame, area: Rect, figure: &Figure) {
    let title = figure_title(figure);
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }
    if figure.is_empty() {
        let empty = Paragraph::new("No data").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let pie = figure.data.iter().find_map(|t| match t {
        Trace::Pie(p) => Some(p),
        _ => None,
    });
    if let Some(pie) = pie {
        let total: f64 = pie.values.iter().sum();
        let bars: Vec<Bar> = pie
            .labels
            .iter()
            .zip(&pie.values)
            .zip(&pie.marker.colors)
            .map(|((label, value), color)| {
                let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                Bar::default()
                    .value(value.round() as u64)
                    .label(Line::from(label.clone()))
                    .text_value(format!("{value:.0} ({share:.0}%)"))
                    .style(Style::default().fg(hex_color(color)))
            })
            .collect();
        let chart = BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0);
        frame.render_widget(chart, inner);
        return;
    }

    let bars = season_bars(figure);
    let width = (inner.width as usize / bars.len().max(1)).clamp(3, 9) as u16;
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(width.saturating_sub(1).max(2))
        .bar_gap(1);
    frame.render_widget(chart, inner);
}

fn figure_title(figure: &Figure) -> String {
    let secondary = figure
        .layout
        .yaxis2
        .as_ref()
        .map(|axis| axis.title.text.as_str())
        .filter(|t| !t.is_empty());
    match secondary {
        Some(line) => format!("{} | {}", figure.title(), line),
        None => figure.title().to_string(),
    }
}

/// One bar per season, colored by club, labelled with the secondary value.
fn season_bars(figure: &Figure) -> Vec<Bar<'static>> {
    let mut bars = Vec::new();
    let mut traces = figure.data.iter().peekable();
    while let Some(trace) = traces.next() {
        let Trace::Bar(bar) = trace else {
            continue;
        };
        let line: Option<&XyTrace> = match traces.peek() {
            Some(Trace::Scatter(line)) if line.name == bar.name => Some(line),
            _ => None,
        };
        let color = hex_color(&bar.marker.color);
        for (idx, season) in bar.x.iter().enumerate() {
            let value = bar.y.get(idx).copied().flatten();
            let secondary = line.and_then(|l| l.y.get(idx).copied().flatten());
            let text = match (value, secondary) {
                (Some(v), Some(s)) => format!("{v:.0}/{s:.0}"),
                (Some(v), None) => format!("{v:.0}"),
                (None, Some(s)) => format!("-/{s:.0}"),
                (None, None) => "-".to_string(),
            };
            bars.push(
                Bar::default()
                    .value(value.unwrap_or(0.0).max(0.0).round() as u64)
                    .label(Line::from(short_season(season)))
                    .text_value(text)
                    .style(Style::default().fg(color)),
            );
        }
    }
    bars
}

/// `"2019-2020"` -> `"19-20"`.
fn short_season(season: &str) -> String {
    match season.split_once('-') {
        Some((a, b)) if is_year(a) && is_year(b) => format!("{}-{}", &a[2..], &b[2..]),
        _ => season.to_string(),
    }
}

fn is_year(raw: &str) -> bool {
    raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit())
}

fn hex_color(hex: &str) -> Color {
    let raw = hex.trim_start_matches('#');
    if raw.len() != 6 {
        return Color::Gray;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&raw[range], 16).ok();
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

fn console_text(state: &AppState) -> String {
    if !state.export.message.is_empty() {
        return state.export.message.clone();
    }
    if state.logs.is_empty() {
        return "No messages yet".to_string();
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
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Soccer Stats - Help",
        "",
        "Pages:",
        "  1            Home (all players)",
        "  2            Goalkeepers",
        "  3            Defenders",
        "  4            Midfielders",
        "  5            Forwards",
        "",
        "Selection:",
        "  Tab          Switch position/player list",
        "  j/k or ↑/↓   Move selection",
        "",
        "Charts: bars = primary metric per season, colored by club;",
        "        label = primary/secondary value.",
        "",
        "  x            Export player report (.xlsx)",
        "  ?            Toggle help",
        "  q            Quit",
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_parses_palette_entries() {
        assert_eq!(hex_color("#636EFA"), Color::Rgb(0x63, 0x6E, 0xFA));
        assert_eq!(hex_color("bad"), Color::Gray);
    }

    #[test]
    fn short_season_trims_years() {
        assert_eq!(short_season("2019-2020"), "19-20");
        assert_eq!(short_season("2019"), "2019");
    }

    #[test]
    fn short_season_keeps_non_numeric_labels() {
        assert_eq!(short_season("2019-1é2"), "2019-1é2");
        assert_eq!(short_season("é19-2020"), "é19-2020");
        assert_eq!(short_season("20ab-2020"), "20ab-2020");
    }

    #[test]
    fn visible_range_centres_selection() {
        assert_eq!(visible_range(0, 3, 10), (0, 3));
        assert_eq!(visible_range(9, 20, 4), (7, 11));
        assert_eq!(visible_range(19, 20, 4), (16, 20));
    }
}
