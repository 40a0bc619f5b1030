use std::collections::VecDeque;
use std::time::Instant;

use crate::dashboard::{Dashboard, PlayerView};
use crate::positions::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Positions,
    Players,
}

#[derive(Debug, Clone)]
pub struct ExportState {
    pub done: bool,
    pub path: Option<String>,
    pub message: String,
    pub last_updated: Option<Instant>,
}

impl Default for ExportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportState {
    pub fn new() -> Self {
        Self {
            done: false,
            path: None,
            message: String::new(),
            last_updated: None,
        }
    }

    pub fn finish(&mut self, message: impl Into<String>, path: Option<String>) {
        self.done = true;
        self.message = message.into();
        self.path = path;
        self.last_updated = Some(Instant::now());
    }

    pub fn clear_if_done_for(&mut self, now: Instant, keep_secs: u64) {
        if !self.done {
            return;
        }
        let Some(last) = self.last_updated else {
            return;
        };
        if now.duration_since(last).as_secs() >= keep_secs {
            *self = Self::new();
        }
    }
}

/// Selection cascade of the terminal dashboard: page -> position -> player -> view.
#[derive(Debug, Clone)]
pub struct AppState {
    pub page: Page,
    pub focus: Focus,
    pub positions: Vec<String>,
    pub position_selected: usize,
    pub players: Vec<String>,
    pub player_selected: usize,
    pub view: Option<PlayerView>,
    pub view_error: Option<String>,
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
            page: Page::Home,
            focus: Focus::Players,
            positions: Vec::new(),
            position_selected: 0,
            players: Vec::new(),
            player_selected: 0,
            view: None,
            view_error: None,
            logs: VecDeque::new(),
            help_overlay: false,
            export: ExportState::new(),
        }
    }

    /// Switches page and recomputes the whole cascade.
    pub fn set_page(&mut self, page: Page, dash: &Dashboard<'_>) {
        self.page = page;
        self.positions = dash.positions(page);
        self.position_selected = 0;
        self.refresh_players(dash);
    }

    /// Recomputes the player list for the selected position and selects its default.
    pub fn refresh_players(&mut self, dash: &Dashboard<'_>) {
        let options = dash.players(self.page, self.selected_position());
        self.player_selected = options
            .default
            .as_ref()
            .and_then(|name| options.names.iter().position(|n| n == name))
            .unwrap_or(0);
        self.players = options.names;
        self.refresh_view(dash);
    }

    /// Recomputes every chart and text field for the selected player.
    pub fn refresh_view(&mut self, dash: &Dashboard<'_>) {
        let Some(name) = self.selected_player().map(str::to_string) else {
            self.view = None;
            self.view_error = None;
            return;
        };
        match dash.player_view(self.page, &name) {
            Ok(view) => {
                let empty = view
                    .charts
                    .iter()
                    .filter(|c| c.figure.is_empty())
                    .count();
                if empty > 0 {
                    self.push_log(format!("[INFO] {name}: {empty} chart(s) without data"));
                }
                self.view = Some(view);
                self.view_error = None;
            }
            Err(err) => {
                self.push_log(format!("[WARN] {err}"));
                self.view = None;
                self.view_error = Some(err.to_string());
            }
        }
    }

    pub fn selected_position(&self) -> Option<&str> {
        self.positions
            .get(self.position_selected)
            .map(String::as_str)
    }

    pub fn selected_player(&self) -> Option<&str> {
        self.players.get(self.player_selected).map(String::as_str)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Positions => Focus::Players,
            Focus::Players => Focus::Positions,
        };
    }

    pub fn select_next(&mut self, dash: &Dashboard<'_>) {
        match self.focus {
            Focus::Positions => {
                if let Some(next) = wrap_next(self.position_selected, self.positions.len()) {
                    self.position_selected = next;
                    self.refresh_players(dash);
                }
            }
            Focus::Players => {
                if let Some(next) = wrap_next(self.player_selected, self.players.len()) {
                    self.player_selected = next;
                    self.refresh_view(dash);
                }
            }
        }
    }

    pub fn select_prev(&mut self, dash: &Dashboard<'_>) {
        match self.focus {
            Focus::Positions => {
                if let Some(prev) = wrap_prev(self.position_selected, self.positions.len()) {
                    self.position_selected = prev;
                    self.refresh_players(dash);
                }
            }
            Focus::Players => {
                if let Some(prev) = wrap_prev(self.player_selected, self.players.len()) {
                    self.player_selected = prev;
                    self.refresh_view(dash);
                }
            }
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        let msg = msg.into();
        log::info!("{msg}");
        self.logs.push_back(msg);
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn maybe_clear_export(&mut self, now: Instant) {
        self.export.clear_if_done_for(now, 8);
    }
}

fn wrap_next(current: usize, total: usize) -> Option<usize> {
    if total == 0 {
        return None;
    }
    Some((current + 1) % total)
}

fn wrap_prev(current: usize, total: usize) -> Option<usize> {
    if total == 0 {
        return None;
    }
    if current == 0 {
        Some(total - 1)
    } else {
        Some(current - 1)
    }
}
