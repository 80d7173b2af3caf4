use std::time::Instant;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::game::{Game, Phase};
use crate::round::Selection;
use crate::ui;

/// What the event loop should do after an input was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
    OpenUrl(String),
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    /// Seat under the keyboard cursor
    pub cursor: u32,
    /// Waiting for y/n before wiping the stats
    pub confirm_reset: bool,
    pub notice: Option<String>,
    pub last_selection: Option<Selection>,
}

impl App {
    pub fn new(game: Game) -> Self {
        let cursor = center_seat(&game);
        Self {
            game,
            cursor,
            confirm_reset: false,
            notice: None,
            last_selection: None,
        }
    }

    pub fn on_tick(&mut self, now: Instant) -> bool {
        self.game.on_tick(now)
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        if self.confirm_reset {
            self.confirm_reset = false;
            if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.game.reset_stats();
                self.notice = Some("Statistics cleared".to_string());
            }
            return Control::Continue;
        }

        if key.code == KeyCode::Esc {
            return Control::Quit;
        }
        self.notice = None;

        match self.game.phase() {
            Phase::Waiting(_) => {
                if key.code == KeyCode::Char('c') {
                    self.confirm_reset = true;
                }
            }
            Phase::Ticketing(_) => match key.code {
                KeyCode::Left => self.move_cursor(-1, 0),
                KeyCode::Right => self.move_cursor(1, 0),
                KeyCode::Up => self.move_cursor(0, -1),
                KeyCode::Down => self.move_cursor(0, 1),
                KeyCode::Char(' ') => {
                    self.last_selection = Some(self.game.select_seat(self.cursor));
                }
                KeyCode::Enter => {
                    self.game.reserve(now);
                }
                _ => {}
            },
            Phase::Result(_) => match key.code {
                KeyCode::Char('r') | KeyCode::Enter => self.retry(now),
                KeyCode::Char('c') => self.confirm_reset = true,
                KeyCode::Char('t') => {
                    if let Some(url) = self.game.share_url() {
                        return Control::OpenUrl(url);
                    }
                }
                _ => {}
            },
        }

        Control::Continue
    }

    /// Left click on a seat selects it. `area` is the full terminal area.
    pub fn on_mouse(&mut self, mouse: MouseEvent, area: Rect) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || self.confirm_reset {
            return;
        }
        if !matches!(self.game.phase(), Phase::Ticketing(_)) {
            return;
        }

        let layout = ui::seat_grid_layout(area, self.game.config());
        if let Some(seat) = layout.seat_at(mouse.column, mouse.row) {
            self.cursor = seat;
            self.last_selection = Some(self.game.select_seat(seat));
        }
    }

    pub fn retry(&mut self, now: Instant) {
        self.game.start_round(now);
        self.cursor = center_seat(&self.game);
        self.last_selection = None;
    }

    fn move_cursor(&mut self, dx: i64, dy: i64) {
        let config = self.game.config();
        let columns = config.columns as i64;
        let total = config.total_seats as i64;
        let rows = config.rows() as i64;

        let index = self.cursor.saturating_sub(1) as i64;
        let col = (index % columns + dx).clamp(0, columns - 1);
        let row = (index / columns + dy).clamp(0, rows - 1);

        self.cursor = (row * columns + col + 1).min(total) as u32;
    }
}

fn center_seat(game: &Game) -> u32 {
    let config = game.config();
    let columns = config.columns as u32;
    let seat = (config.rows() / 2) * columns + columns / 2 + 1;
    seat.min(config.total_seats)
}
