//! Keyboard and mouse input dispatch.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::grid::GRID_SIDE;

use super::super::{app::App, history::HistoryViewMode, rendering::cell_rect, types::Screen};
use super::{GameHandler, HistoryHandler};

/// Helper struct for managing keyboard input and user interactions.
pub struct InputHandler<'a> {
    app: &'a mut App,
}

impl<'a> InputHandler<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    /// Returns `true` when the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.app.screen == Screen::History {
            return self.handle_history_key(key);
        }

        let running = self.app.engine.is_running();

        match (key.code, key.modifiers) {
            (KeyCode::Char('q' | 'Q'), KeyModifiers::CONTROL) => {
                self.app.log("Exit requested");
                return true;
            }

            (KeyCode::Char('r' | 'R'), KeyModifiers::CONTROL) => {
                HistoryHandler::new(self.app).enter_history_mode();
            }

            (KeyCode::Char('n' | 'N'), KeyModifiers::CONTROL) => {
                GameHandler::new(self.app).start_new_session();
            }

            (KeyCode::Char('p' | 'P'), KeyModifiers::CONTROL) => {
                if !running {
                    GameHandler::new(self.app).replay_last();
                }
            }

            (KeyCode::Tab, _) => GameHandler::new(self.app).cycle_mode(),

            (KeyCode::Enter, _) if !running => GameHandler::new(self.app).start_new_session(),
            (KeyCode::Enter | KeyCode::Char(' '), _) => GameHandler::new(self.app).click_cursor(),

            (KeyCode::Up, _) => GameHandler::new(self.app).move_cursor(-1, 0),
            (KeyCode::Down, _) => GameHandler::new(self.app).move_cursor(1, 0),
            (KeyCode::Left, _) => GameHandler::new(self.app).move_cursor(0, -1),
            (KeyCode::Right, _) => GameHandler::new(self.app).move_cursor(0, 1),

            _ => {}
        }
        false
    }

    fn handle_history_key(&mut self, key: KeyEvent) -> bool {
        if !matches!(key.code, KeyCode::Char('x' | 'X')) {
            self.app.clear_pending = false;
        }

        match key.code {
            KeyCode::Char('q' | 'Q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.app.log("Exit requested");
                return true;
            }

            KeyCode::Char('r' | 'R') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.app.log("Returning to training");
                HistoryHandler::new(self.app).exit_history_mode();
            }

            KeyCode::Char('x' | 'X') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                HistoryHandler::new(self.app).request_clear();
            }

            KeyCode::Tab => {
                HistoryHandler::new(self.app).cycle_view_mode();
            }

            KeyCode::PageDown => {
                if self.app.history_view_mode == HistoryViewMode::List {
                    HistoryHandler::new(self.app).next_page();
                }
            }

            KeyCode::PageUp => {
                if self.app.history_view_mode == HistoryViewMode::List {
                    HistoryHandler::new(self.app).prev_page();
                }
            }

            KeyCode::Esc => match self.app.history_view_mode {
                HistoryViewMode::Detail => {
                    HistoryHandler::new(self.app).return_to_list();
                }
                HistoryViewMode::List => {
                    HistoryHandler::new(self.app).return_to_stats();
                }
                HistoryViewMode::Stats => {}
            },

            KeyCode::Char(c @ '0'..='9') => {
                if self.app.history_view_mode == HistoryViewMode::List
                    && let Some(digit) = c.to_digit(10)
                {
                    // Map: 1-9 -> items 0-8, 0 -> item 9 (the 10th item)
                    let index = if digit == 0 { 9 } else { digit as usize - 1 };
                    HistoryHandler::new(self.app).select_record_on_page(index);
                }
            }

            KeyCode::Char('r') => {
                if self.app.history_view_mode == HistoryViewMode::Detail {
                    HistoryHandler::new(self.app).replay_selected();
                }
            }

            KeyCode::Char('d') => {
                if self.app.history_view_mode == HistoryViewMode::Detail {
                    HistoryHandler::new(self.app).delete_selected();
                }
            }

            _ => {}
        }

        false
    }

    /// Left clicks on the grid click the cell under the pointer.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.app.screen != Screen::Training
            || mouse.kind != MouseEventKind::Down(MouseButton::Left)
        {
            return;
        }

        let Some(area) = self.app.grid_area.get() else {
            return;
        };

        if let Some((row, col)) = cell_at(area, mouse.column, mouse.row) {
            GameHandler::new(self.app).click_cell(row, col);
        }
    }
}

/// Map a terminal position to the grid cell drawn there.
///
/// `inner` is the area inside the grid border.
pub fn cell_at(inner: Rect, x: u16, y: u16) -> Option<(usize, usize)> {
    let position = Position::new(x, y);
    (0..GRID_SIDE)
        .flat_map(|row| (0..GRID_SIDE).map(move |col| (row, col)))
        .find(|&(row, col)| cell_rect(inner, row, col).contains(position))
}
