mod grid;
mod history;
mod logs;
mod status;

pub(in crate::ui) use grid::cell_rect;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::ui::{app::App, types::Screen};

impl App {
    pub(in crate::ui) fn draw(&self, f: &mut Frame) {
        // History mode uses a different layout
        if self.screen == Screen::History {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(10),   // History content
                    Constraint::Length(6), // Small log panel
                ])
                .split(f.area());

            self.grid_area.set(None);
            self.draw_history_mode(f, layout[0]);
            self.draw_logs(f, layout[1]);
            return;
        }

        let main_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(f.area());

        let right_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // Session status
                Constraint::Length(3), // Progress gauge
                Constraint::Length(8), // Last result
                Constraint::Min(6),    // Logs panel
            ])
            .split(main_layout[1]);

        self.draw_grid(f, main_layout[0]);
        self.draw_session_status(f, right_layout[0]);
        self.draw_progress(f, right_layout[1]);
        self.draw_last_result(f, right_layout[2]);
        self.draw_logs(f, right_layout[3]);
    }
}
