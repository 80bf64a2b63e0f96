//! Record list view rendering for history mode.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Row, Table},
};

use crate::{
    session::format_time,
    ui::{App, history::PAGE_SIZE},
};

use super::{draw_placeholder, format_date, outcome_color};

impl App {
    pub(in crate::ui) fn draw_list_view(&self, f: &mut Frame, area: Rect) {
        let Some(ref history_data) = self.history_data else {
            draw_placeholder(f, area, "History", "No history loaded");
            return;
        };

        let records = history_data.records_for_page(self.history_page);
        if records.is_empty() {
            draw_placeholder(f, area, "History", "No records found");
            return;
        }

        let start_index = self.history_page * PAGE_SIZE;
        let rows: Vec<Row> = records
            .iter()
            .enumerate()
            .map(|(page_idx, record)| {
                let replay = record
                    .record
                    .replay_of
                    .map(|id| format!("#{}", id))
                    .unwrap_or_default();

                // Show number for selection (1-10)
                Row::new(vec![
                    format!("{}.", (page_idx + 1) % 10),
                    format!("#{}", record.id),
                    format_date(record),
                    record.record.mode_display.clone(),
                    record.outcome().to_string(),
                    format_time(record.time_used()),
                    replay,
                ])
                .style(Style::default().fg(outcome_color(record.outcome())))
            })
            .collect();

        let title = format!(
            "History - Page {}/{} (Showing {}-{} of {}) | PgUp/PgDn: Navigate | 1-0: View Detail | Esc: Stats | Ctrl+R: Exit",
            self.history_page + 1,
            history_data.total_pages(),
            start_index + 1,
            start_index + records.len(),
            history_data.records.len()
        );

        let table = Table::new(
            rows,
            [
                Constraint::Length(3),  // Number
                Constraint::Length(6),  // Id
                Constraint::Length(16), // Date
                Constraint::Length(10), // Mode
                Constraint::Length(9),  // Outcome
                Constraint::Length(8),  // Time
                Constraint::Length(10), // Replay of
            ],
        )
        .header(
            Row::new(vec!["#", "Id", "Date", "Mode", "Result", "Time", "Replay of"])
                .style(Style::default().add_modifier(Modifier::BOLD))
                .bottom_margin(1),
        )
        .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(table, area);
    }
}
