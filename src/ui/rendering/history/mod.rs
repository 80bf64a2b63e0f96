//! History mode rendering coordinator.

mod detail_view;
mod list_view;
mod stats_view;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    record::{HistoryRecord, Outcome},
    ui::{App, history::HistoryViewMode},
};

impl App {
    pub(in crate::ui) fn draw_history_mode(&self, f: &mut Frame, area: Rect) {
        match self.history_view_mode {
            HistoryViewMode::Stats => self.draw_stats_view(f, area),
            HistoryViewMode::List => self.draw_list_view(f, area),
            HistoryViewMode::Detail => self.draw_detail_view(f, area),
        }
    }
}

fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::Success => Color::Green,
        Outcome::Fail => Color::Red,
        Outcome::Timeout => Color::Yellow,
    }
}

fn format_date(record: &HistoryRecord) -> String {
    record
        .record
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn draw_placeholder(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    let paragraph =
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(title.to_string()));

    f.render_widget(paragraph, area);
}
