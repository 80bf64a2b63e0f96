//! Statistics dashboard rendering for history mode.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
};

use crate::{
    session::format_time,
    stats::{HistoryStats, ModeStats},
    ui::{App, history::HistoryData},
};

use super::{draw_placeholder, format_date, outcome_color};

const RECENT_COUNT: usize = 10;

impl App {
    pub(in crate::ui) fn draw_stats_view(&self, f: &mut Frame, area: Rect) {
        let Some(ref history_data) = self.history_data else {
            draw_placeholder(f, area, "History", "No history loaded");
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8), // Overall stats
                Constraint::Length(6), // Per-mode stats
                Constraint::Min(5),    // Recent sessions
            ])
            .split(area);

        let title = if self.clear_pending {
            "Statistics | Ctrl+X again to delete ALL records"
        } else {
            "Statistics | Tab: List View | Ctrl+X: Clear | Ctrl+R: Exit | Ctrl+Q: Quit"
        };

        draw_overall_stats(f, chunks[0], &history_data.stats, title);
        draw_mode_stats(f, chunks[1], &history_data.stats);
        draw_recent_sessions(f, chunks[2], history_data);
    }
}

fn time_or_na(time: Option<f64>) -> String {
    time.map(format_time).unwrap_or_else(|| "N/A".to_string())
}

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn draw_overall_stats(f: &mut Frame, area: Rect, stats: &HistoryStats, title: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  Sessions: "),
            Span::styled(stats.total.to_string(), bold(Color::Cyan)),
            Span::raw("  |  Success: "),
            Span::styled(stats.success.to_string(), bold(Color::Green)),
            Span::raw("  |  Fail: "),
            Span::styled(stats.fail.to_string(), bold(Color::Red)),
            Span::raw("  |  Timeout: "),
            Span::styled(stats.timeout.to_string(), bold(Color::Yellow)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("  Success Rate: "),
            Span::styled(format!("{:.1}%", stats.success_rate()), bold(Color::Green)),
            Span::raw("  |  Average: "),
            Span::styled(time_or_na(stats.average_time), bold(Color::Cyan)),
            Span::raw("  |  Best: "),
            Span::styled(time_or_na(stats.best_time), bold(Color::Green)),
            Span::raw("  |  Worst: "),
            Span::styled(time_or_na(stats.worst_time), bold(Color::Red)),
        ]),
        Line::from(""),
    ];

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title.to_string()));

    f.render_widget(paragraph, area);
}

fn mode_line(label: &str, stats: &ModeStats) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("  {:<10}", label)),
        Span::raw(format!("{} played, {} succeeded", stats.total, stats.success)),
        Span::raw("  |  Average: "),
        Span::styled(time_or_na(stats.average_time), bold(Color::Cyan)),
        Span::raw("  |  Best: "),
        Span::styled(time_or_na(stats.best_time), bold(Color::Green)),
    ])
}

fn draw_mode_stats(f: &mut Frame, area: Rect, stats: &HistoryStats) {
    let lines = vec![
        Line::from(""),
        mode_line("Countdown", &stats.countdown),
        mode_line("Unlimited", &stats.unlimited),
    ];

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("By Mode"));

    f.render_widget(paragraph, area);
}

fn draw_recent_sessions(f: &mut Frame, area: Rect, history_data: &HistoryData) {
    // Records are kept newest first.
    let rows: Vec<Row> = history_data
        .records
        .iter()
        .take(RECENT_COUNT)
        .map(|record| {
            Row::new(vec![
                format_date(record),
                record.record.mode_display.clone(),
                record.outcome().to_string(),
                format_time(record.time_used()),
            ])
            .style(Style::default().fg(outcome_color(record.outcome())))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["Date", "Mode", "Result", "Time"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Recent Sessions (Latest {})", RECENT_COUNT)),
    );

    f.render_widget(table, area);
}
