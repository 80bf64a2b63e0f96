//! Single record detail view rendering for history mode.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    record::{HistoryRecord, Improvement},
    session::format_time,
    ui::{App, history::HistoryData},
};

use super::{draw_placeholder, format_date, outcome_color};

impl App {
    pub(in crate::ui) fn draw_detail_view(&self, f: &mut Frame, area: Rect) {
        let Some(record) = self
            .history_data
            .as_ref()
            .and_then(HistoryData::selected_record)
        else {
            draw_placeholder(f, area, "Record Detail", "No record selected");
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // Record header
                Constraint::Min(9),    // Grid and replays
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(24), Constraint::Min(20)])
            .split(chunks[1]);

        draw_record_header(f, chunks[0], record);
        draw_record_grid(f, body[0], record);
        if let Some(ref data) = self.history_data {
            draw_replays(f, body[1], data);
        }
    }
}

fn draw_record_header(f: &mut Frame, area: Rect, record: &HistoryRecord) {
    let mut lines = vec![
        Line::from(vec![
            Span::raw("  Date: "),
            Span::styled(
                format_date(record),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  |  Mode: {}", record.record.mode_display)),
        ]),
        Line::from(vec![
            Span::raw("  Outcome: "),
            Span::styled(
                record.outcome().to_string(),
                Style::default()
                    .fg(outcome_color(record.outcome()))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  |  Time: {}  |  Errors: {}",
                format_time(record.time_used()),
                record.record.errors
            )),
        ]),
    ];

    if let Some(ref comparison) = record.comparison {
        let (word, color) = match comparison.improvement {
            Improvement::Up => ("faster", Color::Green),
            Improvement::Down => ("slower", Color::Red),
            Improvement::Same => ("equal", Color::Gray),
        };
        lines.push(Line::from(vec![
            Span::raw(format!(
                "  Replay of #{} ({}): ",
                comparison.original_id,
                format_time(comparison.original_time)
            )),
            Span::styled(
                format!("{} by {:.2}s", word, comparison.time_diff),
                Style::default().fg(color),
            ),
        ]));
    } else if let Some(original_id) = record.record.replay_of {
        lines.push(Line::from(format!(
            "  Replay of #{} (original no longer stored)",
            original_id
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Record #{} | r: Replay | d: Delete | Esc: Back to List", record.id)),
    );

    f.render_widget(paragraph, area);
}

fn draw_record_grid(f: &mut Frame, area: Rect, record: &HistoryRecord) {
    let lines: Vec<Line> = record
        .record
        .grid
        .rows()
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|value| format!("{:>4}", value))
                    .collect::<String>(),
            )
        })
        .collect();

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Grid"));

    f.render_widget(paragraph, area);
}

fn draw_replays(f: &mut Frame, area: Rect, data: &HistoryData) {
    let mut lines: Vec<Line> = data
        .selected_replays
        .iter()
        .map(|replay| {
            Line::from(Span::styled(
                format!(
                    "  #{}  {}  {:<8} {}",
                    replay.id,
                    format_date(replay),
                    replay.outcome().to_string(),
                    format_time(replay.time_used())
                ),
                Style::default().fg(outcome_color(replay.outcome())),
            ))
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No replays yet",
            Style::default().fg(Color::Gray),
        )));
    }

    let title = match data.best_replay_time() {
        Some(best) => format!("Replays | Best: {}", format_time(best)),
        None => "Replays".to_string(),
    };

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(paragraph, area);
}
