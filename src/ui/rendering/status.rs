use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::{
    record::{Improvement, Outcome},
    session::format_time,
    ui::app::App,
};

impl App {
    pub(in crate::ui) fn draw_session_status(&self, f: &mut Frame, area: Rect) {
        let snapshot = self.engine.snapshot();

        let clock_style = if snapshot.is_low_time {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        };

        let (mode, next) = if snapshot.running {
            (snapshot.mode, snapshot.next_expected.to_string())
        } else {
            (self.mode, "-".to_string())
        };

        let mut lines = vec![
            Line::from(vec![
                Span::raw("Mode: "),
                Span::styled(
                    mode.display_name(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::raw("Time: "),
                Span::styled(format_time(snapshot.display_time), clock_style),
            ]),
            Line::from(vec![
                Span::raw("Next: "),
                Span::styled(next, Style::default().fg(Color::Yellow)),
            ]),
        ];

        if let Some(original_id) = self.replay_of {
            lines.push(Line::from(format!("Replaying record #{}", original_id)));
        }

        let help = if snapshot.running {
            "Arrows/Space/Click | Ctrl+N: Restart | Ctrl+Q: Quit"
        } else {
            "Enter: Start | Tab: Mode | Ctrl+P: Replay | Ctrl+R: History"
        };

        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(help)),
            area,
        );
    }

    pub(in crate::ui) fn draw_progress(&self, f: &mut Frame, area: Rect) {
        let snapshot = self.engine.snapshot();
        let color = if snapshot.is_low_time {
            Color::Red
        } else {
            Color::Green
        };

        let title = if snapshot.mode.is_unlimited() {
            "Progress"
        } else {
            "Time Left"
        };

        f.render_widget(
            Gauge::default()
                .block(Block::default().borders(Borders::ALL).title(title))
                .gauge_style(Style::default().fg(color))
                .ratio((snapshot.progress_percentage / 100.0).clamp(0.0, 1.0)),
            area,
        );
    }

    pub(in crate::ui) fn draw_last_result(&self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Last Result");

        let Some(ref summary) = self.last_summary else {
            f.render_widget(
                Paragraph::new("No finished session yet").block(block),
                area,
            );
            return;
        };

        let record = &summary.record;
        let (headline, color) = match record.outcome {
            Outcome::Success => ("Completed!", Color::Green),
            Outcome::Fail => ("Wrong number", Color::Red),
            Outcome::Timeout => ("Time is up", Color::Yellow),
        };

        let mut lines = vec![
            Line::from(Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "{} | {} | errors: {}",
                record.mode_display,
                format_time(record.time_used),
                record.errors
            )),
        ];

        match summary.saved_id {
            Some(id) => lines.push(Line::from(format!("Saved as #{}", id))),
            None => lines.push(Line::from(Span::styled(
                "Not saved",
                Style::default().fg(Color::Red),
            ))),
        }

        if let Some(ref comparison) = summary.comparison {
            let original = format!(
                "#{} ({})",
                comparison.original_id,
                format_time(comparison.original_time)
            );
            let (text, color) = match comparison.improvement {
                Improvement::Up => (
                    format!("{:.2}s faster than {}", comparison.time_diff, original),
                    Color::Green,
                ),
                Improvement::Down => (
                    format!("{:.2}s slower than {}", comparison.time_diff, original),
                    Color::Red,
                ),
                Improvement::Same => (format!("Same time as {}", original), Color::Gray),
            };
            lines.push(Line::from(Span::styled(text, Style::default().fg(color))));
        }

        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}
