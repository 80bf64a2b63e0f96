//! Number grid rendering.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::{grid::GRID_SIDE, ui::app::App};

/// Area of the cell at `(row, col)` inside the grid border.
pub(in crate::ui) fn cell_rect(inner: Rect, row: usize, col: usize) -> Rect {
    let side = GRID_SIDE as u16;
    let width = inner.width / side;
    let height = inner.height / side;
    Rect {
        x: inner.x + col as u16 * width,
        y: inner.y + row as u16 * height,
        width,
        height,
    }
}

impl App {
    pub(in crate::ui) fn draw_grid(&self, f: &mut Frame, area: Rect) {
        let snapshot = self.engine.snapshot();
        let block = Block::default().borders(Borders::ALL).title(format!(
            "Schulte Table | Find 1 to {}",
            crate::grid::TOTAL_CELLS
        ));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let Some(grid) = snapshot.grid else {
            self.grid_area.set(None);
            let text = vec![
                Line::from(""),
                Line::from("Press Enter to start a session"),
                Line::from("Tab changes the mode"),
            ];
            f.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
            return;
        };

        self.grid_area.set(Some(inner));

        for row in 0..GRID_SIDE {
            for col in 0..GRID_SIDE {
                let Some(value) = grid.value_at(row, col) else {
                    continue;
                };
                let cell = cell_rect(inner, row, col);
                if cell.width == 0 || cell.height == 0 {
                    continue;
                }

                let found = snapshot.running && value < snapshot.next_expected;
                let mut style = if found {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                };
                if snapshot.running && (row, col) == self.cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }

                let mut lines = vec![Line::from(""); usize::from(cell.height.saturating_sub(1) / 2)];
                lines.push(Line::from(value.to_string()));

                f.render_widget(
                    Paragraph::new(lines)
                        .alignment(Alignment::Center)
                        .style(style),
                    cell,
                );
            }
        }
    }
}
