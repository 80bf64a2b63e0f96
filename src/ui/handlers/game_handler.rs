//! Training session state management.

use crate::{
    grid::{GRID_SIDE, TOTAL_CELLS},
    record::{HistoryRecord, ResultRecord},
    session::format_time,
};

use super::super::{
    app::{App, block_on},
    types::{Screen, SessionSummary},
};

/// Helper struct for managing session-specific state transitions.
pub struct GameHandler<'a> {
    app: &'a mut App,
}

impl<'a> GameHandler<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub fn start_new_session(&mut self) {
        let mode = self.app.mode;
        self.app.engine.start(mode);
        self.reset_for_session(None);
        self.app.log(format!("Started {} session", mode.display_name()));
    }

    /// Replays the grid and mode of a stored record.
    pub fn start_replay(&mut self, original: &HistoryRecord) {
        self.app.mode = original.mode();
        self.app
            .engine
            .start_replay(original.record.grid, original.mode());
        self.reset_for_session(Some(original.id));
        self.app.log(format!(
            "Replaying record #{} ({}, original time {})",
            original.id,
            original.record.mode_display,
            format_time(original.time_used())
        ));
    }

    /// Replays the grid of the last finished session, if it was saved.
    pub fn replay_last(&mut self) {
        let Some(id) = self.app.last_summary.as_ref().and_then(|s| s.saved_id) else {
            self.app.log("Nothing to replay yet");
            return;
        };

        match block_on(self.app.store.get_by_id(id)) {
            Some(original) => self.start_replay(&original),
            None => self.app.log(format!("Record #{} is no longer stored", id)),
        }
    }

    fn reset_for_session(&mut self, replay_of: Option<i64>) {
        self.app.replay_of = replay_of;
        self.app.last_summary = None;
        self.app.cursor = (0, 0);
        self.app.screen = Screen::Training;
    }

    /// Cycles the mode used for the next session. Ignored mid-session.
    pub fn cycle_mode(&mut self) {
        if self.app.engine.is_running() {
            return;
        }
        self.app.mode = self.app.mode.next();
        self.app
            .log(format!("Mode: {}", self.app.mode.display_name()));
    }

    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let (row, col) = self.app.cursor;
        let max = GRID_SIDE as isize - 1;
        self.app.cursor = (
            (row as isize + d_row).clamp(0, max) as usize,
            (col as isize + d_col).clamp(0, max) as usize,
        );
    }

    /// Clicks the cell under the cursor.
    pub fn click_cursor(&mut self) {
        let (row, col) = self.app.cursor;
        self.click_cell(row, col);
    }

    pub fn click_cell(&mut self, row: usize, col: usize) {
        let Some(value) = self
            .app
            .engine
            .snapshot()
            .grid
            .and_then(|grid| grid.value_at(row, col))
        else {
            return;
        };

        self.app.cursor = (row, col);
        if let Some(record) = self.app.engine.click(value) {
            self.finish_session(record);
        }
    }

    /// Saves any sessions that ended on the clock since the last frame.
    pub fn poll_timeouts(&mut self) {
        while let Ok(record) = self.app.timeout_rx.try_recv() {
            self.app.log("Time is up!");
            self.finish_session(record);
        }
    }

    /// Persists a finished session and records it as the last summary.
    pub fn finish_session(&mut self, record: ResultRecord) {
        let record = match self.app.replay_of.take() {
            Some(original_id) => record.with_replay_of(original_id),
            None => record,
        };

        self.app.log(format!(
            "Session {}: {} ({} of {} found)",
            record.outcome,
            format_time(record.time_used),
            found_count(&record, self.app.engine.snapshot().next_expected),
            TOTAL_CELLS
        ));

        let saved_id = block_on(self.app.store.save(record.clone()));
        let comparison = match saved_id {
            Some(id) => {
                self.app.log(format!("Saved as record #{}", id));
                self.app
                    .store
                    .history()
                    .first()
                    .filter(|r| r.id == id)
                    .and_then(|r| r.comparison.clone())
            }
            None => {
                self.app.log("Failed to save record, see log file");
                None
            }
        };

        if let Some(ref c) = comparison {
            self.app.log(format!(
                "Versus #{}: {} by {}s",
                c.original_id,
                c.improvement.as_str(),
                c.time_diff
            ));
        }

        self.app.last_summary = Some(SessionSummary {
            record,
            saved_id,
            comparison,
        });
        // Reload on next visit.
        self.app.history_data = None;
    }
}

fn found_count(record: &ResultRecord, next_expected: u8) -> usize {
    if record.is_success() {
        TOTAL_CELLS
    } else {
        usize::from(next_expected.saturating_sub(1))
    }
}
