//! History mode state management.

use super::super::{
    app::{App, block_on},
    history::{HistoryData, HistoryViewMode, PAGE_SIZE},
    types::Screen,
};
use super::GameHandler;

/// Helper struct for managing history mode state and operations.
pub struct HistoryHandler<'a> {
    app: &'a mut App,
}

impl<'a> HistoryHandler<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    /// Enter history mode. Not available while a session is running.
    pub fn enter_history_mode(&mut self) {
        if self.app.engine.is_running() {
            self.app.log("Finish the current session before opening history");
            return;
        }

        self.app.screen = Screen::History;
        self.app.history_view_mode = HistoryViewMode::Stats;
        self.app.history_page = 0;
        self.app.clear_pending = false;

        if self.app.history_data.is_none() {
            self.load_history();
        }
    }

    pub fn exit_history_mode(&mut self) {
        self.app.screen = Screen::Training;
        self.app.clear_pending = false;
    }

    /// Reload the stored history and rebuild the statistics.
    pub fn load_history(&mut self) {
        block_on(self.app.store.load_history());
        let records = self.app.store.history().to_vec();
        let count = records.len();

        self.app.history_data = Some(HistoryData::new(records));
        self.app.log(format!("Loaded {} record(s) from history", count));
    }

    /// Switch to the next view mode (Stats -> List -> Detail -> Stats).
    /// Detail is skipped when nothing is selected.
    pub fn cycle_view_mode(&mut self) {
        let has_selection = self
            .app
            .history_data
            .as_ref()
            .is_some_and(|data| data.selected_record().is_some());

        self.app.history_view_mode = match self.app.history_view_mode {
            HistoryViewMode::Stats => HistoryViewMode::List,
            HistoryViewMode::List if has_selection => HistoryViewMode::Detail,
            HistoryViewMode::List | HistoryViewMode::Detail => HistoryViewMode::Stats,
        };
    }

    /// Go to the next page in list view.
    pub fn next_page(&mut self) {
        if let Some(ref data) = self.app.history_data
            && self.app.history_page + 1 < data.total_pages()
        {
            self.app.history_page += 1;
        }
    }

    /// Go to the previous page in list view.
    pub fn prev_page(&mut self) {
        self.app.history_page = self.app.history_page.saturating_sub(1);
    }

    /// Select a record at the given index on the current page and open
    /// its detail view.
    pub fn select_record_on_page(&mut self, page_index: usize) {
        let global_index = self.app.history_page * PAGE_SIZE + page_index;
        let Some(id) = self
            .app
            .history_data
            .as_ref()
            .and_then(|data| data.records.get(global_index))
            .map(|record| record.id)
        else {
            return;
        };

        let replays = block_on(self.app.store.get_replays_of(id));
        if let Some(ref mut data) = self.app.history_data
            && data.select(global_index, replays)
        {
            self.app.history_view_mode = HistoryViewMode::Detail;
        }
    }

    /// Return from detail view to list view.
    pub fn return_to_list(&mut self) {
        if let Some(ref mut data) = self.app.history_data {
            data.clear_selection();
        }
        self.app.history_view_mode = HistoryViewMode::List;
    }

    /// Return to stats view from any other view.
    pub fn return_to_stats(&mut self) {
        if let Some(ref mut data) = self.app.history_data {
            data.clear_selection();
        }
        self.app.history_view_mode = HistoryViewMode::Stats;
    }

    /// Start a replay of the selected record.
    pub fn replay_selected(&mut self) {
        let Some(original) = self
            .app
            .history_data
            .as_ref()
            .and_then(|data| data.selected_record())
            .cloned()
        else {
            return;
        };

        GameHandler::new(self.app).start_replay(&original);
    }

    /// Delete the selected record and reload the list.
    pub fn delete_selected(&mut self) {
        let Some(id) = self
            .app
            .history_data
            .as_ref()
            .and_then(|data| data.selected_record())
            .map(|record| record.id)
        else {
            return;
        };

        if block_on(self.app.store.delete(id)) {
            self.app.log(format!("Deleted record #{}", id));
        } else {
            self.app.log(format!("Failed to delete record #{}", id));
        }

        self.load_history();
        self.clamp_page();
        self.app.history_view_mode = HistoryViewMode::List;
    }

    /// Clear all records. The first call only arms the confirmation.
    pub fn request_clear(&mut self) {
        if !self.app.clear_pending {
            self.app.clear_pending = true;
            self.app.log("Press Ctrl+X again to delete all records");
            return;
        }

        self.app.clear_pending = false;
        if block_on(self.app.store.clear()) {
            self.app.log("History cleared");
        } else {
            self.app.log("Failed to clear history");
        }

        self.load_history();
        self.app.history_page = 0;
        self.app.history_view_mode = HistoryViewMode::Stats;
    }

    fn clamp_page(&mut self) {
        if let Some(ref data) = self.app.history_data {
            self.app.history_page = self.app.history_page.min(data.total_pages() - 1);
        }
    }
}
