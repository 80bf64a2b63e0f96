//! Data structures for the history screen.

use crate::{record::HistoryRecord, stats::HistoryStats};

/// Records shown per list page.
pub const PAGE_SIZE: usize = 10;

/// Display mode for history viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryViewMode {
    Stats,  // Statistics dashboard
    List,   // Paginated record list
    Detail, // Single record with its replays
}

/// Snapshot of the stored history for display.
#[derive(Debug, Clone)]
pub struct HistoryData {
    pub records: Vec<HistoryRecord>,
    pub stats: HistoryStats,
    pub selected_index: Option<usize>,
    /// Replays of the selected record, oldest first.
    pub selected_replays: Vec<HistoryRecord>,
}

impl HistoryData {
    pub fn new(records: Vec<HistoryRecord>) -> Self {
        let stats = HistoryStats::from_records(&records);
        Self {
            records,
            stats,
            selected_index: None,
            selected_replays: Vec::new(),
        }
    }

    /// Get the total number of pages for pagination.
    pub fn total_pages(&self) -> usize {
        if self.records.is_empty() {
            1
        } else {
            self.records.len().div_ceil(PAGE_SIZE)
        }
    }

    /// Get records for a specific page (0-indexed).
    pub fn records_for_page(&self, page: usize) -> &[HistoryRecord] {
        let start = page * PAGE_SIZE;
        if start >= self.records.len() {
            return &[];
        }
        let end = (start + PAGE_SIZE).min(self.records.len());
        &self.records[start..end]
    }

    /// Get the currently selected record, if any.
    pub fn selected_record(&self) -> Option<&HistoryRecord> {
        self.selected_index.and_then(|idx| self.records.get(idx))
    }

    /// Select a record by its index in the list.
    pub fn select(&mut self, index: usize, replays: Vec<HistoryRecord>) -> bool {
        if index < self.records.len() {
            self.selected_index = Some(index);
            self.selected_replays = replays;
            true
        } else {
            false
        }
    }

    /// Clear the record selection.
    pub fn clear_selection(&mut self) {
        self.selected_index = None;
        self.selected_replays.clear();
    }

    /// Best successful time among the replays of the selected record.
    pub fn best_replay_time(&self) -> Option<f64> {
        self.selected_replays
            .iter()
            .filter(|r| r.record.is_success())
            .map(HistoryRecord::time_used)
            .reduce(f64::min)
    }
}
