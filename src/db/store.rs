//! Record store: durable history plus an in-memory newest-first view.
//!
//! Every storage error stops here. Failures are logged and reported as
//! `None`, an empty list or `false`; nothing is propagated to the caller.

use sqlx::SqlitePool;
use tracing::{error, info, warn};

use super::records;
use crate::{
    record::{Comparison, HistoryRecord, ResultRecord},
    stats::HistoryStats,
};

pub struct RecordStore {
    pool: SqlitePool,
    history: Vec<HistoryRecord>,
}

impl RecordStore {
    /// Creates a store with an empty in-memory view; call
    /// [`RecordStore::load_history`] to populate it.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            history: Vec::new(),
        }
    }

    /// Creates a store and loads the stored history.
    pub async fn open(pool: SqlitePool) -> Self {
        let mut store = Self::new(pool);
        store.load_history().await;
        store
    }

    /// Reloads the in-memory view. On failure the view is left empty.
    pub async fn load_history(&mut self) {
        match records::get_all_records(&self.pool).await {
            Ok(history) => {
                info!(count = history.len(), "Loaded history");
                self.history = history;
            }
            Err(e) => {
                error!("Failed to load history: {:#}", e);
                self.history.clear();
            }
        }
    }

    /// Persists a finished record and returns its new id, or `None` if the
    /// write failed.
    ///
    /// Replays of a record that still exists get a comparison against it.
    pub async fn save(&mut self, record: ResultRecord) -> Option<i64> {
        let comparison = match record.replay_of {
            Some(original_id) => self.comparison_for(original_id, record.time_used).await,
            None => None,
        };

        let id = match records::insert_record(&self.pool, &record, comparison.as_ref()).await {
            Ok(id) => id,
            Err(e) => {
                error!(outcome = %record.outcome, "Failed to save record: {:#}", e);
                return None;
            }
        };

        info!(
            record_id = id,
            outcome = %record.outcome,
            mode = %record.mode,
            time_used = record.time_used,
            "Saved record"
        );

        self.history.insert(
            0,
            HistoryRecord {
                id,
                record,
                comparison,
            },
        );
        Some(id)
    }

    async fn comparison_for(&self, original_id: i64, new_time: f64) -> Option<Comparison> {
        match records::get_record(&self.pool, original_id).await {
            Ok(Some(original)) => Some(Comparison::between(
                original_id,
                original.time_used(),
                new_time,
            )),
            Ok(None) => {
                warn!(original_id, "Replay original not found, saving without comparison");
                None
            }
            Err(e) => {
                warn!(original_id, "Failed to look up replay original: {:#}", e);
                None
            }
        }
    }

    /// All stored records, newest first.
    pub async fn get_all(&self) -> Vec<HistoryRecord> {
        records::get_all_records(&self.pool)
            .await
            .unwrap_or_else(|e| {
                error!("Failed to fetch records: {:#}", e);
                Vec::new()
            })
    }

    pub async fn get_by_id(&self, id: i64) -> Option<HistoryRecord> {
        records::get_record(&self.pool, id)
            .await
            .unwrap_or_else(|e| {
                error!(record_id = id, "Failed to fetch record: {:#}", e);
                None
            })
    }

    /// Every record that replayed the record `id`.
    pub async fn get_replays_of(&self, id: i64) -> Vec<HistoryRecord> {
        records::get_replays_of(&self.pool, id)
            .await
            .unwrap_or_else(|e| {
                error!(record_id = id, "Failed to fetch replays: {:#}", e);
                Vec::new()
            })
    }

    /// Deletes one record. Returns whether it existed.
    pub async fn delete(&mut self, id: i64) -> bool {
        match records::delete_record(&self.pool, id).await {
            Ok(deleted) => {
                self.history.retain(|r| r.id != id);
                if deleted {
                    info!(record_id = id, "Deleted record");
                }
                deleted
            }
            Err(e) => {
                error!(record_id = id, "Failed to delete record: {:#}", e);
                false
            }
        }
    }

    /// Deletes every record. Returns whether the storage delete succeeded.
    pub async fn clear(&mut self) -> bool {
        match records::clear_records(&self.pool).await {
            Ok(removed) => {
                info!(removed, "Cleared history");
                self.history.clear();
                true
            }
            Err(e) => {
                error!("Failed to clear history: {:#}", e);
                false
            }
        }
    }

    pub async fn count(&self) -> i64 {
        records::count_records(&self.pool).await.unwrap_or_else(|e| {
            error!("Failed to count records: {:#}", e);
            0
        })
    }

    pub async fn last_id(&self) -> Option<i64> {
        records::get_last_record_id(&self.pool)
            .await
            .unwrap_or_else(|e| {
                error!("Failed to fetch last record id: {:#}", e);
                None
            })
    }

    /// The loaded history, newest first.
    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    /// Statistics over the loaded history.
    pub fn stats(&self) -> HistoryStats {
        HistoryStats::from_records(&self.history)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::create_memory_pool,
        grid::Grid,
        mode::{CountdownSecs, Mode},
        record::{Improvement, Outcome},
    };

    fn grid() -> Grid {
        let cells: Vec<u8> = (1..=25).rev().collect();
        Grid::from_cells(&cells).unwrap()
    }

    fn record(mode: Mode, outcome: Outcome, time_used: f64) -> ResultRecord {
        ResultRecord::new(mode, outcome, time_used, grid())
    }

    async fn open_store() -> RecordStore {
        RecordStore::open(create_memory_pool().await.unwrap()).await
    }

    #[tokio::test]
    async fn test_save_prepends_and_assigns_ids() {
        let mut store = open_store().await;

        let first = store.save(record(Mode::default(), Outcome::Success, 9.0)).await.unwrap();
        let second = store.save(record(Mode::Unlimited, Outcome::Fail, 2.0)).await.unwrap();

        assert!(second > first);
        assert_eq!(store.history()[0].id, second);
        assert_eq!(store.history()[1].id, first);

        let all = store.get_all().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second);
    }

    #[tokio::test]
    async fn test_replay_of_faster_original_is_down() {
        let mut store = open_store().await;
        let original = store.save(record(Mode::default(), Outcome::Success, 10.25)).await.unwrap();

        let replay = record(Mode::default(), Outcome::Success, 12.5).with_replay_of(original);
        let id = store.save(replay).await.unwrap();

        let saved = store.get_by_id(id).await.unwrap();
        let comparison = saved.comparison.expect("comparison attached");
        assert_eq!(comparison.original_id, original);
        assert_eq!(comparison.original_time, 10.25);
        assert_eq!(comparison.improvement, Improvement::Down);
        assert_eq!(comparison.time_diff, 2.25);
        assert_eq!(store.history()[0].comparison, Some(comparison));
    }

    #[tokio::test]
    async fn test_replay_of_slower_original_is_up() {
        let mut store = open_store().await;
        let original = store.save(record(Mode::Unlimited, Outcome::Success, 20.0)).await.unwrap();

        let replay = record(Mode::Unlimited, Outcome::Success, 15.5).with_replay_of(original);
        let id = store.save(replay).await.unwrap();

        let comparison = store.get_by_id(id).await.unwrap().comparison.unwrap();
        assert_eq!(comparison.improvement, Improvement::Up);
        assert_eq!(comparison.time_diff, 4.5);
    }

    #[tokio::test]
    async fn test_replay_of_missing_original_saves_without_comparison() {
        let mut store = open_store().await;
        let replay = record(Mode::default(), Outcome::Success, 8.0).with_replay_of(404);

        let id = store.save(replay).await.expect("save still succeeds");
        let saved = store.get_by_id(id).await.unwrap();

        assert_eq!(saved.record.replay_of, Some(404));
        assert!(saved.comparison.is_none());
    }

    #[tokio::test]
    async fn test_get_replays_of() {
        let mut store = open_store().await;
        let original = store.save(record(Mode::default(), Outcome::Success, 10.0)).await.unwrap();
        let other = store.save(record(Mode::default(), Outcome::Success, 11.0)).await.unwrap();

        let a = store.save(record(Mode::default(), Outcome::Fail, 1.0).with_replay_of(original)).await.unwrap();
        let b = store.save(record(Mode::default(), Outcome::Success, 9.0).with_replay_of(original)).await.unwrap();
        store.save(record(Mode::default(), Outcome::Success, 9.0).with_replay_of(other)).await.unwrap();

        let replays: Vec<i64> = store.get_replays_of(original).await.iter().map(|r| r.id).collect();
        assert_eq!(replays, vec![a, b]);
        assert!(store.get_replays_of(b).await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_then_save_uses_fresh_id() {
        let mut store = open_store().await;
        let first = store.save(record(Mode::default(), Outcome::Timeout, 30.0)).await.unwrap();
        let second = store.save(record(Mode::default(), Outcome::Success, 14.0)).await.unwrap();

        assert!(store.clear().await);
        assert!(store.get_all().await.is_empty());
        assert!(store.history().is_empty());
        assert_eq!(store.count().await, 0);

        let third = store.save(record(Mode::default(), Outcome::Success, 13.0)).await.unwrap();
        assert!(third > second);
        assert_ne!(third, first);
        assert_eq!(store.last_id().await, Some(third));
    }

    #[tokio::test]
    async fn test_delete_updates_view() {
        let mut store = open_store().await;
        let id = store.save(record(Mode::default(), Outcome::Success, 14.0)).await.unwrap();

        assert!(store.delete(id).await);
        assert!(store.history().is_empty());
        assert!(store.get_by_id(id).await.is_none());
        assert!(!store.delete(id).await);
    }

    #[tokio::test]
    async fn test_stats_follow_saved_records() {
        let mut store = open_store().await;
        let thirty = Mode::Countdown(CountdownSecs::Thirty);
        store.save(record(thirty, Outcome::Success, 12.0)).await;
        store.save(record(thirty, Outcome::Timeout, 30.0)).await;
        store.save(record(Mode::Unlimited, Outcome::Success, 20.0)).await;

        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.success, 2);
        assert_eq!(stats.timeout, 1);
        assert_eq!(stats.best_time, Some(12.0));
        assert_eq!(stats.countdown.total, 2);
        assert_eq!(stats.unlimited.best_time, Some(20.0));
    }

    #[tokio::test]
    async fn test_storage_failure_is_absorbed() {
        let pool = create_memory_pool().await.unwrap();
        let mut store = RecordStore::open(pool.clone()).await;
        store.save(record(Mode::default(), Outcome::Success, 9.0)).await.unwrap();

        pool.close().await;

        assert!(store.save(record(Mode::default(), Outcome::Success, 8.0)).await.is_none());
        assert_eq!(store.history().len(), 1);
        assert!(store.get_all().await.is_empty());
        assert!(store.get_by_id(1).await.is_none());
        assert!(!store.clear().await);

        store.load_history().await;
        assert!(store.history().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_rows_reset_history() {
        let pool = create_memory_pool().await.unwrap();
        let mut store = RecordStore::open(pool.clone()).await;
        store.save(record(Mode::default(), Outcome::Success, 9.0)).await.unwrap();

        sqlx::query(
            "INSERT INTO records (timestamp_ms, mode, mode_display, outcome, time_used, errors, grid)
             VALUES (0, '30', '30s', 'success', 1.0, 0, 'garbage')",
        )
        .execute(&pool)
        .await
        .unwrap();

        store.load_history().await;
        assert!(store.history().is_empty());
    }

    #[tokio::test]
    async fn test_history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");

        let id = {
            let pool = crate::db::create_pool(&path).await.unwrap();
            let mut store = RecordStore::open(pool.clone()).await;
            let id = store.save(record(Mode::Unlimited, Outcome::Success, 33.3)).await.unwrap();
            pool.close().await;
            id
        };

        let pool = crate::db::create_pool(&path).await.unwrap();
        let store = RecordStore::open(pool).await;
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history()[0].id, id);
        assert_eq!(store.history()[0].record.grid, grid());
    }
}
