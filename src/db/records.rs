use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::models::{RecordRow, serialize_grid};
use crate::record::{Comparison, HistoryRecord, ResultRecord};

const SELECT_COLUMNS: &str = r#"
    SELECT id, timestamp_ms, mode, mode_display, outcome, time_used, errors, grid,
           replay_of, original_id, original_time, improvement, time_diff
    FROM records
"#;

/// Insert a finished record and return its new id
pub async fn insert_record(
    pool: &SqlitePool,
    record: &ResultRecord,
    comparison: Option<&Comparison>,
) -> Result<i64> {
    let grid_json = serialize_grid(&record.grid)?;

    let result = sqlx::query(
        r#"
        INSERT INTO records (
            timestamp_ms, mode, mode_display, outcome, time_used, errors, grid,
            replay_of, original_id, original_time, improvement, time_diff
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.timestamp.timestamp_millis())
    .bind(record.mode.key())
    .bind(&record.mode_display)
    .bind(record.outcome.as_str())
    .bind(record.time_used)
    .bind(i64::from(record.errors))
    .bind(grid_json)
    .bind(record.replay_of)
    .bind(comparison.map(|c| c.original_id))
    .bind(comparison.map(|c| c.original_time))
    .bind(comparison.map(|c| c.improvement.as_str()))
    .bind(comparison.map(|c| c.time_diff))
    .execute(pool)
    .await
    .context("Failed to insert record")?;

    Ok(result.last_insert_rowid())
}

/// Get a record by ID
pub async fn get_record(pool: &SqlitePool, id: i64) -> Result<Option<HistoryRecord>> {
    let row = sqlx::query_as::<_, RecordRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch record")?;

    row.map(HistoryRecord::try_from).transpose()
}

/// Get all records, most recent first
pub async fn get_all_records(pool: &SqlitePool) -> Result<Vec<HistoryRecord>> {
    let rows = sqlx::query_as::<_, RecordRow>(&format!(
        "{SELECT_COLUMNS} ORDER BY timestamp_ms DESC, id DESC"
    ))
    .fetch_all(pool)
    .await
    .context("Failed to fetch records")?;

    rows.into_iter().map(HistoryRecord::try_from).collect()
}

/// Get all replays of the record `original_id`, oldest first
pub async fn get_replays_of(pool: &SqlitePool, original_id: i64) -> Result<Vec<HistoryRecord>> {
    let rows = sqlx::query_as::<_, RecordRow>(&format!(
        "{SELECT_COLUMNS} WHERE replay_of = ? ORDER BY timestamp_ms ASC, id ASC"
    ))
    .bind(original_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch replays")?;

    rows.into_iter().map(HistoryRecord::try_from).collect()
}

/// Delete a record by ID. Returns whether a row was removed
pub async fn delete_record(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM records WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete record")?;

    Ok(result.rows_affected() > 0)
}

/// Delete every record. The id sequence is kept so ids are never reused
pub async fn clear_records(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM records")
        .execute(pool)
        .await
        .context("Failed to clear records")?;

    Ok(result.rows_affected())
}

/// Count stored records
pub async fn count_records(pool: &SqlitePool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM records")
        .fetch_one(pool)
        .await
        .context("Failed to count records")?;

    Ok(count)
}

/// Get the highest stored record ID
pub async fn get_last_record_id(pool: &SqlitePool) -> Result<Option<i64>> {
    let (id,): (Option<i64>,) = sqlx::query_as("SELECT MAX(id) FROM records")
        .fetch_one(pool)
        .await
        .context("Failed to fetch last record id")?;

    Ok(id)
}
