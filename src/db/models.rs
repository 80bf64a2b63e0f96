use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};

use crate::{
    grid::Grid,
    mode::Mode,
    record::{Comparison, HistoryRecord, Improvement, Outcome, ResultRecord},
};

/// Represents a row of the `records` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecordRow {
    pub id: i64,
    pub timestamp_ms: i64,
    pub mode: String,
    pub mode_display: String,
    pub outcome: String,
    pub time_used: f64,
    pub errors: i64,
    pub grid: String,
    pub replay_of: Option<i64>,
    pub original_id: Option<i64>,
    pub original_time: Option<f64>,
    pub improvement: Option<String>,
    pub time_diff: Option<f64>,
}

impl TryFrom<RecordRow> for HistoryRecord {
    type Error = anyhow::Error;

    fn try_from(row: RecordRow) -> Result<Self> {
        let timestamp = DateTime::<Utc>::from_timestamp_millis(row.timestamp_ms)
            .ok_or_else(|| anyhow!("record {} has invalid timestamp {}", row.id, row.timestamp_ms))?;
        let mode: Mode = row
            .mode
            .parse()
            .with_context(|| format!("record {} has invalid mode", row.id))?;
        let outcome = Outcome::from_string(&row.outcome)
            .ok_or_else(|| anyhow!("record {} has invalid outcome {:?}", row.id, row.outcome))?;
        let grid = deserialize_grid(&row.grid)
            .with_context(|| format!("record {} has invalid grid", row.id))?;
        let errors = u32::try_from(row.errors)
            .with_context(|| format!("record {} has invalid error count", row.id))?;

        let comparison = match (row.original_id, row.original_time, row.improvement, row.time_diff) {
            (Some(original_id), Some(original_time), Some(improvement), Some(time_diff)) => {
                let improvement = Improvement::from_string(&improvement).ok_or_else(|| {
                    anyhow!("record {} has invalid improvement {:?}", row.id, improvement)
                })?;
                Some(Comparison {
                    original_id,
                    original_time,
                    improvement,
                    time_diff,
                })
            }
            _ => None,
        };

        Ok(HistoryRecord {
            id: row.id,
            record: ResultRecord {
                timestamp,
                mode,
                mode_display: row.mode_display,
                outcome,
                time_used: row.time_used,
                errors,
                grid,
                replay_of: row.replay_of,
            },
            comparison,
        })
    }
}

/// Helper function to serialize a grid to JSON
pub fn serialize_grid(grid: &Grid) -> Result<String> {
    serde_json::to_string(grid).context("Failed to serialize grid")
}

/// Helper function to deserialize a grid from JSON, validating it
pub fn deserialize_grid(json: &str) -> Result<Grid> {
    serde_json::from_str(json).context("Failed to deserialize grid")
}
