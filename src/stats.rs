//! Aggregate statistics over the session history.

use serde::Serialize;

use crate::record::{HistoryRecord, Outcome, round2};

/// Figures for one family of modes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeStats {
    pub total: usize,
    pub success: usize,
    pub average_time: Option<f64>,
    pub best_time: Option<f64>,
}

/// Aggregated statistics across all records.
///
/// Time figures only consider successful sessions and are `None` when
/// there are none.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total: usize,
    pub success: usize,
    pub fail: usize,
    pub timeout: usize,
    pub average_time: Option<f64>,
    pub best_time: Option<f64>,
    pub worst_time: Option<f64>,
    pub unlimited: ModeStats,
    pub countdown: ModeStats,
}

impl HistoryStats {
    /// Compute statistics from a list of records.
    pub fn from_records(records: &[HistoryRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let mut stats = Self {
            total: records.len(),
            ..Self::default()
        };

        for record in records {
            match record.outcome() {
                Outcome::Success => stats.success += 1,
                Outcome::Fail => stats.fail += 1,
                Outcome::Timeout => stats.timeout += 1,
            }
        }

        let success_times: Vec<f64> = records
            .iter()
            .filter(|r| r.outcome() == Outcome::Success)
            .map(HistoryRecord::time_used)
            .collect();

        stats.average_time = average(&success_times);
        stats.best_time = success_times.iter().copied().reduce(f64::min);
        stats.worst_time = success_times.iter().copied().reduce(f64::max);

        stats.unlimited = mode_stats(records.iter().filter(|r| r.mode().is_unlimited()));
        stats.countdown = mode_stats(records.iter().filter(|r| r.mode().is_countdown()));

        stats
    }

    /// Share of sessions that succeeded, 0-100.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.success as f64 / self.total as f64 * 100.0
        }
    }
}

fn mode_stats<'a>(records: impl Iterator<Item = &'a HistoryRecord>) -> ModeStats {
    let mut stats = ModeStats::default();
    let mut times = Vec::new();

    for record in records {
        stats.total += 1;
        if record.outcome() == Outcome::Success {
            stats.success += 1;
            times.push(record.time_used());
        }
    }

    stats.average_time = average(&times);
    stats.best_time = times.iter().copied().reduce(f64::min);
    stats
}

fn average(times: &[f64]) -> Option<f64> {
    if times.is_empty() {
        return None;
    }
    Some(round2(times.iter().sum::<f64>() / times.len() as f64))
}
