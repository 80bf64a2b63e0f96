//! Result records produced at the end of a session.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{grid::Grid, mode::Mode};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Fail,
    Timeout,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Fail => "fail",
            Outcome::Timeout => "timeout",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Outcome::Success),
            "fail" => Some(Outcome::Fail),
            "timeout" => Some(Outcome::Timeout),
            _ => None,
        }
    }

    /// Errors charged to the attempt: a wrong click is the only error.
    pub fn errors(self) -> u32 {
        match self {
            Outcome::Fail => 1,
            Outcome::Success | Outcome::Timeout => 0,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a replay's time against its original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Improvement {
    /// The replay was faster.
    Up,
    /// The replay was slower.
    Down,
    Same,
}

impl Improvement {
    pub fn as_str(self) -> &'static str {
        match self {
            Improvement::Up => "up",
            Improvement::Down => "down",
            Improvement::Same => "same",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Improvement::Up),
            "down" => Some(Improvement::Down),
            "same" => Some(Improvement::Same),
            _ => None,
        }
    }
}

/// Replay result compared against the original attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub original_id: i64,
    pub original_time: f64,
    pub improvement: Improvement,
    pub time_diff: f64,
}

impl Comparison {
    pub fn between(original_id: i64, original_time: f64, new_time: f64) -> Self {
        let delta = round2(original_time - new_time);
        let improvement = if delta > 0.0 {
            Improvement::Up
        } else if delta < 0.0 {
            Improvement::Down
        } else {
            Improvement::Same
        };

        Self {
            original_id,
            original_time,
            improvement,
            time_diff: delta.abs(),
        }
    }
}

/// A finished session, as handed from the engine to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub timestamp: DateTime<Utc>,
    pub mode: Mode,
    pub mode_display: String,
    pub outcome: Outcome,
    /// Seconds, rounded to two decimals.
    pub time_used: f64,
    pub errors: u32,
    pub grid: Grid,
    pub replay_of: Option<i64>,
}

impl ResultRecord {
    pub fn new(mode: Mode, outcome: Outcome, time_used: f64, grid: Grid) -> Self {
        Self {
            timestamp: Utc::now(),
            mode,
            mode_display: mode.display_name(),
            outcome,
            time_used: round2(time_used.max(0.0)),
            errors: outcome.errors(),
            grid,
            replay_of: None,
        }
    }

    /// Marks this attempt as a replay of the stored record `original_id`.
    pub fn with_replay_of(mut self, original_id: i64) -> Self {
        self.replay_of = Some(original_id);
        self
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// A persisted record with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: i64,
    #[serde(flatten)]
    pub record: ResultRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
}

impl HistoryRecord {
    pub fn outcome(&self) -> Outcome {
        self.record.outcome
    }

    pub fn mode(&self) -> Mode {
        self.record.mode
    }

    pub fn time_used(&self) -> f64 {
        self.record.time_used
    }
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> Grid {
        let values: Vec<u8> = (1..=25).collect();
        Grid::from_cells(&values).unwrap()
    }

    #[test]
    fn test_errors_follow_outcome() {
        let grid = sample_grid();
        assert_eq!(ResultRecord::new(Mode::default(), Outcome::Fail, 3.0, grid).errors, 1);
        assert_eq!(ResultRecord::new(Mode::default(), Outcome::Success, 3.0, grid).errors, 0);
        assert_eq!(ResultRecord::new(Mode::default(), Outcome::Timeout, 30.0, grid).errors, 0);
    }

    #[test]
    fn test_time_used_is_rounded_and_clamped() {
        let grid = sample_grid();
        let record = ResultRecord::new(Mode::Unlimited, Outcome::Success, 12.3456, grid);
        assert_eq!(record.time_used, 12.35);
        assert_eq!(record.mode_display, "Unlimited");

        let negative = ResultRecord::new(Mode::default(), Outcome::Fail, -0.1, grid);
        assert_eq!(negative.time_used, 0.0);
    }

    #[test]
    fn test_comparison_directions() {
        let slower = Comparison::between(1, 10.0, 12.34);
        assert_eq!(slower.improvement, Improvement::Down);
        assert_eq!(slower.time_diff, 2.34);

        let faster = Comparison::between(1, 10.0, 8.5);
        assert_eq!(faster.improvement, Improvement::Up);
        assert_eq!(faster.time_diff, 1.5);

        let same = Comparison::between(1, 10.0, 10.001);
        assert_eq!(same.improvement, Improvement::Same);
        assert_eq!(same.time_diff, 0.0);
    }

    #[test]
    fn test_outcome_strings() {
        for outcome in [Outcome::Success, Outcome::Fail, Outcome::Timeout] {
            assert_eq!(Outcome::from_string(outcome.as_str()), Some(outcome));
        }
        assert_eq!(Outcome::from_string("won"), None);
    }

    #[test]
    fn test_history_record_json_omits_missing_comparison() {
        let record = HistoryRecord {
            id: 4,
            record: ResultRecord::new(Mode::default(), Outcome::Success, 9.0, sample_grid()),
            comparison: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["mode"], "30");
        assert_eq!(json["outcome"], "success");
        assert!(json.get("comparison").is_none());
    }
}
