use std::sync::{Arc, Mutex, PoisonError};

use crate::record::{Comparison, ResultRecord};

pub const MAX_LOG_LINES: usize = 300;

/// Thread-safe circular log buffer with a maximum capacity.
#[derive(Clone)]
pub struct LogBuffer {
    inner: Arc<Mutex<Vec<String>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, msg: String) {
        let mut buf = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        buf.push(msg);
        if buf.len() > MAX_LOG_LINES {
            buf.remove(0);
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Which top-level screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Training,
    History,
}

/// The last finished session, as shown under the grid.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub record: ResultRecord,
    /// Store id, or `None` if saving failed.
    pub saved_id: Option<i64>,
    pub comparison: Option<Comparison>,
}
