mod types;

pub use types::{HistoryData, HistoryViewMode, PAGE_SIZE};
