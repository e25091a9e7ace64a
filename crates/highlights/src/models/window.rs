//! Sync window model

use chrono::{DateTime, Utc};

/// How the sync window was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// Explicit start/end dates supplied by the operator
    Explicit,
    /// The "all time" flag: no lower bound
    AllTime,
    /// Lower bound taken from the persisted checkpoint
    Incremental,
}

/// The half-open time range `[start, end)` used to filter fetched items.
///
/// `start` is `None` only in all-time mode. When present, `start <= end`
/// (the resolver enforces this).
#[derive(Debug, Clone, PartialEq)]
pub struct SyncWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: DateTime<Utc>,
    pub mode: WindowMode,
}

impl SyncWindow {
    /// Check whether a timestamp falls within the window
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && at < self.end
    }
}
