//! Sync timing utilities
//!
//! Pure functions, testable without a store or network.

use chrono::{DateTime, Utc};

/// Check whether the checkpoint already covers today.
///
/// The tool runs on a daily schedule; an incremental run whose checkpoint is
/// from the same calendar day (UTC) has nothing new to fetch and skips the
/// network entirely.
pub fn synced_today(last_synced_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    last_synced_at.date_naive() == now.date_naive()
}
