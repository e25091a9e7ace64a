//! Sync engine for fetching and storing highlighted articles
//!
//! Provides idempotent sync operations that can be safely retried.

mod export;
mod timing;
mod window;

pub use export::{SyncOptions, SyncStats, sync_articles};
pub use timing::synced_today;
pub use window::{WindowError, resolve_window};
