//! Highlights crate - Business logic for Readwise article sync
//!
//! This crate provides the scheduler-independent sync functionality:
//! - Domain models (Article, SyncWindow, SyncCheckpoint)
//! - Readwise export API client with cursor pagination and bounded retry
//! - Storage trait abstractions (in-memory and JSON files)
//! - Idempotent sync engine
//!
//! This crate has no CLI dependencies; the `rwsync` binary wires it to the
//! command line and the scheduler.

pub mod config;
pub mod models;
pub mod readwise;
pub mod storage;
pub mod sync;

pub use config::ReadwiseCredentials;
pub use models::{Article, SyncCheckpoint, SyncWindow, WindowMode};
pub use readwise::{AuthError, ExportPager, ReadwiseClient, TransientRequestError};
pub use sync::{SyncOptions, SyncStats, WindowError, resolve_window, sync_articles, synced_today};
pub use storage::{ArticleStore, InMemoryArticleStore, JsonArticleStore};
