//! Storage trait definitions

use crate::models::{Article, SyncCheckpoint};
use anyhow::Result;

/// Trait for article store operations
///
/// Abstracts over the persisted article snapshot and the sync checkpoint so
/// the sync engine can run against in-memory storage in tests and JSON files
/// in production.
pub trait ArticleStore: Send + Sync {
    /// List all stored articles in insertion order
    fn list_articles(&self) -> Result<Vec<Article>>;

    /// Replace the entire article snapshot
    fn replace_articles(&self, articles: &[Article]) -> Result<()>;

    /// Check if an article with the given URL is stored
    fn has_article(&self, url: &str) -> Result<bool>;

    /// Count stored articles
    fn count_articles(&self) -> Result<usize>;

    /// Load the sync checkpoint, if one exists
    fn load_checkpoint(&self) -> Result<Option<SyncCheckpoint>>;

    /// Overwrite the sync checkpoint
    fn save_checkpoint(&self, checkpoint: &SyncCheckpoint) -> Result<()>;

    /// Clear all data (for testing)
    fn clear(&self) -> Result<()>;
}
