//! In-memory storage implementation
//!
//! Used for testing the sync engine without touching the filesystem.

use anyhow::Result;
use std::sync::RwLock;

use super::ArticleStore;
use crate::models::{Article, SyncCheckpoint};

/// In-memory implementation of [`ArticleStore`]
pub struct InMemoryArticleStore {
    articles: RwLock<Vec<Article>>,
    checkpoint: RwLock<Option<SyncCheckpoint>>,
}

impl InMemoryArticleStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            articles: RwLock::new(Vec::new()),
            checkpoint: RwLock::new(None),
        }
    }
}

impl Default for InMemoryArticleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleStore for InMemoryArticleStore {
    fn list_articles(&self) -> Result<Vec<Article>> {
        let articles = self.articles.read().unwrap();
        Ok(articles.clone())
    }

    fn replace_articles(&self, articles: &[Article]) -> Result<()> {
        let mut stored = self.articles.write().unwrap();
        *stored = articles.to_vec();
        Ok(())
    }

    fn has_article(&self, url: &str) -> Result<bool> {
        let articles = self.articles.read().unwrap();
        Ok(articles.iter().any(|a| a.url == url))
    }

    fn count_articles(&self) -> Result<usize> {
        let articles = self.articles.read().unwrap();
        Ok(articles.len())
    }

    fn load_checkpoint(&self) -> Result<Option<SyncCheckpoint>> {
        let checkpoint = self.checkpoint.read().unwrap();
        Ok(checkpoint.clone())
    }

    fn save_checkpoint(&self, checkpoint: &SyncCheckpoint) -> Result<()> {
        let mut stored = self.checkpoint.write().unwrap();
        *stored = Some(checkpoint.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.articles.write().unwrap().clear();
        *self.checkpoint.write().unwrap() = None;
        Ok(())
    }
}
