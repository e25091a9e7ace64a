//! JSON file storage implementation
//!
//! Persists the article snapshot as `articles.json` and the sync checkpoint
//! as `last_update.json` under an output directory. Each file is written
//! atomically (write temp, rename); the pair is protected by ordering only:
//! the sync engine writes articles first and the checkpoint last.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::ArticleStore;
use crate::models::{Article, SyncCheckpoint};

/// Article snapshot filename
const ARTICLES_FILE: &str = "articles.json";
/// Sync checkpoint filename
const CHECKPOINT_FILE: &str = "last_update.json";

/// [`ArticleStore`] backed by JSON files in an output directory
pub struct JsonArticleStore {
    articles_path: PathBuf,
    checkpoint_path: PathBuf,
}

impl JsonArticleStore {
    /// Create a store rooted at the given output directory.
    ///
    /// Creates the directory if it does not exist. Missing files are not an
    /// error; they read as an empty store (first run).
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref();
        config::ensure_dir(output_dir)?;

        Ok(Self {
            articles_path: output_dir.join(ARTICLES_FILE),
            checkpoint_path: output_dir.join(CHECKPOINT_FILE),
        })
    }

    /// Path of the article snapshot file
    pub fn articles_path(&self) -> &Path {
        &self.articles_path
    }

    /// Path of the checkpoint file
    pub fn checkpoint_path(&self) -> &Path {
        &self.checkpoint_path
    }
}

impl ArticleStore for JsonArticleStore {
    fn list_articles(&self) -> Result<Vec<Article>> {
        if !self.articles_path.exists() {
            return Ok(Vec::new());
        }
        config::load_json_file(&self.articles_path)
            .with_context(|| format!("Failed to load article store: {}", self.articles_path.display()))
    }

    fn replace_articles(&self, articles: &[Article]) -> Result<()> {
        config::save_json_file(&self.articles_path, &articles)
            .with_context(|| format!("Failed to write article store: {}", self.articles_path.display()))
    }

    fn has_article(&self, url: &str) -> Result<bool> {
        Ok(self.list_articles()?.iter().any(|a| a.url == url))
    }

    fn count_articles(&self) -> Result<usize> {
        Ok(self.list_articles()?.len())
    }

    fn load_checkpoint(&self) -> Result<Option<SyncCheckpoint>> {
        if !self.checkpoint_path.exists() {
            return Ok(None);
        }
        let checkpoint = config::load_json_file(&self.checkpoint_path).with_context(|| {
            format!("Failed to load sync checkpoint: {}", self.checkpoint_path.display())
        })?;
        Ok(Some(checkpoint))
    }

    fn save_checkpoint(&self, checkpoint: &SyncCheckpoint) -> Result<()> {
        config::save_json_file(&self.checkpoint_path, checkpoint).with_context(|| {
            format!("Failed to write sync checkpoint: {}", self.checkpoint_path.display())
        })
    }

    fn clear(&self) -> Result<()> {
        for path in [&self.articles_path, &self.checkpoint_path] {
            if path.exists() {
                std::fs::remove_file(path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }
        }
        Ok(())
    }
}
