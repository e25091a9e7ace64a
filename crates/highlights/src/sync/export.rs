//! Article export sync implementation

use anyhow::Result;
use chrono::Utc;
use log::{debug, info};
use std::collections::HashSet;

use super::timing::synced_today;
use super::window::resolve_window;
use crate::models::{SyncCheckpoint, WindowMode};
use crate::readwise::{ReadwiseClient, normalize_item};
use crate::storage::ArticleStore;

/// Manual trigger parameters for a sync run
#[derive(Debug, Default, Clone)]
pub struct SyncOptions {
    /// Explicit window start (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Explicit window end (YYYY-MM-DD); requires a start date
    pub end_date: Option<String>,
    /// Fetch everything, ignoring dates and checkpoint
    pub all_time: bool,
}

/// Statistics from a sync operation
#[derive(Debug, Default, Clone)]
pub struct SyncStats {
    /// Number of in-window items fetched from Readwise
    pub items_fetched: usize,
    /// Number of items skipped (not an article, or no source URL)
    pub items_skipped: usize,
    /// Number of new articles added to the store
    pub articles_new: usize,
    /// Number of articles skipped as duplicates of stored or in-batch URLs
    pub duplicates_skipped: usize,
    /// Total articles in the store after the merge
    pub total_articles: usize,
    /// Duration of the sync operation
    pub duration_ms: u64,
}

/// Sync highlighted articles from Readwise to the store.
///
/// This operation is idempotent - re-running with an overlapping window will
/// never duplicate or overwrite existing entries. On any failure nothing is
/// written: both the article snapshot and the checkpoint keep their pre-run
/// state.
///
/// # Arguments
/// * `client` - Readwise API client
/// * `store` - Storage backend
/// * `options` - Manual trigger parameters (usually all empty)
pub fn sync_articles(
    client: &ReadwiseClient,
    store: &dyn ArticleStore,
    options: &SyncOptions,
) -> Result<SyncStats> {
    let started = std::time::Instant::now();
    let mut stats = SyncStats::default();

    // 1. Resolve the window from options and checkpoint
    let checkpoint = store.load_checkpoint()?;
    let now = Utc::now();
    let window = resolve_window(options, checkpoint.as_ref(), now)?;
    info!(
        "Resolved {:?} sync window: {} .. {}",
        window.mode,
        window
            .start
            .map_or_else(|| "all time".to_string(), |s| s.to_rfc3339()),
        window.end.to_rfc3339()
    );

    if window.mode == WindowMode::Incremental
        && let Some(checkpoint) = &checkpoint
        && synced_today(checkpoint.last_synced_at, now)
    {
        info!("Already synced today, nothing to fetch");
        stats.total_articles = store.count_articles()?;
        stats.duration_ms = started.elapsed().as_millis() as u64;
        return Ok(stats);
    }

    // 2. Drain the pager; any page failure aborts the run before any write
    let mut items = Vec::new();
    for item in client.export(&window) {
        items.push(item?);
    }
    stats.items_fetched = items.len();
    info!("Fetched {} items from Readwise", stats.items_fetched);

    // 3. Normalize and deduplicate against the store and within the batch
    let existing = store.list_articles()?;
    let mut seen: HashSet<String> = existing.iter().map(|a| a.url.clone()).collect();
    let mut new_articles = Vec::new();

    for item in &items {
        match normalize_item(item) {
            Some(article) => {
                if seen.insert(article.url.clone()) {
                    new_articles.push(article);
                } else {
                    debug!("Skipping duplicate article: {}", article.url);
                    stats.duplicates_skipped += 1;
                }
            }
            None => stats.items_skipped += 1,
        }
    }
    stats.articles_new = new_articles.len();

    // 4. Merge: existing order unchanged, new articles appended in batch order
    let mut merged = existing;
    merged.extend(new_articles.iter().cloned());
    stats.total_articles = merged.len();

    // 5. Persist the snapshot first, the checkpoint last. If the snapshot
    //    write fails the checkpoint stays stale and the next run re-fetches.
    store.replace_articles(&merged)?;
    let checkpoint_at = window.end.min(Utc::now());
    store.save_checkpoint(&SyncCheckpoint::new(checkpoint_at))?;

    stats.duration_ms = started.elapsed().as_millis() as u64;
    info!(
        "Stored {} new articles ({} total) in {}ms",
        stats.articles_new, stats.total_articles, stats.duration_ms
    );
    for article in &new_articles {
        info!("New article: {}", article.title);
    }

    Ok(stats)
}
