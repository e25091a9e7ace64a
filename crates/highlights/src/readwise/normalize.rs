//! Readwise API response normalization
//!
//! Converts raw export items to domain models.

use log::debug;

use super::api::ExportedBook;
use crate::models::Article;

/// Only items in this Readwise category become articles
const ARTICLE_CATEGORY: &str = "articles";

/// Fallback title for items the remote returns without one
const UNTITLED: &str = "Untitled";

/// Normalize a raw export item to an [`Article`].
///
/// Returns `None` for items that are not articles or that carry no source
/// URL; both cases are logged and skipped, never an error.
pub fn normalize_item(item: &ExportedBook) -> Option<Article> {
    let is_article = item
        .category
        .as_deref()
        .is_some_and(|c| c.eq_ignore_ascii_case(ARTICLE_CATEGORY));
    if !is_article {
        debug!(
            "Skipping item {:?}: category {:?} is not an article",
            item.user_book_id, item.category
        );
        return None;
    }

    let url = item
        .source_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());
    let Some(url) = url else {
        debug!("Skipping article {:?}: no source URL", item.user_book_id);
        return None;
    };

    let title = clean_title(item.title.as_deref().unwrap_or(UNTITLED));
    Some(Article::new(url, title))
}

/// Clean a title by collapsing newlines and runs of whitespace into single
/// spaces and trimming the ends.
pub fn clean_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}
