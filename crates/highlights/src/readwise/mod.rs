//! Readwise API integration
//!
//! This module provides:
//! - Readwise export API client with cursor pagination
//! - Response normalization to domain models

mod client;
mod normalize;

pub use client::{AuthError, ExportPager, ReadwiseClient, TransientRequestError};
pub use normalize::{clean_title, normalize_item};

/// Readwise export API response types
pub mod api {
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    /// Response from the paginated `/export/` endpoint
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExportResponse {
        pub count: Option<u64>,
        pub next_page_cursor: Option<String>,
        #[serde(default)]
        pub results: Vec<ExportedBook>,
    }

    /// A single exported item (book, article, tweet...) with its metadata.
    ///
    /// Every field the remote may omit is optional; missing fields are
    /// handled downstream as skip-not-crash.
    #[derive(Debug, Clone, Deserialize)]
    pub struct ExportedBook {
        pub user_book_id: Option<i64>,
        pub title: Option<String>,
        pub source_url: Option<String>,
        pub category: Option<String>,
        pub last_highlight_at: Option<DateTime<Utc>>,
    }
}
