//! Article model representing a highlighted article

use serde::{Deserialize, Serialize};

/// A highlighted article exported from Readwise.
///
/// The URL is the article's identity: two records with the same URL are the
/// same article regardless of title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Source URL of the article
    pub url: String,
    /// Cleaned article title
    pub title: String,
}

impl Article {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}
