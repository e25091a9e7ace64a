//! Readwise API HTTP client
//!
//! Provides paginated access to the Readwise export endpoint.
//! Uses synchronous HTTP (ureq); the whole tool is one blocking pass.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use std::collections::VecDeque;
use std::time::Duration;

use super::api::{ExportResponse, ExportedBook};
use crate::config::ReadwiseCredentials;
use crate::models::SyncWindow;

/// Error indicating the access token was rejected.
///
/// Non-retryable: surfaced immediately and aborts the run.
#[derive(Debug, thiserror::Error)]
#[error("Readwise rejected the access token")]
pub struct AuthError;

/// A request failure that is worth retrying (rate limit, server error,
/// or a transport-level failure).
#[derive(Debug, thiserror::Error)]
pub enum TransientRequestError {
    #[error("Readwise returned status {0}")]
    Status(u16),
    #[error("network error talking to Readwise")]
    Transport(#[from] ureq::Error),
}

/// Readwise API client for fetching highlighted articles
pub struct ReadwiseClient {
    credentials: ReadwiseCredentials,
    base_url: String,
}

impl ReadwiseClient {
    /// Readwise API base URL
    const BASE_URL: &'static str = "https://readwise.io/api/v2";

    /// Maximum attempts per page request before escalating to a fatal error
    const MAX_RETRIES: u32 = 3;

    /// Create a new Readwise client
    pub fn new(credentials: ReadwiseCredentials) -> Self {
        Self::with_base_url(credentials, Self::BASE_URL)
    }

    /// Create a client against a non-default base URL (for tests)
    pub fn with_base_url(credentials: ReadwiseCredentials, base_url: impl Into<String>) -> Self {
        Self {
            credentials,
            base_url: base_url.into(),
        }
    }

    /// Fetch one page of exported items.
    ///
    /// # Arguments
    /// * `updated_after` - Only return items updated after this instant
    /// * `page_cursor` - Continuation cursor from the previous page
    pub fn export_page(
        &self,
        updated_after: Option<DateTime<Utc>>,
        page_cursor: Option<&str>,
    ) -> Result<ExportResponse> {
        let mut url = format!("{}/export/", self.base_url);

        let mut params = Vec::new();
        if let Some(after) = updated_after {
            params.push(format!(
                "updated_after={}",
                urlencoding::encode(&after.to_rfc3339())
            ));
        }
        if let Some(cursor) = page_cursor {
            params.push(format!("pageCursor={}", urlencoding::encode(cursor)));
        }
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }

        let response = ureq::get(&url)
            .header(
                "Authorization",
                &format!("Token {}", self.credentials.token),
            )
            .call();

        match response {
            Ok(mut resp) => {
                let page: ExportResponse = resp
                    .body_mut()
                    .read_json()
                    .context("Failed to parse export response")?;
                Ok(page)
            }
            Err(ureq::Error::StatusCode(code)) if code == 401 || code == 403 => {
                Err(AuthError.into())
            }
            Err(ureq::Error::StatusCode(code)) if code == 429 || code >= 500 => {
                Err(TransientRequestError::Status(code).into())
            }
            Err(ureq::Error::StatusCode(code)) => {
                Err(anyhow::anyhow!("Export request failed with status {}", code))
            }
            Err(e) => Err(TransientRequestError::Transport(e).into()),
        }
    }

    /// Fetch one page with exponential backoff retry.
    ///
    /// Only transient failures are retried; an auth rejection (or any other
    /// non-transient error) is returned immediately.
    fn export_page_with_retry(
        &self,
        updated_after: Option<DateTime<Utc>>,
        page_cursor: Option<&str>,
    ) -> Result<ExportResponse> {
        let mut last_error = None;
        let mut delay = Duration::from_millis(500);

        for attempt in 0..Self::MAX_RETRIES {
            match self.export_page(updated_after, page_cursor) {
                Ok(page) => return Ok(page),
                Err(e) if e.downcast_ref::<TransientRequestError>().is_none() => return Err(e),
                Err(e) => {
                    warn!(
                        "Export request failed (attempt {}/{}): {}",
                        attempt + 1,
                        Self::MAX_RETRIES,
                        e
                    );
                    last_error = Some(e);
                    if attempt < Self::MAX_RETRIES - 1 {
                        // Add jitter to delay
                        let jitter = Duration::from_millis(rand_jitter());
                        std::thread::sleep(delay + jitter);
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_error.unwrap())
    }

    /// Iterate over all exported items whose highlight timestamp falls
    /// within `window`.
    ///
    /// Pages are fetched lazily as the iterator is drained; items are
    /// yielded in the order the remote returns them, but callers must not
    /// rely on that order.
    pub fn export(&self, window: &SyncWindow) -> ExportPager<'_> {
        ExportPager {
            client: self,
            window: window.clone(),
            state: PagerState::HasMore(None),
            buffer: VecDeque::new(),
        }
    }
}

/// Pagination state: either more pages remain (with the cursor for the next
/// request, `None` for the first page) or the terminal marker was reached.
enum PagerState {
    HasMore(Option<String>),
    Exhausted,
}

/// Lazy iterator over exported items for one sync window.
///
/// Advances the page cursor until the response carries no `nextPageCursor`.
/// The first error ends the iteration; the pager does not resume after a
/// failed page.
pub struct ExportPager<'a> {
    client: &'a ReadwiseClient,
    window: SyncWindow,
    state: PagerState,
    buffer: VecDeque<ExportedBook>,
}

impl ExportPager<'_> {
    /// Check whether an item's highlight timestamp falls within the window.
    ///
    /// Items with no timestamp pass through; the server-side updated_after
    /// filter already applies to them and dedup catches any repeats.
    fn in_window(&self, item: &ExportedBook) -> bool {
        item.last_highlight_at
            .is_none_or(|at| self.window.contains(at))
    }
}

impl Iterator for ExportPager<'_> {
    type Item = Result<ExportedBook>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }

            let cursor = match &self.state {
                PagerState::Exhausted => return None,
                PagerState::HasMore(cursor) => cursor.clone(),
            };

            let page = match self
                .client
                .export_page_with_retry(self.window.start, cursor.as_deref())
            {
                Ok(page) => page,
                Err(e) => {
                    self.state = PagerState::Exhausted;
                    return Some(Err(e));
                }
            };

            self.state = match page.next_page_cursor {
                Some(next) => PagerState::HasMore(Some(next)),
                None => PagerState::Exhausted,
            };

            // A page may be empty after window filtering; loop to the next one.
            for item in page.results {
                if self.in_window(&item) {
                    self.buffer.push_back(item);
                }
            }
        }
    }
}

/// Generate a random jitter value (0-100ms)
fn rand_jitter() -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let hasher = RandomState::new().build_hasher();
    hasher.finish() % 100
}
