//! Sync window resolution
//!
//! Pure functions that turn the manual trigger parameters and the persisted
//! checkpoint into a concrete time window. No side effects.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::SyncOptions;
use crate::models::{SyncCheckpoint, SyncWindow, WindowMode};

/// Invalid manual date input
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("end date supplied without a start date")]
    MissingStart,
}

/// Resolve the effective sync window from three mutually exclusive signals.
///
/// Precedence: the all-time flag, then explicit dates, then the checkpoint.
/// With no checkpoint and no manual input, the lower bound falls back to the
/// Unix epoch (fetch everything).
pub fn resolve_window(
    options: &SyncOptions,
    checkpoint: Option<&SyncCheckpoint>,
    now: DateTime<Utc>,
) -> Result<SyncWindow, WindowError> {
    if options.all_time {
        return Ok(SyncWindow {
            start: None,
            end: now,
            mode: WindowMode::AllTime,
        });
    }

    if let Some(start_str) = &options.start_date {
        let start_date = parse_date(start_str)?;
        let end = match &options.end_date {
            Some(end_str) => {
                let end_date = parse_date(end_str)?;
                if start_date > end_date {
                    return Err(WindowError::InvertedRange {
                        start: start_date,
                        end: end_date,
                    });
                }
                // Half-open upper bound covering the whole end day
                let day_after = end_date
                    .succ_opt()
                    .ok_or_else(|| WindowError::InvalidDate(end_str.clone()))?;
                day_of(day_after)
            }
            None => now,
        };
        return Ok(SyncWindow {
            start: Some(day_of(start_date)),
            end,
            mode: WindowMode::Explicit,
        });
    }

    if options.end_date.is_some() {
        return Err(WindowError::MissingStart);
    }

    let start = checkpoint
        .map(|c| c.last_synced_at)
        .unwrap_or(DateTime::UNIX_EPOCH);
    Ok(SyncWindow {
        start: Some(start),
        end: now,
        mode: WindowMode::Incremental,
    })
}

/// Parse a YYYY-MM-DD calendar date
fn parse_date(input: &str) -> Result<NaiveDate, WindowError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| WindowError::InvalidDate(input.to_string()))
}

/// Midnight UTC at the start of the given date
fn day_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
