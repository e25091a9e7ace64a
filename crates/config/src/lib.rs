//! Configuration and file helpers for the Readwise sync tool
//!
//! Provides output-directory resolution and JSON file load/save utilities
//! shared by the library and the CLI.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Default output directory when neither --output-dir nor OUTPUT_DIR is set
const DEFAULT_OUTPUT_DIR: &str = "readwise_exports";

/// Resolve the output directory for exported files.
///
/// Uses the OUTPUT_DIR environment variable if set, otherwise
/// `readwise_exports` relative to the working directory.
pub fn output_dir() -> PathBuf {
    std::env::var_os("OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
}

/// Ensure a directory exists, creating it (and parents) if needed
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    Ok(())
}

/// Load and parse a JSON file
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file: {}", path.display()))
}

/// Save a value as pretty-printed JSON, atomically.
///
/// Writes to a temporary file next to the destination and renames it into
/// place, so the destination is never left in a partial state.
pub fn save_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    let tmp_path = path.with_extension("json.tmp");

    std::fs::write(&tmp_path, content)
        .with_context(|| format!("Failed to write temporary file: {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to replace file: {}", path.display()))?;
    Ok(())
}
