//! Adjustment context stored as JSON.
//!
//! ```json
//! { "pace": {"Boston Celtics": 99.2},
//!   "injuries": {"Boston Celtics": ["Jayson Tatum (out)"]},
//!   "records": {"Boston Celtics": {"wins": 14, "losses": 6}} }
//! ```
//! Each section is optional.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use totals_core::AdjustmentContext;
use totals_signals::ContextProvider;

use crate::error::DataFileError;

/// Parses a context file.
///
/// # Errors
/// Returns error if the file cannot be read or is not valid context JSON.
pub fn load_context(path: impl AsRef<Path>) -> Result<AdjustmentContext, DataFileError> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).map_err(|e| DataFileError::io(path.display().to_string(), e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Writes a context file, pretty-printed.
///
/// # Errors
/// Returns error if serialization or the write fails.
pub fn save_context(path: impl AsRef<Path>, ctx: &AdjustmentContext) -> Result<(), DataFileError> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(ctx)?;
    fs::write(path, text).map_err(|e| DataFileError::io(path.display().to_string(), e))
}

/// Context provider backed by a JSON file, re-read on every fetch.
#[derive(Debug, Clone)]
pub struct FileContextProvider {
    path: PathBuf,
}

impl FileContextProvider {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContextProvider for FileContextProvider {
    fn fetch(&self) -> Result<AdjustmentContext> {
        load_context(&self.path).with_context(|| {
            format!("Failed to load adjustment context from {}", self.path.display())
        })
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;
    use totals_core::TeamRecord;

    #[test]
    fn partial_file_leaves_missing_sections_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.json");
        fs::write(&path, r#"{"pace": {"A": 101.5}}"#).unwrap();

        let ctx = load_context(&path).unwrap();
        assert_eq!(ctx.pace.unwrap()["A"], 101.5);
        assert!(ctx.injuries.is_none());
        assert!(ctx.records.is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.json");
        let ctx = AdjustmentContext::empty()
            .with_injuries(HashMap::from([(
                "A".to_string(),
                vec!["Joel Embiid (out)".to_string()],
            )]))
            .with_records(HashMap::from([("A".to_string(), TeamRecord::new(10, 3))]));

        save_context(&path, &ctx).unwrap();
        assert_eq!(load_context(&path).unwrap(), ctx);
    }

    #[test]
    fn provider_error_names_the_file() {
        let provider = FileContextProvider::new("/nonexistent/ctx.json");
        let err = provider.fetch().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/ctx.json"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_context(&path), Err(DataFileError::Json(_))));
    }
}
