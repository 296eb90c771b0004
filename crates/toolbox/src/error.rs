//! Storage error types.
//!
//! Raised by [`crate::ToolBox`] persistence; load-time corruption is handled
//! internally (reset to empty) and never surfaces here.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting the tool box.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to write tool box to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize tool box: {0}")]
    Serialize(#[from] serde_json::Error),
}
