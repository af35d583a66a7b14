//! Lectern Index Library
//!
//! Loads a markdown content tree into memory and serves it as the single
//! source of truth for every query.
//!
//! # Modules
//!
//! - [`loader`] - Directory walk and per-file parsing with partial-failure tolerance
//! - [`store`] - Lazily built, explicitly invalidated index store

pub mod loader;
pub mod store;

use std::{path::PathBuf, time::Duration};

pub use loader::{DocumentLoader, DocumentSource, LoadReport, SkippedFile};
pub use store::{Index, IndexStats, IndexStore};
use thiserror::Error;

/// Index errors.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The content root cannot be read; fatal for the whole build.
    #[error("content source unavailable at {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cold build did not finish in time.
    #[error("index build timed out after {}s", timeout.as_secs_f64())]
    BuildTimeout { timeout: Duration },

    /// The build task panicked or was cancelled.
    #[error("index build task failed: {0}")]
    BuildTask(String),
}

impl IndexError {
    /// Create a new source unavailable error.
    pub fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
