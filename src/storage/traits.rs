//! Storage traits and error types
//!
//! This module defines the trait interface for resume-store backends and
//! associated error types.

use crate::state::Collection;
use crate::storage::YearIndex;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during resume-store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Stored index {path} is unreadable: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("Failed to serialize index: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for resume-store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Per-(collection, year) persistence of completed year indexes
///
/// A stored index is complete and authoritative: it is either entirely
/// present or absent, never partially written.
pub trait ResumeStore {
    /// Loads the stored index for a year
    ///
    /// A year that was never saved is `Ok(None)`, not an error.
    fn load(&self, collection: &Collection, year: u16) -> StoreResult<Option<YearIndex>>;

    /// Persists a finished year index all-or-nothing
    fn save(&mut self, collection: &Collection, index: &YearIndex) -> StoreResult<()>;

    /// Lists the years that have a stored index, ascending
    fn stored_years(&self, collection: &Collection) -> StoreResult<Vec<u16>>;

    /// Returns true if the year has a stored index
    fn contains(&self, collection: &Collection, year: u16) -> StoreResult<bool> {
        Ok(self.load(collection, year)?.is_some())
    }
}
