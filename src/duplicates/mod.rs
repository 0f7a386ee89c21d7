//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - First-wins content indexing ([`DuplicateIndex`])
//! - Within-one-directory detection
//! - Keep-directory against remove-directory detection
//!
//! Detection produces [`DuplicatePair`] values: the kept representative and
//! the file flagged for resolution.

pub mod finder;
pub mod index;

use std::path::PathBuf;

use serde::Serialize;

pub use finder::{
    detect_between, detect_within, validate_root, DuplicateFinder, FinderConfig, FinderError,
    ScanSummary, DEFAULT_PROGRESS_INTERVAL,
};
pub use index::DuplicateIndex;

/// A detected duplicate: `duplicate` has the same content as `original`.
///
/// Only `duplicate` is ever touched by resolution actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicatePair {
    /// Representative that is kept
    pub original: PathBuf,
    /// File flagged for relocation or deletion
    pub duplicate: PathBuf,
}

impl DuplicatePair {
    /// Create a new pair.
    #[must_use]
    pub fn new(original: impl Into<PathBuf>, duplicate: impl Into<PathBuf>) -> Self {
        Self {
            original: original.into(),
            duplicate: duplicate.into(),
        }
    }
}
