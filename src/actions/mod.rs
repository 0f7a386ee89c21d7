//! Duplicate resolution actions.
//!
//! This module provides functionality for:
//! - Relocating duplicates into a quarantine directory with collision-free
//!   names ([`relocate`])
//! - Permanent deletion ([`delete`])
//!
//! Both actions only ever touch the `duplicate` side of a
//! [`DuplicatePair`](crate::duplicates::DuplicatePair). A failure on one pair
//! is recorded in the [`BatchResult`] and the batch continues.
//!
//! ```no_run
//! use dupsweep::actions::relocate;
//! use dupsweep::duplicates::DuplicatePair;
//! use dupsweep::progress::NullSink;
//! use std::path::Path;
//!
//! let pairs = vec![DuplicatePair::new("/data/a.txt", "/data/copy.txt")];
//! let result = relocate(&pairs, Path::new("/data"), &NullSink).unwrap();
//! println!("{}", result.summary());
//! ```

pub mod delete;
pub mod relocate;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use delete::{delete, permanent_delete};
pub use relocate::{relocate, relocate_file, relocate_to, unique_destination, QUARANTINE_DIR_NAME};

/// How detected duplicates are resolved.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Move duplicates into the quarantine directory
    #[default]
    Move,
    /// Permanently delete duplicates
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move => write!(f, "move"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Error type for resolution actions.
#[derive(Debug, Error)]
pub enum ActionError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when touching the file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Moving a file into quarantine failed.
    #[error("move failed for {path}: {message}")]
    MoveFailed { path: PathBuf, message: String },

    /// Permanent delete operation failed.
    #[error("delete failed for {path}: {message}")]
    DeleteFailed { path: PathBuf, message: String },

    /// The quarantine directory could not be created. Aborts the batch.
    #[error("cannot create quarantine directory {path}: {source}")]
    QuarantineCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ActionError {
    /// Classify an I/O error raised while inspecting `path`.
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::MoveFailed { path: p, .. }
            | Self::DeleteFailed { path: p, .. }
            | Self::QuarantineCreate { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// One successfully resolved duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemOutcome {
    /// Path the duplicate had before the action.
    pub path: PathBuf,
    /// Where it was moved to; `None` for deletions.
    pub destination: Option<PathBuf>,
    /// Size of the file in bytes.
    pub size: u64,
}

/// Per-item results of a resolution batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    /// Items processed successfully.
    pub successes: Vec<ItemOutcome>,
    /// Failed items with the reason.
    pub failures: Vec<(PathBuf, String)>,
    /// Total bytes moved or freed.
    pub bytes_processed: u64,
}

impl BatchResult {
    /// Number of successfully processed items.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed items.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Total number of attempted items.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Check if every item succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record_success(&mut self, outcome: ItemOutcome) {
        self.bytes_processed += outcome.size;
        self.successes.push(outcome);
    }

    pub(crate) fn record_failure(&mut self, path: &Path, error: &ActionError) {
        self.failures.push((path.to_path_buf(), error.to_string()));
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let size = bytesize::ByteSize::b(self.bytes_processed);
        if self.all_succeeded() {
            format!("Processed {} file(s), {}", self.success_count(), size)
        } else {
            format!(
                "Processed {} file(s), {} failed, {}",
                self.success_count(),
                self.failure_count(),
                size
            )
        }
    }
}
