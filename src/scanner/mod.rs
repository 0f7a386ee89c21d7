//! Scanner module for directory enumeration and content fingerprinting.
//!
//! This module provides functionality for:
//! - Listing candidate files under a root, optionally recursive
//! - Content fingerprinting with streaming SHA-256
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: SHA-256 file hashing (streaming, 1 MiB chunks)
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{Hasher, ScanTarget, Walker};
//!
//! let target = ScanTarget::new("/home/user/Downloads", true);
//! let hasher = Hasher::new();
//!
//! for entry in Walker::new(&target).walk() {
//!     match entry {
//!         Ok(path) => match hasher.fingerprint(&path) {
//!             Ok(identity) => println!("{}: {}", path.display(), identity),
//!             Err(e) => eprintln!("Warning: {}", e),
//!         },
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{FileIdentity, Hasher, HASH_CHUNK_SIZE};
pub use walker::Walker;

/// A root directory plus a recursion flag.
///
/// Defines the set of candidate files: every regular file under `root`,
/// either the full subtree or only the immediate children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    /// Root directory to enumerate
    pub root: PathBuf,
    /// Walk the full subtree instead of immediate children only
    pub recursive: bool,
}

impl ScanTarget {
    /// Create a new scan target.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            root: root.into(),
            recursive,
        }
    }

    /// Human-readable state of the recursion flag ("ON" / "OFF").
    #[must_use]
    pub fn recursion_label(&self) -> &'static str {
        if self.recursive {
            "ON"
        } else {
            "OFF"
        }
    }
}

/// Errors that can occur during directory enumeration.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A file was listed but could not be fingerprinted.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ScanError {
    /// Classify an I/O error raised while touching `path`.
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path of the entry that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::Io { path: p, .. } => p,
            Self::Hash(e) => e.path(),
        }
    }
}

/// Errors that can occur during file fingerprinting.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl HashError {
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

    /// Path of the file that could not be fingerprinted.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}
