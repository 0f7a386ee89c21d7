//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, which lists every regular
//! file under a [`ScanTarget`]. Traversal is single-threaded and lazy: the
//! caller pulls paths one at a time and owns any counting or progress
//! reporting.
//!
//! # Behavior
//!
//! - Recursive targets walk the full subtree; non-recursive targets list
//!   immediate children only.
//! - Directory symlinks are not followed, so symlink cycles cannot occur.
//! - A symlink whose target is a regular file is yielded; dangling links,
//!   directories, sockets, FIFOs and devices are skipped silently.
//! - Inside each directory, files come before subdirectories and each group
//!   is sorted by name. A top-level file is therefore always seen before a
//!   nested copy, including copies under a quarantine folder. "First
//!   occurrence" remains a property of traversal order, not of content.
//! - A symlink to a file is an ordinary candidate. When it sorts before its
//!   target it becomes the kept representative and the real file is the
//!   duplicate, so resolving that pair leaves a dangling link.
//! - Unreadable entries are yielded as [`ScanError`] values rather than
//!   stopping iteration.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{ScanTarget, Walker};
//!
//! let target = ScanTarget::new("/home/user/Downloads", false);
//! let files: Vec<_> = Walker::new(&target).walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{ScanError, ScanTarget};

/// Lazy enumerator of candidate files under one root.
///
/// Symlinks to regular files are yielded in name order like any other file
/// and are not resolved to their targets. A link named before its target
/// wins detection over the target itself.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk (made absolute when possible)
    root: PathBuf,
    /// Walk the full subtree
    recursive: bool,
}

impl Walker {
    /// Create a new walker for the given target.
    #[must_use]
    pub fn new(target: &ScanTarget) -> Self {
        let root = std::path::absolute(&target.root).unwrap_or_else(|_| target.root.clone());
        Self {
            root,
            recursive: target.recursive,
        }
    }

    /// Root directory this walker enumerates.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the target, yielding file paths in traversal order.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    let path = entry.into_path();

                    if file_type.is_file() {
                        return Some(Ok(path));
                    }

                    if file_type.is_symlink() {
                        return match fs::metadata(&path) {
                            Ok(metadata) if metadata.is_file() => Some(Ok(path)),
                            Ok(_) => {
                                log::trace!("Skipping non-file symlink: {}", path.display());
                                None
                            }
                            Err(e) => {
                                log::trace!("Skipping dangling symlink {}: {}", path.display(), e);
                                None
                            }
                        };
                    }

                    if !file_type.is_dir() {
                        log::trace!("Skipping special file: {}", path.display());
                    }
                    None
                }
                Err(e) => Some(Err(self.handle_walk_error(e))),
            })
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        let message = error.to_string();

        let scan_error = match error.into_io_error() {
            Some(io_error) => ScanError::from_io(&path, io_error),
            None => ScanError::Io {
                path,
                source: io::Error::other(message),
            },
        };
        log::warn!("Walker error: {}", scan_error);
        scan_error
    }
}
