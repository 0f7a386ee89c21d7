//! First-wins content index.
//!
//! # Overview
//!
//! [`DuplicateIndex`] maps a [`FileIdentity`] to the first path seen with
//! that content. Later files with the same identity never displace the
//! representative. An index lives for one detection run and is dropped
//! afterwards.
//!
//! # Example
//!
//! ```
//! use dupsweep::duplicates::DuplicateIndex;
//! use dupsweep::scanner::FileIdentity;
//! use std::path::{Path, PathBuf};
//!
//! let mut index = DuplicateIndex::new();
//! let id = FileIdentity::new(1, "2d711642b726b04401627ca9fbac32f5c8530fb1903cc4db02258717921a4881");
//!
//! assert_eq!(index.observe(id.clone(), PathBuf::from("/a/x.txt")), None);
//! assert_eq!(
//!     index.observe(id, PathBuf::from("/a/y.txt")),
//!     Some(Path::new("/a/x.txt"))
//! );
//! ```

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::finder::{collect_candidates, report_progress, ScanSummary};
use crate::progress::ProgressSink;
use crate::scanner::{FileIdentity, Hasher, ScanError, ScanTarget};

/// Mapping from content identity to its representative path.
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    representatives: HashMap<FileIdentity, PathBuf>,
    sizes: HashSet<u64>,
}

impl DuplicateIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` under `identity` unless the identity is already known.
    ///
    /// Returns `None` when `path` became the representative, or the existing
    /// representative's path when the content was seen before.
    pub fn observe(&mut self, identity: FileIdentity, path: PathBuf) -> Option<&Path> {
        self.sizes.insert(identity.size);
        match self.representatives.entry(identity) {
            Entry::Occupied(existing) => Some(existing.into_mut().as_path()),
            Entry::Vacant(slot) => {
                slot.insert(path);
                None
            }
        }
    }

    /// Representative for `identity`, if any.
    #[must_use]
    pub fn lookup(&self, identity: &FileIdentity) -> Option<&Path> {
        self.representatives.get(identity).map(PathBuf::as_path)
    }

    /// Whether any indexed file has exactly `size` bytes.
    #[must_use]
    pub fn contains_size(&self, size: u64) -> bool {
        self.sizes.contains(&size)
    }

    /// Number of distinct identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.representatives.len()
    }

    /// Whether the index holds no identities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.representatives.is_empty()
    }

    /// Build an index from every file of `target`.
    ///
    /// Files that fail to enumerate or hash are reported on `sink` with an
    /// `[ERR]` line, recorded in the returned summary, and left out of the
    /// index. Duplicates inside `target` itself are not reported; the first
    /// one simply stays the representative.
    pub fn build(
        target: &ScanTarget,
        hasher: &Hasher,
        progress_interval: usize,
        sink: &dyn ProgressSink,
    ) -> (Self, ScanSummary) {
        let mut summary = ScanSummary::default();
        let files = collect_candidates(target, sink, &mut summary);
        let total = files.len();

        sink.emit(&format!(
            "Indexing {} files in: {}",
            total,
            target.root.display()
        ));
        sink.emit(&format!("Recursive scan: {}", target.recursion_label()));
        log::info!("Indexing {} files in {}", total, target.root.display());

        let mut index = Self::new();
        for (i, path) in files.into_iter().enumerate() {
            match hasher.fingerprint(&path) {
                Ok(identity) => {
                    summary.hashed_files += 1;
                    summary.total_size += identity.size;
                    index.observe(identity, path);
                }
                Err(e) => {
                    log::warn!("Failed to hash {}: {}", path.display(), e);
                    sink.emit(&format!("[ERR] {}", e));
                    summary.errors.push(ScanError::from(e));
                }
            }
            report_progress(sink, "  ", i + 1, total, progress_interval);
        }

        summary.indexed_files = index.len();
        sink.emit("Index complete.");
        sink.emit("");
        log::debug!(
            "Index for {} holds {} identities",
            target.root.display(),
            index.len()
        );

        (index, summary)
    }
}
