//! Duplicate finder implementation for the three comparison modes.
//!
//! # Overview
//!
//! Every mode runs the same pipeline, strictly in sequence:
//! 1. **Enumerate** - list candidate files with the [`Walker`]
//! 2. **Fingerprint** - compute a [`FileIdentity`] per file
//! 3. **Classify** - consult a [`DuplicateIndex`] to mark originals and duplicates
//!
//! Within-one-directory detection keeps a single index over one tree.
//! Cross-directory detection first builds an index from the keep side, then
//! checks each file of the remove side against it. The reverse mode is the
//! same call with the roles swapped.
//!
//! A file that cannot be read is reported, left out of classification, and
//! the scan continues.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::duplicates::{DuplicateFinder, FinderConfig};
//! use dupsweep::progress::NullSink;
//! use dupsweep::scanner::ScanTarget;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let target = ScanTarget::new("/home/user/Photos", true);
//! let (pairs, summary) = finder.find_within(&target, &NullSink).unwrap();
//!
//! for pair in &pairs {
//!     println!("{} duplicates {}", pair.duplicate.display(), pair.original.display());
//! }
//! println!("{} files scanned", summary.total_files);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::{DuplicateIndex, DuplicatePair};
use crate::progress::ProgressSink;
use crate::scanner::{FileIdentity, Hasher, ScanError, ScanTarget, Walker};

/// Number of processed files between two progress lines.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 50;

/// Configuration for duplicate detection.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Emit a progress line every this many processed files.
    pub progress_interval: usize,
    /// Fingerprinter used for every file.
    pub hasher: Hasher,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            hasher: Hasher::new(),
        }
    }
}

impl FinderConfig {
    /// Set the progress cadence. Zero is treated as one.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Use a custom hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }
}

/// Summary statistics from a detection run.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Files enumerated on the scanned side (the only side for within-mode)
    pub total_files: usize,
    /// Files enumerated on the keep side of a cross-directory run
    pub keep_files: usize,
    /// Distinct identities in the keep-side index
    pub indexed_files: usize,
    /// Files that were fingerprinted successfully
    pub hashed_files: usize,
    /// Remove-side files classified unique by size alone
    pub skipped_by_size: usize,
    /// Bytes covered by successfully fingerprinted files
    pub total_size: u64,
    /// Number of duplicate pairs produced
    pub duplicate_files: usize,
    /// Bytes held by the duplicate side of all pairs
    pub reclaimable_space: u64,
    /// Wall time of the whole detection
    pub scan_duration: Duration,
    /// Per-file failures (enumeration or hashing); each file was skipped
    pub errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Whether any file was skipped because of an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Fold the keep-side index summary into this one.
    fn absorb_index(&mut self, index: ScanSummary) {
        self.keep_files = index.total_files;
        self.indexed_files = index.indexed_files;
        self.hashed_files += index.hashed_files;
        self.total_size += index.total_size;
        self.errors.extend(index.errors);
    }
}

/// Errors that abort a detection run.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Keep and remove roots resolve to the same directory.
    #[error("Directories must be different: {0}")]
    SameDirectory(PathBuf),

    /// An I/O error occurred outside per-file processing.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FinderError {
    /// Whether this is a precondition failure on a supplied root.
    ///
    /// These are raised before any file is touched.
    #[must_use]
    pub fn is_path_invalid(&self) -> bool {
        matches!(
            self,
            Self::PathNotFound(_) | Self::NotADirectory(_) | Self::SameDirectory(_)
        )
    }
}

/// Check that `path` exists and is a directory.
///
/// # Errors
///
/// Returns [`FinderError::PathNotFound`] or [`FinderError::NotADirectory`].
pub fn validate_root(path: &Path) -> Result<(), FinderError> {
    if !path.exists() {
        return Err(FinderError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(FinderError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// Reject two roots that resolve to the same directory.
fn ensure_distinct(keep: &Path, remove: &Path) -> Result<(), FinderError> {
    let canonical = |p: &Path| {
        fs::canonicalize(p).map_err(|source| FinderError::Io {
            path: p.to_path_buf(),
            source,
        })
    };
    let keep_canonical = canonical(keep)?;
    if keep_canonical == canonical(remove)? {
        return Err(FinderError::SameDirectory(keep_canonical));
    }
    Ok(())
}

/// Enumerate `target` into a list, reporting unreadable entries on `sink`.
pub(crate) fn collect_candidates(
    target: &ScanTarget,
    sink: &dyn ProgressSink,
    summary: &mut ScanSummary,
) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in Walker::new(target).walk() {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => {
                sink.emit(&format!("[ERR] {}", e));
                summary.errors.push(e);
            }
        }
    }
    summary.total_files = files.len();
    files
}

/// Emit `Progress: current/total` when `current` hits the cadence.
pub(crate) fn report_progress(
    sink: &dyn ProgressSink,
    indent: &str,
    current: usize,
    total: usize,
    interval: usize,
) {
    if current % interval.max(1) == 0 {
        sink.emit(&format!("{}Progress: {}/{}", indent, current, total));
    }
}

/// Announce a duplicate on the sink.
fn report_duplicate(sink: &dyn ProgressSink, pair: &DuplicatePair) {
    log::debug!(
        "Duplicate: {} (same as {})",
        pair.duplicate.display(),
        pair.original.display()
    );
    sink.emit(&format!("[DUP] {}", pair.duplicate.display()));
    sink.emit(&format!("  -> same as {}", pair.original.display()));
}

/// Duplicate finder that drives enumeration, fingerprinting and indexing.
#[derive(Debug, Clone, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find files whose content already appeared earlier in the same tree.
    ///
    /// # Errors
    ///
    /// Returns a path-invalid [`FinderError`] if the root is missing or not
    /// a directory. Per-file failures are recorded in the summary instead.
    pub fn find_within(
        &self,
        target: &ScanTarget,
        sink: &dyn ProgressSink,
    ) -> Result<(Vec<DuplicatePair>, ScanSummary), FinderError> {
        validate_root(&target.root)?;
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();

        let files = collect_candidates(target, sink, &mut summary);
        let total = files.len();
        sink.emit(&format!("Found {} files. Scanning within folder...", total));
        sink.emit(&format!("Recursive scan: {}", target.recursion_label()));
        sink.emit("");
        log::info!(
            "Within-mode scan of {} ({} files)",
            target.root.display(),
            total
        );

        let mut index = DuplicateIndex::new();
        let mut pairs = Vec::new();

        for (i, path) in files.into_iter().enumerate() {
            match self.config.hasher.fingerprint(&path) {
                Ok(identity) => {
                    summary.hashed_files += 1;
                    summary.total_size += identity.size;
                    let size = identity.size;
                    if let Some(existing) = index.observe(identity, path.clone()) {
                        let pair = DuplicatePair::new(existing, path);
                        report_duplicate(sink, &pair);
                        summary.reclaimable_space += size;
                        pairs.push(pair);
                    }
                }
                Err(e) => {
                    log::warn!("Failed to hash {}: {}", path.display(), e);
                    sink.emit(&format!("[ERR] {}", e));
                    summary.errors.push(ScanError::from(e));
                }
            }
            report_progress(sink, "", i + 1, total, self.config.progress_interval);
        }

        summary.indexed_files = index.len();
        summary.duplicate_files = pairs.len();
        summary.scan_duration = start_time.elapsed();
        sink.emit("");
        sink.emit(&format!("Done. Duplicates found: {}", pairs.len()));
        log::info!(
            "Within-mode scan complete: {} duplicates, {} reclaimable, {} errors",
            pairs.len(),
            summary.reclaimable_display(),
            summary.errors.len()
        );

        Ok((pairs, summary))
    }

    /// Find files under `remove` whose content exists under `keep`.
    ///
    /// Every file of `keep` becomes a representative, including files that
    /// duplicate each other. Duplicates that exist only inside `remove` are
    /// not reported.
    ///
    /// # Errors
    ///
    /// Returns a path-invalid [`FinderError`] if either root is missing, not
    /// a directory, or both resolve to the same directory.
    pub fn find_between(
        &self,
        keep: &ScanTarget,
        remove: &ScanTarget,
        sink: &dyn ProgressSink,
    ) -> Result<(Vec<DuplicatePair>, ScanSummary), FinderError> {
        validate_root(&keep.root)?;
        validate_root(&remove.root)?;
        ensure_distinct(&keep.root, &remove.root)?;
        let start_time = Instant::now();

        let (index, index_summary) = DuplicateIndex::build(
            keep,
            &self.config.hasher,
            self.config.progress_interval,
            sink,
        );

        let mut summary = ScanSummary::default();
        let files = collect_candidates(remove, sink, &mut summary);
        summary.absorb_index(index_summary);
        let total = files.len();

        sink.emit(&format!("Scanning {} files in:", total));
        sink.emit(&format!("  {}", remove.root.display()));
        sink.emit("against keep-dir index...");
        sink.emit(&format!("Recursive scan: {}", remove.recursion_label()));
        sink.emit("");
        log::info!(
            "Cross-directory scan: {} files in {} against {} identities from {}",
            total,
            remove.root.display(),
            index.len(),
            keep.root.display()
        );

        let mut pairs = Vec::new();
        for (i, path) in files.into_iter().enumerate() {
            match self.classify_against(&index, &path) {
                Ok(Classified::Duplicate { original, size }) => {
                    let pair = DuplicatePair::new(original, path);
                    report_duplicate(sink, &pair);
                    summary.hashed_files += 1;
                    summary.total_size += size;
                    summary.reclaimable_space += size;
                    pairs.push(pair);
                }
                Ok(Classified::Unique { hashed_size }) => match hashed_size {
                    Some(size) => {
                        summary.hashed_files += 1;
                        summary.total_size += size;
                    }
                    None => summary.skipped_by_size += 1,
                },
                Err(e) => {
                    log::warn!("Failed to classify {}: {}", path.display(), e);
                    sink.emit(&format!("[ERR] {}", e));
                    summary.errors.push(e);
                }
            }
            report_progress(sink, "", i + 1, total, self.config.progress_interval);
        }

        summary.duplicate_files = pairs.len();
        summary.scan_duration = start_time.elapsed();
        sink.emit("");
        sink.emit(&format!("Done. Cross-dir duplicates found: {}", pairs.len()));
        log::info!(
            "Cross-directory scan complete: {} duplicates, {} reclaimable, {} errors",
            pairs.len(),
            summary.reclaimable_display(),
            summary.errors.len()
        );

        Ok((pairs, summary))
    }

    /// Look one remove-side file up in the keep-side index.
    ///
    /// The size is checked first; a size no keep-side file has cannot match,
    /// so the file is not hashed.
    fn classify_against(
        &self,
        index: &DuplicateIndex,
        path: &Path,
    ) -> Result<Classified, ScanError> {
        let size = fs::metadata(path)
            .map_err(|e| ScanError::from_io(path, e))?
            .len();
        if !index.contains_size(size) {
            log::trace!("No keep-side file of {} bytes: {}", size, path.display());
            return Ok(Classified::Unique { hashed_size: None });
        }

        let identity: FileIdentity = self.config.hasher.fingerprint(path)?;
        Ok(match index.lookup(&identity) {
            Some(original) => Classified::Duplicate {
                original: original.to_path_buf(),
                size: identity.size,
            },
            None => Classified::Unique {
                hashed_size: Some(identity.size),
            },
        })
    }
}

/// Outcome of checking one remove-side file.
enum Classified {
    Duplicate { original: PathBuf, size: u64 },
    Unique { hashed_size: Option<u64> },
}

/// Within-one-directory detection with default settings.
///
/// # Errors
///
/// See [`DuplicateFinder::find_within`].
pub fn detect_within(
    root: &Path,
    recursive: bool,
    sink: &dyn ProgressSink,
) -> Result<Vec<DuplicatePair>, FinderError> {
    DuplicateFinder::with_defaults()
        .find_within(&ScanTarget::new(root, recursive), sink)
        .map(|(pairs, _)| pairs)
}

/// Cross-directory detection with default settings.
///
/// Pairs are `(file in keep_root, file in remove_root)`.
///
/// # Errors
///
/// See [`DuplicateFinder::find_between`].
pub fn detect_between(
    keep_root: &Path,
    remove_root: &Path,
    recursive: bool,
    sink: &dyn ProgressSink,
) -> Result<Vec<DuplicatePair>, FinderError> {
    DuplicateFinder::with_defaults()
        .find_between(
            &ScanTarget::new(keep_root, recursive),
            &ScanTarget::new(remove_root, recursive),
            sink,
        )
        .map(|(pairs, _)| pairs)
}
