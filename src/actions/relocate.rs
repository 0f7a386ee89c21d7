//! Relocation of duplicates into a quarantine directory.
//!
//! # Overview
//!
//! Each duplicate is moved into `<base>/_duplicates/` under its own file
//! name. A name that is already taken gets a counter before the extension
//! (`photo.jpg`, `photo(1).jpg`, `photo(2).jpg`, ...). Existing files in the
//! quarantine directory are never overwritten.
//!
//! Moves use `rename`. When source and quarantine sit on different
//! filesystems the file is copied and the source removed instead.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::actions::relocate::relocate;
//! use dupsweep::duplicates::DuplicatePair;
//! use dupsweep::progress::NullSink;
//! use std::path::Path;
//!
//! let pairs = vec![DuplicatePair::new("/keep/a.txt", "/remove/a.txt")];
//! match relocate(&pairs, Path::new("/remove"), &NullSink) {
//!     Ok(result) => println!("Moved {} files", result.success_count()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{ActionError, BatchResult, ItemOutcome};
use crate::duplicates::DuplicatePair;
use crate::progress::ProgressSink;

/// Default name of the quarantine subdirectory.
pub const QUARANTINE_DIR_NAME: &str = "_duplicates";

/// First free path for `file_name` inside `dir`.
///
/// Returns `dir/file_name` when that is free, otherwise the first of
/// `stem(1).ext`, `stem(2).ext`, ... that does not exist. Names without an
/// extension get the counter appended (`README(1)`), and a leading dot does
/// not count as an extension (`.env(1)`).
#[must_use]
pub fn unique_destination(dir: &Path, file_name: &OsStr) -> PathBuf {
    let initial = dir.join(file_name);
    if !initial.exists() {
        return initial;
    }

    let name = Path::new(file_name);
    let stem = name.file_stem().unwrap_or(file_name);
    let ext = name.extension();

    let mut counter: u64 = 1;
    loop {
        let mut candidate = OsString::from(stem);
        candidate.push(format!("({})", counter));
        if let Some(ext) = ext {
            candidate.push(".");
            candidate.push(ext);
        }
        let path = dir.join(candidate);
        if !path.exists() {
            return path;
        }
        counter += 1;
    }
}

/// Move `source` to `destination`, copying across filesystems if needed.
fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log::debug!(
                "Cross-device move, copying {} -> {}",
                source.display(),
                destination.display()
            );
            copy_then_remove(source, destination)
        }
        Err(e) => Err(e),
    }
}

/// Copy `source` to `destination`, then remove `source`.
///
/// On failure the destination is removed again so exactly one copy remains.
fn copy_then_remove(source: &Path, destination: &Path) -> io::Result<()> {
    if let Err(e) = fs::copy(source, destination) {
        discard_copy(destination);
        return Err(e);
    }
    if let Err(e) = fs::remove_file(source) {
        discard_copy(destination);
        return Err(e);
    }
    Ok(())
}

fn discard_copy(destination: &Path) {
    match fs::remove_file(destination) {
        Ok(()) => log::debug!("Removed incomplete copy {}", destination.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!(
            "Could not remove incomplete copy {}: {}",
            destination.display(),
            e
        ),
    }
}

/// Move one file into `quarantine` under a collision-free name.
///
/// # Errors
///
/// - `NotFound` if the source vanished
/// - `PermissionDenied` if the source cannot be inspected
/// - `MoveFailed` if the source has no file name or the move fails
pub fn relocate_file(source: &Path, quarantine: &Path) -> Result<ItemOutcome, ActionError> {
    let metadata = fs::symlink_metadata(source).map_err(|e| ActionError::from_io(source, e))?;
    let file_name = source.file_name().ok_or_else(|| ActionError::MoveFailed {
        path: source.to_path_buf(),
        message: "path has no file name".to_string(),
    })?;

    let destination = unique_destination(quarantine, file_name);
    move_file(source, &destination).map_err(|e| {
        log::error!(
            "Move failed for {} -> {}: {}",
            source.display(),
            destination.display(),
            e
        );
        match e.kind() {
            io::ErrorKind::NotFound => ActionError::NotFound(source.to_path_buf()),
            io::ErrorKind::PermissionDenied => ActionError::PermissionDenied(source.to_path_buf()),
            _ => ActionError::MoveFailed {
                path: source.to_path_buf(),
                message: e.to_string(),
            },
        }
    })?;

    log::debug!(
        "Moved: {} -> {} ({} bytes)",
        source.display(),
        destination.display(),
        metadata.len()
    );
    Ok(ItemOutcome {
        path: source.to_path_buf(),
        destination: Some(destination),
        size: metadata.len(),
    })
}

/// Relocate every duplicate into `<base_dir>/_duplicates`.
///
/// # Errors
///
/// Returns [`ActionError::QuarantineCreate`] if the quarantine directory
/// cannot be created. Failures of individual moves are recorded in the
/// returned [`BatchResult`] instead.
pub fn relocate(
    pairs: &[DuplicatePair],
    base_dir: &Path,
    sink: &dyn ProgressSink,
) -> Result<BatchResult, ActionError> {
    relocate_to(pairs, base_dir, QUARANTINE_DIR_NAME, sink)
}

/// Relocate every duplicate into `<base_dir>/<quarantine_name>`.
///
/// # Errors
///
/// See [`relocate`].
pub fn relocate_to(
    pairs: &[DuplicatePair],
    base_dir: &Path,
    quarantine_name: &str,
    sink: &dyn ProgressSink,
) -> Result<BatchResult, ActionError> {
    let quarantine = base_dir.join(quarantine_name);
    fs::create_dir_all(&quarantine).map_err(|source| ActionError::QuarantineCreate {
        path: quarantine.clone(),
        source,
    })?;
    log::debug!(
        "Relocating {} duplicates into {}",
        pairs.len(),
        quarantine.display()
    );

    let mut result = BatchResult::default();
    for pair in pairs {
        match relocate_file(&pair.duplicate, &quarantine) {
            Ok(outcome) => {
                if let Some(ref dest) = outcome.destination {
                    sink.emit(&format!(
                        "[MOVE] {} -> {}",
                        pair.duplicate.display(),
                        dest.display()
                    ));
                }
                result.record_success(outcome);
            }
            Err(e) => {
                log::warn!("Could not move {}: {}", pair.duplicate.display(), e);
                sink.emit(&format!(
                    "[ERR] moving {}: {}",
                    pair.duplicate.display(),
                    e
                ));
                result.record_failure(&pair.duplicate, &e);
            }
        }
    }

    sink.emit(&format!(
        "Moved {} duplicate files to: {}",
        result.success_count(),
        quarantine.display()
    ));
    Ok(result)
}
