//! Permanent deletion of duplicates.
//!
//! # Overview
//!
//! Removes the `duplicate` side of each pair with `fs::remove_file`. There is
//! no trash and no undo; callers must obtain confirmation first.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::actions::delete::permanent_delete;
//! use std::path::PathBuf;
//!
//! let path = PathBuf::from("/path/to/duplicate.txt");
//! match permanent_delete(&path) {
//!     Ok(result) => println!("Deleted: {}", result.path.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::Path;

use super::{ActionError, BatchResult, ItemOutcome};
use crate::duplicates::DuplicatePair;
use crate::progress::ProgressSink;

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `DeleteFailed` if the delete operation fails
pub fn permanent_delete(path: &Path) -> Result<ItemOutcome, ActionError> {
    // Get file size before deletion
    let metadata = fs::symlink_metadata(path).map_err(|e| ActionError::from_io(path, e))?;
    let size = metadata.len();

    fs::remove_file(path).map_err(|e| {
        log::error!("Permanent delete failed for {}: {}", path.display(), e);
        match e.kind() {
            io::ErrorKind::PermissionDenied => ActionError::PermissionDenied(path.to_path_buf()),
            _ => ActionError::DeleteFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        }
    })?;

    log::debug!("Permanently deleted: {} ({} bytes)", path.display(), size);

    Ok(ItemOutcome {
        path: path.to_path_buf(),
        destination: None,
        size,
    })
}

/// Delete the duplicate of every pair, continuing past failures.
pub fn delete(pairs: &[DuplicatePair], sink: &dyn ProgressSink) -> BatchResult {
    let mut result = BatchResult::default();

    for pair in pairs {
        match permanent_delete(&pair.duplicate) {
            Ok(outcome) => {
                sink.emit(&format!("[DEL] {}", pair.duplicate.display()));
                result.record_success(outcome);
            }
            Err(e) => {
                log::warn!("Could not delete {}: {}", pair.duplicate.display(), e);
                sink.emit(&format!(
                    "[ERR] deleting {}: {}",
                    pair.duplicate.display(),
                    e
                ));
                result.record_failure(&pair.duplicate, &e);
            }
        }
    }

    sink.emit(&format!(
        "Deleted {} duplicate files.",
        result.success_count()
    ));
    log::debug!("Delete batch complete: {}", result.summary());
    result
}
