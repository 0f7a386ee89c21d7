//! Structured error handling and exit codes.

use serde::Serialize;

use crate::duplicates::FinderError;
use crate::runner::RunError;

/// Exit codes for the dupsweep application.
///
/// - 0: Success (duplicates found and resolved)
/// - 1: General error (unexpected failure)
/// - 2: No duplicates found
/// - 3: Partial success (some files or items failed and were skipped)
/// - 4: Invalid path (a root is missing, not a directory, or both are the same)
/// - 5: Aborted (deletion was not confirmed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: duplicates were found and resolved.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// No duplicates: scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Partial success: completed but some files or items failed.
    PartialSuccess = 3,
    /// Invalid path: a precondition on the supplied roots failed.
    InvalidPath = 4,
    /// Aborted: the user declined a destructive action.
    Aborted = 5,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::NoDuplicates => "DS002",
            Self::PartialSuccess => "DS003",
            Self::InvalidPath => "DS004",
            Self::Aborted => "DS005",
        }
    }

    /// Pick the exit code for an error that ended the run.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        let path_invalid = err
            .downcast_ref::<RunError>()
            .map(RunError::is_path_invalid)
            .or_else(|| err.downcast_ref::<FinderError>().map(FinderError::is_path_invalid))
            .unwrap_or(false);
        if path_invalid {
            return Self::InvalidPath;
        }
        Self::GeneralError
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
        }
    }
}
