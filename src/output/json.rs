//! JSON report of a finished run.
//!
//! Provides machine-readable output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "generated_at": "2024-05-01T12:00:00Z",
//!   "mode": "a-vs-b",
//!   "action": "move",
//!   "message": "Moved 1 duplicates to _duplicates.",
//!   "duplicates": [
//!     { "original": "/keep/k.txt", "duplicate": "/remove/d1.txt" }
//!   ],
//!   "summary": {
//!     "total_files": 2,
//!     "keep_files": 1,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 1,
//!     "scan_duration_ms": 3,
//!     "exit_code": 0,
//!     "exit_code_name": "DS000"
//!   },
//!   "resolution": {
//!     "succeeded": 1,
//!     "failed": 0,
//!     "bytes_processed": 1,
//!     "items": [ { "path": "/remove/d1.txt", "destination": "/remove/_duplicates/d1.txt", "size": 1 } ],
//!     "failures": []
//!   },
//!   "scan_errors": []
//! }
//! ```

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::actions::{Action, BatchResult, ItemOutcome};
use crate::duplicates::{DuplicatePair, ScanSummary};
use crate::error::ExitCode;
use crate::runner::{Mode, RunOutcome};

/// A single duplicate pair in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonPair {
    /// Kept representative
    pub original: String,
    /// File flagged for resolution
    pub duplicate: String,
}

impl From<&DuplicatePair> for JsonPair {
    fn from(pair: &DuplicatePair) -> Self {
        Self {
            original: path_string(&pair.original),
            duplicate: path_string(&pair.duplicate),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Files enumerated on the scanned side
    pub total_files: usize,
    /// Files enumerated on the keep side (cross-directory modes)
    pub keep_files: usize,
    /// Distinct identities indexed
    pub indexed_files: usize,
    /// Files fingerprinted
    pub hashed_files: usize,
    /// Files ruled out by size alone
    pub skipped_by_size: usize,
    /// Bytes covered by fingerprinted files
    pub total_size: u64,
    /// Number of duplicate pairs
    pub duplicate_files: usize,
    /// Bytes held by the duplicates
    pub reclaimable_space: u64,
    /// Duration of detection in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DS000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            total_files: summary.total_files,
            keep_files: summary.keep_files,
            indexed_files: summary.indexed_files,
            hashed_files: summary.hashed_files,
            skipped_by_size: summary.skipped_by_size,
            total_size: summary.total_size,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// A path that failed, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFailure {
    pub path: String,
    pub error: String,
}

/// Per-item results of the resolution step.
#[derive(Debug, Clone, Serialize)]
pub struct JsonResolution {
    pub succeeded: usize,
    pub failed: usize,
    pub bytes_processed: u64,
    pub items: Vec<ItemOutcome>,
    pub failures: Vec<JsonFailure>,
}

impl From<&BatchResult> for JsonResolution {
    fn from(batch: &BatchResult) -> Self {
        Self {
            succeeded: batch.success_count(),
            failed: batch.failure_count(),
            bytes_processed: batch.bytes_processed,
            items: batch.successes.clone(),
            failures: batch
                .failures
                .iter()
                .map(|(path, error)| JsonFailure {
                    path: path_string(path),
                    error: error.clone(),
                })
                .collect(),
        }
    }
}

/// Complete JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    pub mode: Mode,
    pub action: Action,
    /// Final human-readable result line
    pub message: String,
    pub duplicates: Vec<JsonPair>,
    pub summary: JsonSummary,
    /// Absent when nothing had to be resolved
    pub resolution: Option<JsonResolution>,
    /// Files skipped during detection
    pub scan_errors: Vec<JsonFailure>,
}

impl JsonReport {
    /// Build a report from a finished run.
    #[must_use]
    pub fn new(outcome: &RunOutcome, exit_code: ExitCode) -> Self {
        Self {
            generated_at: Utc::now(),
            mode: outcome.mode,
            action: outcome.action,
            message: outcome.message(),
            duplicates: outcome.pairs.iter().map(JsonPair::from).collect(),
            summary: JsonSummary::from_scan_summary(&outcome.summary, exit_code),
            resolution: outcome.batch.as_ref().map(JsonResolution::from),
            scan_errors: outcome
                .summary
                .errors
                .iter()
                .map(|e| JsonFailure {
                    path: path_string(e.path()),
                    error: e.to_string(),
                })
                .collect(),
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            serde_json::to_string(self)?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
