//! One complete detection-and-resolution run.
//!
//! A [`RunRequest`] names the two directories, the comparison [`Mode`] and
//! the resolution [`Action`]. [`run`] validates it, detects duplicates,
//! resolves them, and reports a [`RunOutcome`]. All status text goes to the
//! supplied [`ProgressSink`].
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::runner::{run, Mode, RunRequest};
//! use dupsweep::actions::Action;
//! use dupsweep::progress::NullSink;
//!
//! let request = RunRequest::new("/photos/main")
//!     .with_dir_b("/photos/backup")
//!     .with_mode(Mode::AVsB)
//!     .with_action(Action::Move);
//!
//! let outcome = run(&request, &NullSink).unwrap();
//! println!("{}", outcome.message());
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::{self, Action, ActionError, BatchResult, QUARANTINE_DIR_NAME};
use crate::duplicates::{
    validate_root, DuplicateFinder, DuplicatePair, FinderConfig, FinderError, ScanSummary,
    DEFAULT_PROGRESS_INTERVAL,
};
use crate::progress::ProgressSink;
use crate::scanner::ScanTarget;

/// Which directory is compared against which.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Mode {
    /// Duplicates inside directory A only
    #[serde(rename = "within")]
    #[value(name = "within")]
    Within,
    /// Keep A, remove matching files from B
    #[default]
    #[serde(rename = "a-vs-b")]
    #[value(name = "a-vs-b")]
    AVsB,
    /// Keep B, remove matching files from A
    #[serde(rename = "b-vs-a")]
    #[value(name = "b-vs-a")]
    BVsA,
}

impl Mode {
    /// Whether this mode compares two directories.
    #[must_use]
    pub fn is_cross(self) -> bool {
        !matches!(self, Self::Within)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Within => write!(f, "within"),
            Self::AVsB => write!(f, "a-vs-b"),
            Self::BVsA => write!(f, "b-vs-a"),
        }
    }
}

/// Errors that end a run early.
#[derive(Debug, Error)]
pub enum RunError {
    /// A cross-directory mode was requested without directory B.
    #[error("Directory B is required for mode {0}")]
    MissingDirB(Mode),

    /// Detection could not start or failed as a whole.
    #[error(transparent)]
    Finder(#[from] FinderError),

    /// Resolution could not start.
    #[error(transparent)]
    Action(#[from] ActionError),
}

impl RunError {
    /// Whether the run was rejected before touching any file.
    #[must_use]
    pub fn is_path_invalid(&self) -> bool {
        match self {
            Self::MissingDirB(_) => true,
            Self::Finder(e) => e.is_path_invalid(),
            Self::Action(_) => false,
        }
    }
}

/// Everything needed to perform one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Directory A
    pub dir_a: PathBuf,
    /// Directory B, required by the cross-directory modes
    pub dir_b: Option<PathBuf>,
    pub mode: Mode,
    pub action: Action,
    pub recursive: bool,
    /// Name of the quarantine subdirectory used by [`Action::Move`]
    pub quarantine_dir: String,
    pub progress_interval: usize,
}

impl RunRequest {
    /// Request a within-A run with default settings.
    #[must_use]
    pub fn new(dir_a: impl Into<PathBuf>) -> Self {
        Self {
            dir_a: dir_a.into(),
            dir_b: None,
            mode: Mode::Within,
            action: Action::Move,
            recursive: true,
            quarantine_dir: QUARANTINE_DIR_NAME.to_string(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_dir_b(mut self, dir_b: impl Into<PathBuf>) -> Self {
        self.dir_b = Some(dir_b.into());
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    #[must_use]
    pub fn with_quarantine_dir(mut self, name: impl Into<String>) -> Self {
        self.quarantine_dir = name.into();
        self
    }

    /// Set the progress cadence. Zero is treated as one.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Directory B, or an error when the mode needs it and it is missing.
    fn require_dir_b(&self) -> Result<&Path, RunError> {
        self.dir_b
            .as_deref()
            .ok_or(RunError::MissingDirB(self.mode))
    }

    /// Roots in (keep, remove) order for the cross-directory modes.
    fn keep_and_remove(&self) -> Result<(&Path, &Path), RunError> {
        let dir_b = self.require_dir_b()?;
        Ok(match self.mode {
            Mode::BVsA => (dir_b, self.dir_a.as_path()),
            _ => (self.dir_a.as_path(), dir_b),
        })
    }

    /// Directory the duplicates are taken from, which hosts the quarantine.
    #[must_use]
    pub fn relocation_base(&self) -> &Path {
        match (self.mode, self.dir_b.as_deref()) {
            (Mode::AVsB, Some(dir_b)) => dir_b,
            _ => &self.dir_a,
        }
    }

    fn banner(&self) -> Vec<String> {
        let recursion = if self.recursive { "ON" } else { "OFF" };
        let b = self
            .dir_b
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let a = self.dir_a.display();
        let mut lines = match self.mode {
            Mode::Within => vec!["Mode: Within A".to_string(), format!("A: {}", a)],
            Mode::AVsB => vec![
                "Mode: Compare A vs B (remove from B)".to_string(),
                format!("A (keep): {}", a),
                format!("B (remove): {}", b),
            ],
            Mode::BVsA => vec![
                "Mode: Compare B vs A (remove from A)".to_string(),
                format!("B (keep): {}", b),
                format!("A (remove): {}", a),
            ],
        };
        lines.push(format!("Recursive: {}", recursion));
        lines.push(String::new());
        lines
    }
}

/// Check the request before any file is read or changed.
///
/// # Errors
///
/// A path-invalid [`RunError`] when directory A is not an existing
/// directory, or when a cross-directory mode has a missing or invalid
/// directory B or both directories resolve to the same place.
pub fn validate(request: &RunRequest) -> Result<(), RunError> {
    validate_root(&request.dir_a)?;
    if request.mode.is_cross() {
        let dir_b = request.require_dir_b()?;
        validate_root(dir_b)?;
        let canonical_a = fs::canonicalize(&request.dir_a).ok();
        if canonical_a.is_some() && canonical_a == fs::canonicalize(dir_b).ok() {
            return Err(FinderError::SameDirectory(request.dir_a.clone()).into());
        }
    }
    Ok(())
}

/// Result of a finished run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Every duplicate detected, in detection order
    pub pairs: Vec<DuplicatePair>,
    /// Detection statistics and per-file errors
    pub summary: ScanSummary,
    /// Per-item results; `None` when nothing had to be resolved
    pub batch: Option<BatchResult>,
    pub mode: Mode,
    pub action: Action,
    /// Quarantine directory name used for moves
    pub quarantine_dir: String,
}

impl RunOutcome {
    /// Whether any file or item was skipped because of an error.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.summary.has_errors() || self.batch.as_ref().is_some_and(|b| !b.all_succeeded())
    }

    /// Number of duplicates that were actually moved or deleted.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.batch.as_ref().map_or(0, BatchResult::success_count)
    }

    /// Final human-readable result line.
    #[must_use]
    pub fn message(&self) -> String {
        if self.pairs.is_empty() {
            return "No duplicates found.".to_string();
        }
        match self.action {
            Action::Move => format!(
                "Moved {} duplicates to {}.",
                self.resolved_count(),
                self.quarantine_dir
            ),
            Action::Delete => format!("Deleted {} duplicates.", self.resolved_count()),
        }
    }
}

/// Perform one full run: validate, detect, resolve.
///
/// # Errors
///
/// Returns a path-invalid [`RunError`] before anything is touched, or
/// [`RunError::Action`] if the quarantine directory cannot be created.
/// Per-file and per-item failures do not end the run; they are reported on
/// `sink` and collected in the [`RunOutcome`].
pub fn run(request: &RunRequest, sink: &dyn ProgressSink) -> Result<RunOutcome, RunError> {
    validate(request)?;
    for line in request.banner() {
        sink.emit(&line);
    }
    log::info!(
        "Starting {} run (action: {}, recursive: {})",
        request.mode,
        request.action,
        request.recursive
    );

    let finder = DuplicateFinder::new(
        FinderConfig::default().with_progress_interval(request.progress_interval),
    );
    let (pairs, summary) = match request.mode {
        Mode::Within => {
            finder.find_within(&ScanTarget::new(&request.dir_a, request.recursive), sink)?
        }
        Mode::AVsB | Mode::BVsA => {
            let (keep, remove) = request.keep_and_remove()?;
            finder.find_between(
                &ScanTarget::new(keep, request.recursive),
                &ScanTarget::new(remove, request.recursive),
                sink,
            )?
        }
    };

    let batch = if pairs.is_empty() {
        None
    } else {
        Some(match request.action {
            Action::Move => actions::relocate_to(
                &pairs,
                request.relocation_base(),
                &request.quarantine_dir,
                sink,
            )?,
            Action::Delete => actions::delete(&pairs, sink),
        })
    };

    Ok(RunOutcome {
        pairs,
        summary,
        batch,
        mode: request.mode,
        action: request.action,
        quarantine_dir: request.quarantine_dir.clone(),
    })
}
