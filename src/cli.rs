//! Command-line interface definitions for dupsweep.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options (verbosity, color, error format) apply to every subcommand.
//!
//! # Example
//!
//! ```bash
//! # Move duplicates inside one directory into ~/Downloads/_duplicates
//! dupsweep scan ~/Downloads --mode within
//!
//! # Keep ~/Photos, remove copies found in the backup drive
//! dupsweep scan ~/Photos /mnt/backup/Photos --mode a-vs-b --action delete --yes
//!
//! # Only immediate children, JSON report for scripting
//! dupsweep scan ~/Photos /mnt/backup/Photos --no-recursive --output json
//!
//! # Verbose mode for debugging
//! dupsweep -v scan ~/Downloads --mode within
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Component, Path, PathBuf};

use crate::actions::Action;
use crate::runner::Mode;

/// Content-based duplicate file remover.
///
/// dupsweep finds files with identical content (size plus SHA-256), either
/// within one directory or between two, and moves the duplicates into a
/// quarantine folder or deletes them.
#[derive(Debug, Parser)]
#[command(name = "dupsweep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON objects on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for dupsweep.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find duplicates and move or delete them
    Scan(ScanArgs),
}

/// Arguments for the scan subcommand.
///
/// Options left unset fall back to the configuration file and
/// `DUPSWEEP_*` environment variables.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory A (the only directory in within mode)
    #[arg(value_name = "DIR_A")]
    pub dir_a: PathBuf,

    /// Directory B, required by a-vs-b and b-vs-a
    #[arg(value_name = "DIR_B")]
    pub dir_b: Option<PathBuf>,

    /// Comparison mode
    ///
    /// Defaults to within when DIR_B is not given.
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// What to do with duplicates
    #[arg(short, long, value_enum)]
    pub action: Option<Action>,

    /// Only scan the immediate children of each directory
    #[arg(long, conflicts_with = "recursive")]
    pub no_recursive: bool,

    /// Scan full directory trees (default)
    #[arg(long)]
    pub recursive: bool,

    /// Name of the quarantine subdirectory used by --action move
    #[arg(long, value_name = "NAME", value_parser = parse_quarantine_name)]
    pub quarantine_dir: Option<String>,

    /// Emit a progress line every N files
    #[arg(long, value_name = "N")]
    pub progress_interval: Option<usize>,

    /// Skip the confirmation prompt for --action delete
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Output format (text streams progress, json prints a report at the end)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

impl ScanArgs {
    /// Recursion override from the command line, if any.
    #[must_use]
    pub fn recursive_override(&self) -> Option<bool> {
        if self.no_recursive {
            Some(false)
        } else if self.recursive {
            Some(true)
        } else {
            None
        }
    }
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Progress lines and a final result message
    Text,
    /// JSON report for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Validate a quarantine directory name.
///
/// The name must be a single plain path component: not empty, no
/// separators, and not `.` or `..`.
///
/// # Examples
///
/// ```
/// use dupsweep::cli::parse_quarantine_name;
///
/// assert_eq!(parse_quarantine_name("_duplicates").unwrap(), "_duplicates");
/// assert!(parse_quarantine_name("../elsewhere").is_err());
/// assert!(parse_quarantine_name("").is_err());
/// ```
pub fn parse_quarantine_name(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("Quarantine directory name cannot be empty".to_string());
    }
    let mut components = Path::new(trimmed).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(trimmed.to_string()),
        _ => Err(format!(
            "Invalid quarantine directory name '{}': must be a single directory name",
            trimmed
        )),
    }
}
