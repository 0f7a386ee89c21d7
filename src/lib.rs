//! dupsweep - content-based duplicate file remover
//!
//! Finds files with identical content (size plus SHA-256) within one
//! directory tree or between two, and resolves them by moving the
//! duplicates into a `_duplicates` quarantine folder or deleting them.
//!
//! The engine lives in [`scanner`], [`duplicates`] and [`actions`];
//! [`runner`] ties one full run together and reports through a
//! [`progress::ProgressSink`].

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod runner;
pub mod scanner;

use std::io::{self, BufRead, Write};

use anyhow::Context;

use crate::actions::Action;
use crate::cli::{Cli, Commands, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::JsonReport;
use crate::progress::{ConsoleSink, ConsoleStream, ProgressSink};
use crate::runner::RunOutcome;

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error when the run cannot start (invalid directories) or
/// fails as a whole. Per-file and per-item failures are reported through
/// the exit code instead.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let mut config = Config::load_from_path(cli.config.clone().or_else(Config::config_path));
    match cli.command {
        Commands::Scan(ref args) => {
            config.merge_scan_args(args);
            run_scan(&cli, args, &config)
        }
    }
}

fn run_scan(cli: &Cli, args: &ScanArgs, config: &Config) -> anyhow::Result<ExitCode> {
    let request = config.to_request(&args.dir_a, args.dir_b.as_deref());
    runner::validate(&request)?;

    if request.action == Action::Delete && !args.yes && !confirm_delete()? {
        eprintln!("Aborted. No files were changed.");
        return Ok(ExitCode::Aborted);
    }

    let stream = match args.output {
        OutputFormat::Text => ConsoleStream::Stdout,
        OutputFormat::Json => ConsoleStream::Stderr,
    };
    let sink = ConsoleSink::with_stream(cli.quiet, !cli.no_color, stream);

    let outcome = match runner::run(&request, &sink) {
        Ok(outcome) => outcome,
        Err(e) if e.is_path_invalid() => return Err(e.into()),
        Err(e) => {
            sink.emit(&format!("[ERR] Unexpected error: {}", e));
            sink.finish();
            return Err(anyhow::Error::new(e).context("Scan failed"));
        }
    };
    sink.finish();

    let code = exit_code_for(&outcome);
    match args.output {
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", outcome.message());
            }
        }
        OutputFormat::Json => {
            let report = JsonReport::new(&outcome, code);
            report
                .write_to(&mut io::stdout().lock(), true)
                .context("Failed to write JSON report")?;
        }
    }
    Ok(code)
}

/// Exit code for a finished run.
#[must_use]
pub fn exit_code_for(outcome: &RunOutcome) -> ExitCode {
    if outcome.pairs.is_empty() {
        if outcome.summary.has_errors() {
            ExitCode::PartialSuccess
        } else {
            ExitCode::NoDuplicates
        }
    } else if outcome.has_failures() {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    }
}

/// Ask on stderr/stdin before deleting anything.
fn confirm_delete() -> anyhow::Result<bool> {
    let mut stderr = io::stderr();
    write!(
        stderr,
        "This will permanently delete duplicate files.\n\nAre you sure? [y/N] "
    )?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
