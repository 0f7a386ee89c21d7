//! Output formatters for finished runs.
//!
//! Human-readable output is the progress stream itself; this module adds
//! the machine-readable JSON report.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::error::ExitCode;
//! use dupsweep::output::JsonReport;
//! use dupsweep::progress::NullSink;
//! use dupsweep::runner::{run, RunRequest};
//!
//! let outcome = run(&RunRequest::new("."), &NullSink).unwrap();
//! let report = JsonReport::new(&outcome, ExitCode::Success);
//! println!("{}", report.to_json_pretty().unwrap());
//! ```

pub mod json;

pub use json::{JsonOutputError, JsonReport};
