//! Progress reporting for detection and resolution runs.
//!
//! The engine reports to the outside world through a single
//! [`ProgressSink`]: a stream of human-readable status lines. Callers pick
//! the sink that matches how they consume it:
//!
//! - [`ConsoleSink`]: terminal output behind an indicatif spinner
//! - [`ChannelSink`]: forwards lines into an `mpsc` channel for a caller
//!   that drains them on another thread
//! - [`CollectingSink`]: keeps every line in memory
//! - [`FnSink`]: wraps a closure
//! - [`NullSink`]: discards everything
//!
//! # Example
//!
//! ```
//! use dupsweep::progress::{CollectingSink, ProgressSink};
//!
//! let sink = CollectingSink::new();
//! sink.emit("Progress: 50/120");
//! assert_eq!(sink.lines(), vec!["Progress: 50/120".to_string()]);
//! ```

use std::sync::mpsc::Sender;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use yansi::Paint;

/// Receiver of human-readable status lines.
pub trait ProgressSink {
    /// Deliver one status line (no trailing newline).
    fn emit(&self, line: &str);
}

impl<S: ProgressSink + ?Sized> ProgressSink for &S {
    fn emit(&self, line: &str) {
        (**self).emit(line);
    }
}

/// Sink that drops every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _line: &str) {}
}

/// Sink backed by a closure.
pub struct FnSink<F: Fn(&str)>(pub F);

impl<F: Fn(&str)> ProgressSink for FnSink<F> {
    fn emit(&self, line: &str) {
        (self.0)(line);
    }
}

/// Sink that records every line, in order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    lines: Mutex<Vec<String>>,
}

impl CollectingSink {
    /// Create an empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the lines received so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Whether any received line starts with `prefix`.
    #[must_use]
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.lines().iter().any(|l| l.starts_with(prefix))
    }
}

impl ProgressSink for CollectingSink {
    fn emit(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

/// Sink that forwards lines into a channel.
///
/// Sending never blocks. Lines emitted after the receiver is dropped are
/// discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<String>,
}

impl ChannelSink {
    /// Wrap the sending half of a channel.
    #[must_use]
    pub fn new(sender: Sender<String>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, line: &str) {
        if self.sender.send(line.to_string()).is_err() {
            log::trace!("Progress receiver gone, dropping line: {}", line);
        }
    }
}

/// Stream a [`ConsoleSink`] prints status lines to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

/// Terminal sink: prints each line while an indicatif spinner runs on stderr.
///
/// Status tags (`[DUP]`, `[ERR]`, `[MOVE]`, `[DEL]`) are coloured unless
/// colour is disabled. In quiet mode only `[ERR]` lines are printed, on
/// stderr. The spinner hides itself when stderr is not a terminal; lines
/// are printed regardless.
pub struct ConsoleSink {
    spinner: Option<ProgressBar>,
    stream: ConsoleStream,
    color: bool,
}

impl ConsoleSink {
    /// Create a console sink printing to stdout.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, only error lines are produced.
    /// * `color` - If true, status tags are coloured.
    #[must_use]
    pub fn new(quiet: bool, color: bool) -> Self {
        Self::with_stream(quiet, color, ConsoleStream::Stdout)
    }

    /// Create a console sink printing to the given stream.
    #[must_use]
    pub fn with_stream(quiet: bool, color: bool, stream: ConsoleStream) -> Self {
        let spinner = if quiet {
            None
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        };
        Self {
            spinner,
            stream,
            color,
        }
    }

    /// Stop the spinner, leaving printed lines in place.
    pub fn finish(&self) {
        if let Some(ref pb) = self.spinner {
            pb.finish_and_clear();
        }
    }

    /// Whether `line` reaches the terminal.
    fn shows(&self, line: &str) -> bool {
        self.spinner.is_some() || line.trim_start().starts_with("[ERR]")
    }

    fn decorate(&self, line: &str) -> String {
        if !self.color {
            return line.to_string();
        }
        let tags: [(&str, fn(&str) -> String); 4] = [
            ("[DUP]", |t| t.yellow().bold().to_string()),
            ("[ERR]", |t| t.red().bold().to_string()),
            ("[MOVE]", |t| t.cyan().to_string()),
            ("[DEL]", |t| t.magenta().to_string()),
        ];
        for (tag, paint) in tags {
            if let Some(rest) = line.strip_prefix(tag) {
                return format!("{}{}", paint(tag), rest);
            }
        }
        line.to_string()
    }
}

impl ProgressSink for ConsoleSink {
    fn emit(&self, line: &str) {
        if !self.shows(line) {
            return;
        }
        let text = self.decorate(line);
        let Some(ref pb) = self.spinner else {
            eprintln!("{}", text);
            return;
        };
        pb.suspend(|| match self.stream {
            ConsoleStream::Stdout => println!("{}", text),
            ConsoleStream::Stderr => eprintln!("{}", text),
        });
        if line.trim_start().starts_with("Progress:") {
            pb.set_message(line.trim().to_string());
        }
    }
}

impl Drop for ConsoleSink {
    fn drop(&mut self) {
        self.finish();
    }
}
