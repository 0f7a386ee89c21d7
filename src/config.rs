//! Layered application configuration.
//!
//! Settings are merged in increasing priority:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. `config.toml` in the platform config directory (or `--config PATH`)
//! 3. `DUPSWEEP_*` environment variables (e.g. `DUPSWEEP_ACTION=delete`)
//! 4. Command-line flags ([`Config::merge_scan_args`])
//!
//! # Example config.toml
//!
//! ```toml
//! recursive = true
//! mode = "a-vs-b"
//! action = "move"
//! progress_interval = 50
//! quarantine_dir = "_duplicates"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::actions::{Action, QUARANTINE_DIR_NAME};
use crate::cli::{parse_quarantine_name, ScanArgs};
use crate::duplicates::DEFAULT_PROGRESS_INTERVAL;
use crate::runner::{Mode, RunRequest};

/// Prefix of environment variables read into [`Config`].
pub const ENV_PREFIX: &str = "DUPSWEEP_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scan full directory trees
    pub recursive: bool,
    /// Comparison mode used when a second directory is given
    pub mode: Mode,
    /// Resolution action
    pub action: Action,
    /// Emit a progress line every this many files
    pub progress_interval: usize,
    /// Name of the quarantine subdirectory
    pub quarantine_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recursive: true,
            mode: Mode::AVsB,
            action: Action::Move,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            quarantine_dir: QUARANTINE_DIR_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Self::config_path())
    }

    /// Load the configuration with `path` as the file layer.
    ///
    /// A missing file is skipped. A file that cannot be parsed, or values
    /// that fail validation, log a warning and yield the defaults.
    #[must_use]
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        match Self::figment(path.as_deref()).extract::<Config>() {
            Ok(config) => config.normalized(),
            Err(e) => {
                log::warn!("Failed to load configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// The provider chain: defaults, then TOML file, then environment.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            log::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupsweep").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Clamp or reset values that would make a run misbehave.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.progress_interval = self.progress_interval.max(1);
        match parse_quarantine_name(&self.quarantine_dir) {
            Ok(name) => self.quarantine_dir = name,
            Err(e) => {
                log::warn!("{}; using '{}'", e, QUARANTINE_DIR_NAME);
                self.quarantine_dir = QUARANTINE_DIR_NAME.to_string();
            }
        }
        self
    }

    /// Apply command-line overrides from the scan subcommand.
    ///
    /// When no `--mode` is given and only one directory is supplied, the
    /// mode becomes [`Mode::Within`].
    pub fn merge_scan_args(&mut self, args: &ScanArgs) {
        if let Some(recursive) = args.recursive_override() {
            self.recursive = recursive;
        }
        match args.mode {
            Some(mode) => self.mode = mode,
            None if args.dir_b.is_none() => self.mode = Mode::Within,
            None => {}
        }
        if let Some(action) = args.action {
            self.action = action;
        }
        if let Some(interval) = args.progress_interval {
            self.progress_interval = interval.max(1);
        }
        if let Some(ref name) = args.quarantine_dir {
            self.quarantine_dir = name.clone();
        }
    }

    /// Build a run request for the given directories.
    #[must_use]
    pub fn to_request(&self, dir_a: &Path, dir_b: Option<&Path>) -> RunRequest {
        let mut request = RunRequest::new(dir_a)
            .with_mode(self.mode)
            .with_action(self.action)
            .with_recursive(self.recursive)
            .with_quarantine_dir(self.quarantine_dir.clone())
            .with_progress_interval(self.progress_interval);
        if let Some(dir_b) = dir_b {
            request = request.with_dir_b(dir_b);
        }
        request
    }
}
