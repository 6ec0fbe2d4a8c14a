//! Settings for one sorting run, plus the user-facing verbosity scale.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::entry::CommitOptions;
use crate::keys::Destinations;
use crate::resolve::{DEFAULT_RESOLVE_LIMIT, PathResolver};
use crate::scan::default_extensions;

/// Verbosity as written in config.xml and on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// errors
    Quiet,
    /// warnings and errors
    #[default]
    Normal,
    /// every mark and commit
    Info,
    /// resolver candidates too
    Debug,
}

impl LogLevel {
    /// Case-insensitive; accepts a few aliases ("verbose", "trace", ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration for a sorting session.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory to review; prompted for when unset
    pub source_dir: Option<PathBuf>,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// If true, report actions but do not modify the filesystem
    pub dry_run: bool,
    /// If true, copies keep the source's timestamps and permissions
    pub preserve_metadata: bool,
    /// Maximum candidates tried when resolving a name collision
    pub resolve_limit: usize,
    /// Image extensions (without the dot), matched case-sensitively
    pub extensions: Vec<String>,
    /// Letters bound before the session starts (lowercase keys)
    pub destinations: BTreeMap<char, PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: None,
            log_level: LogLevel::Normal,
            log_file: None,
            dry_run: false,
            preserve_metadata: false,
            resolve_limit: DEFAULT_RESOLVE_LIMIT,
            extensions: default_extensions(),
            destinations: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Resolver honoring the configured collision limit.
    pub fn resolver(&self) -> PathResolver {
        PathResolver::new(self.resolve_limit)
    }

    pub fn commit_options(&self) -> CommitOptions {
        CommitOptions {
            dry_run: self.dry_run,
            preserve_metadata: self.preserve_metadata,
        }
    }

    /// Seed a session registry from the pre-bound letters.
    pub fn initial_destinations(&self) -> Destinations {
        self.destinations
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect()
    }
}
