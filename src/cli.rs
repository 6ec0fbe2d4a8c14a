//! Command-line flags. Anything given here wins over config.xml.
//! `--bind` may be repeated; a later binding for the same letter wins.

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::config::xml::parse_binding_key;

/// Review images and copy, move or delete each one.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Review a directory of images and sort them into folders"
)]
pub struct Args {
    /// Directory to review (recursively). Prompted for when omitted and not configured.
    #[arg(value_name = "SOURCE_DIR", value_hint = ValueHint::DirPath)]
    pub source_dir: Option<PathBuf>,

    /// Bind a letter to a folder up front, e.g. `--bind k=/photos/keep`.
    #[arg(long = "bind", short = 'b', value_name = "KEY=DIR")]
    pub bind: Vec<String>,

    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Write logs to this file in addition to stderr.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Print where image_sorter will look for the config file, then exit.
    #[arg(
        long,
        help = "Print the config file location used by image_sorter and exit"
    )]
    pub print_config: bool,

    /// Commits only report what they would do.
    #[arg(
        long,
        help = "Show what a commit would do, but do not modify files"
    )]
    pub dry_run: bool,

    /// Copies keep the source's timestamps and permissions.
    #[arg(long, help = "Preserve timestamps and permissions on copies")]
    pub preserve_metadata: bool,

    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// `--debug` beats `--log-level`; None leaves the config value alone.
    /// An unrecognised `--log-level` value is ignored.
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Parse `--bind KEY=DIR` values into (lowercase letter, folder) pairs.
    pub fn bindings(&self) -> Result<Vec<(char, PathBuf)>> {
        self.bind
            .iter()
            .map(|raw| {
                let (key, dir) = raw
                    .split_once('=')
                    .with_context(|| format!("--bind expects KEY=DIR, got '{raw}'"))?;
                let key = parse_binding_key(key)?;
                let dir = dir.trim();
                if dir.is_empty() {
                    anyhow::bail!("--bind {key}= needs a directory");
                }
                Ok((key, PathBuf::from(dir)))
            })
            .collect()
    }

    /// Overlay the flags that were given onto `cfg`.
    pub fn apply_overrides(&self, cfg: &mut Config) -> Result<()> {
        if let Some(dir) = &self.source_dir {
            cfg.source_dir = Some(dir.clone());
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.preserve_metadata {
            cfg.preserve_metadata = true;
        }
        for (key, dir) in self.bindings()? {
            cfg.destinations.insert(key, dir);
        }
        Ok(())
    }
}

pub fn parse() -> Args {
    Args::parse()
}
