//! Typed error definitions for image_sorter.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Filesystem operation attempted during a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOp {
    Copy,
    Delete,
    Move,
}

impl fmt::Display for CommitOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CommitOp::Copy => "copy",
            CommitOp::Delete => "delete",
            CommitOp::Move => "move",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum SorterError {
    #[error("Could not find a free name for {path} within {limit} candidates")]
    Resolution { path: PathBuf, limit: usize },

    #[error("Failed to {op} {path}: {source}")]
    Commit {
        op: CommitOp,
        /// Destination for copy/move, source for delete.
        path: PathBuf,
        /// Copies that landed before the failing operation.
        completed_copies: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("Source path not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Scan root is not a readable directory: {0}")]
    ScanRoot(PathBuf),
}

impl SorterError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            SorterError::Resolution { .. } => 10,
            SorterError::Commit { op: CommitOp::Copy, .. } => 20,
            SorterError::Commit { op: CommitOp::Delete, .. } => 21,
            SorterError::Commit { op: CommitOp::Move, .. } => 22,
            SorterError::SourceNotFound(_) => 30,
            SorterError::ScanRoot(_) => 31,
        }
    }

    /// Short machine-friendly label, used as the `kind` log field.
    pub fn kind(&self) -> &'static str {
        match self {
            SorterError::Resolution { .. } => "resolution",
            SorterError::Commit { .. } => "commit",
            SorterError::SourceNotFound(_) => "source_not_found",
            SorterError::ScanRoot(_) => "scan_root",
        }
    }
}

pub type Result<T> = std::result::Result<T, SorterError>;
