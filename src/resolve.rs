//! Destination collision resolution.
//!
//! Policy:
//! - A desired path naming an existing directory becomes `<dir>/<source file name>`.
//! - While the candidate exists on disk, derive the next one:
//!   - `<stem>(<N>)<ext>` becomes `<stem>(<N+1>)<ext>`
//!   - anything else becomes `<stem> (1)<ext>`
//! - The search is capped; past the cap resolution fails instead of spinning.
//!
//! Notes:
//! - Existence is checked when a target is marked, not when it is committed.
//!   Two entries can therefore resolve to the same free name before either commits;
//!   the commit refuses to clobber in that case and reports the failure.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::{Result, SorterError};

/// Default maximum number of candidates tried before giving up.
pub const DEFAULT_RESOLVE_LIMIT: usize = 10_000;

/// Outcome of resolving a desired destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Nothing exists at this path and it is not already pending.
    Free(PathBuf),
    /// The collision-free path is already one of the caller's pending targets.
    Pending(PathBuf),
}

impl Resolved {
    pub fn path(&self) -> &Path {
        match self {
            Resolved::Free(p) | Resolved::Pending(p) => p,
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            Resolved::Free(p) | Resolved::Pending(p) => p,
        }
    }
}

/// Turns desired destinations into paths that do not collide with files on disk.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver {
    limit: usize,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLVE_LIMIT)
    }
}

impl PathResolver {
    pub fn new(limit: usize) -> Self {
        Self { limit: limit.max(1) }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Resolve `desired` for the file at `source`.
    ///
    /// `pending` holds targets the caller has already claimed (copy targets of the
    /// same entry); a result equal to one of them is reported as `Resolved::Pending`.
    pub fn resolve(&self, desired: &Path, source: &Path, pending: &[PathBuf]) -> Result<Resolved> {
        let mut candidate = desired.to_path_buf();
        if candidate.is_dir()
            && let Some(name) = source.file_name()
        {
            candidate.push(name);
        }

        for attempt in 0..self.limit {
            if !occupied(&candidate) {
                if pending.iter().any(|p| p == &candidate) {
                    debug!(path = %candidate.display(), "Resolved target already pending");
                    return Ok(Resolved::Pending(candidate));
                }
                if attempt > 0 {
                    debug!(desired = %desired.display(), resolved = %candidate.display(), attempt, "Resolved collision");
                }
                return Ok(Resolved::Free(candidate));
            }
            trace!(path = %candidate.display(), "Destination exists, trying next name");
            candidate = next_candidate(&candidate);
        }

        Err(SorterError::Resolution {
            path: desired.to_path_buf(),
            limit: self.limit,
        })
    }
}

/// Anything at the path (file, directory, dangling symlink) counts as a collision.
fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Next candidate name for a path that already exists.
///
/// Examples:
/// - "x.png" -> "x (1).png"
/// - "x (1).png" -> "x (2).png"
/// - "shot(9).jpg" -> "shot(10).jpg"
/// - ".env" -> ".env (1)"
/// - "archive.tar.gz" -> "archive.tar (1).gz"
pub fn next_candidate(path: &Path) -> PathBuf {
    let Some(name) = path.file_name() else {
        let mut appended = path.as_os_str().to_os_string();
        appended.push(" (1)");
        return PathBuf::from(appended);
    };
    let base = Path::new(name);
    let stem: OsString = base
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| name.to_os_string());

    let mut new_name = match stem.to_str().and_then(split_counter) {
        Some((prefix, n)) => OsString::from(format!("{prefix}({n})")),
        None => {
            let mut s = stem.clone();
            s.push(" (1)");
            s
        }
    };
    if let Some(ext) = base.extension() {
        new_name.push(".");
        new_name.push(ext);
    }
    path.with_file_name(new_name)
}

/// Split "<prefix>(<N>)" into the prefix and N+1.
/// Returns None when the stem has no numeric counter or it would overflow.
fn split_counter(stem: &str) -> Option<(&str, u64)> {
    let inner = stem.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let digits = &inner[open + 1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: u64 = digits.parse().ok()?;
    Some((&inner[..open], n.checked_add(1)?))
}
