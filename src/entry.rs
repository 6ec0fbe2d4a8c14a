//! One discovered image and its pending disposition.
//!
//! Commit order is fixed: every copy first, then delete, else move. Delete wins
//! over a marked move. The source is never touched after it is deleted or moved.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{CommitOp, Result, SorterError};
use crate::fs_ops::{delete_file, move_file, safe_copy_and_rename_with_metadata};
use crate::resolve::{PathResolver, Resolved};

/// Knobs that affect how a commit touches the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitOptions {
    /// Log and report the plan without touching the filesystem.
    pub dry_run: bool,
    /// Copy timestamps and permission bits onto copies.
    pub preserve_metadata: bool,
}

/// What happened to the source after the copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Deleted,
    Moved(PathBuf),
}

/// Successful commit of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub source: PathBuf,
    pub copied: Vec<PathBuf>,
    pub removal: Option<Removal>,
    pub dry_run: bool,
}

impl CommitReport {
    /// True when the commit had nothing to do.
    pub fn is_noop(&self) -> bool {
        self.copied.is_empty() && self.removal.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct ImageEntry {
    source: PathBuf,
    move_target: Option<PathBuf>,
    copy_targets: Vec<PathBuf>,
    delete: bool,
    resolver: PathResolver,
}

impl ImageEntry {
    /// Create an entry for an existing file.
    pub fn new(source: impl Into<PathBuf>, resolver: PathResolver) -> Result<Self> {
        let source = source.into();
        if !source.is_file() {
            return Err(SorterError::SourceNotFound(source));
        }
        debug!(path = %source.display(), "Loaded");
        Ok(Self {
            source,
            move_target: None,
            copy_targets: Vec::new(),
            delete: false,
            resolver,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn move_target(&self) -> Option<&Path> {
        self.move_target.as_deref()
    }

    pub fn copy_targets(&self) -> &[PathBuf] {
        &self.copy_targets
    }

    pub fn is_marked_for_delete(&self) -> bool {
        self.delete
    }

    /// True when no copy, move or delete is pending.
    pub fn is_untouched(&self) -> bool {
        self.move_target.is_none() && self.copy_targets.is_empty() && !self.delete
    }

    /// Mark the source to be moved to `desired` (resolved against disk only).
    /// Replaces any previous move target; a matching copy target is dropped.
    pub fn mark_move(&mut self, desired: &Path) -> Result<&Path> {
        let target = self.resolver.resolve(desired, &self.source, &[])?.into_path();
        if let Some(pos) = self.copy_targets.iter().position(|p| p == &target) {
            self.copy_targets.remove(pos);
            debug!(path = %target.display(), "Dropped copy target replaced by move");
        }
        info!(src = %self.source.display(), dest = %target.display(), "Will move");
        Ok(self.move_target.insert(target).as_path())
    }

    /// Mark the source to be copied to `desired`.
    /// `Resolved::Pending` means the resolved path was already a copy or move
    /// target and nothing changed.
    pub fn mark_copy(&mut self, desired: &Path) -> Result<Resolved> {
        let resolved = match self.resolver.resolve(desired, &self.source, &self.copy_targets)? {
            Resolved::Free(target) if self.move_target.as_ref() == Some(&target) => {
                Resolved::Pending(target)
            }
            other => other,
        };
        match &resolved {
            Resolved::Pending(target) => {
                debug!(src = %self.source.display(), dest = %target.display(), "Target already pending");
            }
            Resolved::Free(target) => {
                info!(src = %self.source.display(), dest = %target.display(), "Will copy");
                self.copy_targets.push(target.clone());
            }
        }
        Ok(resolved)
    }

    /// Flip the delete flag and return its new value.
    pub fn toggle_delete(&mut self) -> bool {
        self.delete = !self.delete;
        if self.delete {
            info!(src = %self.source.display(), "Will delete");
        } else {
            info!(src = %self.source.display(), "Will not delete");
        }
        self.delete
    }

    /// Apply the pending disposition.
    ///
    /// Stops at the first failing operation without rolling back; the error
    /// carries the copies that already landed.
    pub fn commit(&self, opts: CommitOptions) -> Result<CommitReport> {
        let mut copied = Vec::with_capacity(self.copy_targets.len());

        for dest in &self.copy_targets {
            if opts.dry_run {
                info!(src = %self.source.display(), dest = %dest.display(), "dry-run: would copy");
            } else {
                safe_copy_and_rename_with_metadata(&self.source, dest, opts.preserve_metadata)
                    .map_err(|source| SorterError::Commit {
                        op: CommitOp::Copy,
                        path: dest.clone(),
                        completed_copies: copied.clone(),
                        source,
                    })?;
                info!(src = %self.source.display(), dest = %dest.display(), "Copied");
            }
            copied.push(dest.clone());
        }

        let removal = if self.delete {
            if opts.dry_run {
                info!(src = %self.source.display(), "dry-run: would delete");
            } else {
                delete_file(&self.source).map_err(|source| SorterError::Commit {
                    op: CommitOp::Delete,
                    path: self.source.clone(),
                    completed_copies: copied.clone(),
                    source,
                })?;
                info!(src = %self.source.display(), "Deleted");
            }
            Some(Removal::Deleted)
        } else if let Some(dest) = &self.move_target {
            if opts.dry_run {
                info!(src = %self.source.display(), dest = %dest.display(), "dry-run: would move");
            } else {
                move_file(&self.source, dest, opts.preserve_metadata).map_err(|source| {
                    SorterError::Commit {
                        op: CommitOp::Move,
                        path: dest.clone(),
                        completed_copies: copied.clone(),
                        source,
                    }
                })?;
                info!(src = %self.source.display(), dest = %dest.display(), "Moved");
            }
            Some(Removal::Moved(dest.clone()))
        } else {
            None
        };

        Ok(CommitReport {
            source: self.source.clone(),
            copied,
            removal,
            dry_run: opts.dry_run,
        })
    }
}
