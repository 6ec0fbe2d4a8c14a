//! Review session: the scanned entries, a cursor, and the letter bindings.
//!
//! Key handling mirrors the review loop:
//! - Right/Left move the cursor (clamped at both ends)
//! - Delete toggles delete on the current image and advances
//! - a letter marks a move (lowercase, then advances) or a copy (uppercase)
//! - Return commits every entry, then rescans the directory

use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::entry::{CommitOptions, CommitReport, ImageEntry};
use crate::errors::{Result, SorterError};
use crate::keys::{Destinations, Key, KeyOutcome, dispose_by_key};
use crate::resolve::PathResolver;
use crate::scan::scan_images;

/// What a key press did.
#[derive(Debug)]
pub enum Event {
    /// Cursor now points at this index (may be unchanged at either end).
    Navigated(usize),
    /// Delete flag of the image at `index` is now `marked`.
    DeleteToggled { index: usize, marked: bool },
    /// A letter was applied to the image at `index`.
    Disposed { index: usize, outcome: KeyOutcome },
    /// All entries were committed and the directory rescanned.
    Committed(CommitSummary),
    /// There are no images to act on.
    Empty,
}

/// Result of committing every loaded entry.
#[derive(Debug, Default)]
pub struct CommitSummary {
    pub reports: Vec<CommitReport>,
    pub failures: Vec<SorterError>,
    /// Images found by the rescan that followed the commit.
    pub remaining: usize,
}

impl CommitSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of entries whose commit changed something.
    pub fn changed(&self) -> usize {
        self.reports.iter().filter(|r| !r.is_noop()).count()
    }
}

#[derive(Debug)]
pub struct Session {
    root: PathBuf,
    extensions: Vec<String>,
    resolver: PathResolver,
    commit_options: CommitOptions,
    destinations: Destinations,
    entries: Vec<ImageEntry>,
    index: usize,
}

impl Session {
    /// Scan `root` and load an entry per image.
    pub fn open(root: impl Into<PathBuf>, cfg: &Config) -> Result<Self> {
        let mut session = Self {
            root: root.into(),
            extensions: cfg.extensions.clone(),
            resolver: cfg.resolver(),
            commit_options: cfg.commit_options(),
            destinations: cfg.initial_destinations(),
            entries: Vec::new(),
            index: 0,
        };
        session.rescan()?;
        Ok(session)
    }

    /// Replace all entries with a fresh scan and reset the cursor.
    pub fn rescan(&mut self) -> Result<usize> {
        let paths = scan_images(&self.root, &self.extensions)?;
        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            match ImageEntry::new(path, self.resolver) {
                Ok(e) => entries.push(e),
                // Vanished between the walk and now; nothing to review.
                Err(SorterError::SourceNotFound(p)) => {
                    warn!(path = %p.display(), "Image disappeared during scan")
                }
                Err(e) => return Err(e),
            }
        }
        self.entries = entries;
        self.index = 0;
        info!(root = %self.root.display(), count = self.entries.len(), "Loaded images");
        Ok(self.entries.len())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&ImageEntry> {
        self.entries.get(self.index)
    }

    pub fn destinations(&self) -> &Destinations {
        &self.destinations
    }

    pub fn destinations_mut(&mut self) -> &mut Destinations {
        &mut self.destinations
    }

    /// Advance the cursor; stays on the last image.
    pub fn next(&mut self) -> usize {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
        }
        self.index
    }

    /// Step back; stays on the first image.
    pub fn prev(&mut self) -> usize {
        self.index = self.index.saturating_sub(1);
        self.index
    }

    /// Apply one key. `folder_lookup` is consulted for unbound letters only.
    pub fn handle_key<F>(&mut self, key: Key, folder_lookup: F) -> Result<Event>
    where
        F: FnMut(char) -> Option<PathBuf>,
    {
        if self.entries.is_empty() {
            return Ok(Event::Empty);
        }
        match key {
            Key::Right => Ok(Event::Navigated(self.next())),
            Key::Left => Ok(Event::Navigated(self.prev())),
            Key::Delete => {
                let index = self.index;
                let marked = self.entries[index].toggle_delete();
                self.next();
                Ok(Event::DeleteToggled { index, marked })
            }
            Key::Letter(letter) => {
                let index = self.index;
                let outcome = dispose_by_key(
                    &mut self.entries[index],
                    letter,
                    &mut self.destinations,
                    folder_lookup,
                )?;
                if outcome.advances() {
                    self.next();
                }
                Ok(Event::Disposed { index, outcome })
            }
            Key::Return => Ok(Event::Committed(self.commit_all()?)),
        }
    }

    /// Commit every entry in order, then rescan.
    ///
    /// A failing entry is recorded and the rest still commit. Only a failed
    /// rescan is returned as an error.
    pub fn commit_all(&mut self) -> Result<CommitSummary> {
        let mut summary = CommitSummary::default();
        for entry in &self.entries {
            match entry.commit(self.commit_options) {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    error!(code = e.code(), kind = e.kind(), src = %entry.source().display(), error = %e, "Commit failed");
                    summary.failures.push(e);
                }
            }
        }
        info!(
            changed = summary.changed(),
            failed = summary.failures.len(),
            "Commit pass finished"
        );
        summary.remaining = self.rescan()?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn session_with(names: &[&str]) -> (tempfile::TempDir, Session) {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        fs::create_dir_all(&src).unwrap();
        for n in names {
            fs::write(src.join(n), n.as_bytes()).unwrap();
        }
        let s = Session::open(&src, &Config::default()).unwrap();
        (td, s)
    }

    #[test]
    fn cursor_is_clamped() {
        let (_td, mut s) = session_with(&["a.png", "b.png"]);
        assert_eq!(s.prev(), 0);
        assert_eq!(s.next(), 1);
        assert_eq!(s.next(), 1);
        assert_eq!(s.prev(), 0);
    }

    #[test]
    fn delete_toggles_and_advances() {
        let (_td, mut s) = session_with(&["a.png", "b.png"]);
        let ev = s.handle_key(Key::Delete, |_| None).unwrap();
        assert!(matches!(ev, Event::DeleteToggled { index: 0, marked: true }));
        assert_eq!(s.index(), 1);
        assert!(s.entries()[0].is_marked_for_delete());
    }

    #[test]
    fn cancelled_lookup_changes_nothing() {
        let (_td, mut s) = session_with(&["a.png"]);
        let ev = s.handle_key(Key::Letter('k'), |_| None).unwrap();
        assert!(matches!(ev, Event::Disposed { outcome: KeyOutcome::Cancelled, .. }));
        assert!(s.current().unwrap().is_untouched());
        assert!(s.destinations().is_empty());
    }

    #[test]
    fn empty_directory_reports_empty() {
        let (_td, mut s) = session_with(&["notes.txt"]);
        assert!(s.is_empty());
        assert!(s.current().is_none());
        assert!(matches!(s.handle_key(Key::Right, |_| None).unwrap(), Event::Empty));
    }
}
