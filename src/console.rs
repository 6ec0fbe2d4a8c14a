//! Line-oriented terminal shell for a review session.
//!
//! One key name per line ("Right", "Left", "Return", "Delete" or a letter).
//! Folder prompts read the next line; an empty line cancels. "Quit" or end of
//! input leaves without committing.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::warn;

use crate::entry::{ImageEntry, Removal};
use crate::keys::{Key, KeyOutcome};
use crate::session::{CommitSummary, Event, Session};
use crate::shutdown;

/// Why the review loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A commit left no images to review.
    Finished,
    /// The user typed Quit.
    Quit,
    /// Input closed.
    EndOfInput,
    /// Ctrl-C was pressed.
    Interrupted,
}

pub struct Console<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Give back the output sink (tests inspect it).
    pub fn into_output(self) -> W {
        self.out
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask for a directory. Empty input, end of input, or a non-directory cancels.
    pub fn prompt_folder(&mut self, title: &str) -> io::Result<Option<PathBuf>> {
        write!(self.out, "{title}: ")?;
        self.out.flush()?;
        let Some(answer) = self.read_line()? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(None);
        }
        let path = PathBuf::from(answer);
        if !path.is_dir() {
            writeln!(self.out, "not a directory: {}", path.display())?;
            return Ok(None);
        }
        Ok(Some(path))
    }

    /// Drive `session` from the input until it finishes or the user leaves.
    pub fn run(&mut self, session: &mut Session) -> Result<RunOutcome> {
        loop {
            if shutdown::is_requested() {
                return Ok(RunOutcome::Interrupted);
            }
            let Some(current) = session.current() else {
                writeln!(self.out, "No images left in {}", session.root().display())?;
                return Ok(RunOutcome::Finished);
            };
            let header = describe(current, session.index(), session.len());
            writeln!(self.out, "{header}")?;

            let Some(line) = self.read_line()? else {
                return Ok(RunOutcome::EndOfInput);
            };
            // Ctrl-C may land while the read is blocked; drop that line.
            if shutdown::is_requested() {
                return Ok(RunOutcome::Interrupted);
            }
            if line.is_empty() {
                continue;
            }
            if line == "Quit" {
                return Ok(RunOutcome::Quit);
            }
            let Some(key) = Key::parse(&line) else {
                writeln!(self.out, "unknown key: {line}")?;
                continue;
            };

            let event = session.handle_key(key, |letter| {
                let title = format!("Please select a directory to associate with: [{letter}]");
                self.prompt_folder(&title).unwrap_or_else(|e| {
                    warn!(error = %e, "Folder prompt failed");
                    None
                })
            });
            match event {
                Ok(ev) => self.report(&ev)?,
                // Resolution failures leave the entry unchanged; keep reviewing.
                Err(e) => writeln!(self.out, "error: {e}")?,
            }
        }
    }

    fn report(&mut self, event: &Event) -> io::Result<()> {
        match event {
            Event::Navigated(_) | Event::Empty => Ok(()),
            Event::DeleteToggled { marked: true, .. } => writeln!(self.out, "will delete"),
            Event::DeleteToggled { marked: false, .. } => writeln!(self.out, "will not delete"),
            Event::Disposed { outcome, .. } => match outcome {
                KeyOutcome::Copy { target, added: true } => {
                    writeln!(self.out, "will copy to {}", target.display())
                }
                KeyOutcome::Copy { target, added: false } => {
                    writeln!(self.out, "already going to {}", target.display())
                }
                KeyOutcome::Move { target } => writeln!(self.out, "will move to {}", target.display()),
                KeyOutcome::Cancelled => writeln!(self.out, "cancelled"),
                KeyOutcome::Ignored => Ok(()),
            },
            Event::Committed(summary) => self.report_summary(summary),
        }
    }

    fn report_summary(&mut self, summary: &CommitSummary) -> io::Result<()> {
        for r in &summary.reports {
            let verb = if r.dry_run { "would " } else { "" };
            for dest in &r.copied {
                writeln!(self.out, "{verb}copy {} -> {}", r.source.display(), dest.display())?;
            }
            match &r.removal {
                Some(Removal::Deleted) => writeln!(self.out, "{verb}delete {}", r.source.display())?,
                Some(Removal::Moved(dest)) => {
                    writeln!(self.out, "{verb}move {} -> {}", r.source.display(), dest.display())?
                }
                None => {}
            }
        }
        for e in &summary.failures {
            writeln!(self.out, "error: {e}")?;
        }
        writeln!(
            self.out,
            "committed {} change(s), {} failure(s), {} image(s) remaining",
            summary.changed(),
            summary.failures.len(),
            summary.remaining
        )
    }
}

/// "[2/5] /photos/b.png (copy -> /keep/b.png; delete)"
fn describe(entry: &ImageEntry, index: usize, len: usize) -> String {
    let mut pending = Vec::new();
    for c in entry.copy_targets() {
        pending.push(format!("copy -> {}", c.display()));
    }
    if let Some(m) = entry.move_target() {
        pending.push(format!("move -> {}", m.display()));
    }
    if entry.is_marked_for_delete() {
        pending.push("delete".to_string());
    }
    let mut line = format!("[{}/{}] {}", index + 1, len, entry.source().display());
    if !pending.is_empty() {
        line.push_str(&format!(" ({})", pending.join("; ")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serial_test::serial;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn prompt_folder_cancels_on_empty_line() {
        let mut c = Console::new(Cursor::new("\n"), Vec::new());
        assert_eq!(c.prompt_folder("Pick").unwrap(), None);
    }

    #[test]
    fn prompt_folder_rejects_non_directory() {
        let td = tempdir().unwrap();
        let file = td.path().join("f.txt");
        std::fs::write(&file, b"x").unwrap();
        let mut c = Console::new(Cursor::new(format!("{}\n", file.display())), Vec::new());
        assert_eq!(c.prompt_folder("Pick").unwrap(), None);
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("not a directory"), "got: {out}");
    }

    #[test]
    fn prompt_folder_accepts_directory() {
        let td = tempdir().unwrap();
        let mut c = Console::new(Cursor::new(format!("  {}  \n", td.path().display())), Vec::new());
        assert_eq!(c.prompt_folder("Pick").unwrap(), Some(td.path().to_path_buf()));
    }

    fn one_image() -> (tempfile::TempDir, std::path::PathBuf, std::path::PathBuf) {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();
        fs::write(src.join("a.png"), b"img").unwrap();
        (td, src, dst)
    }

    #[test]
    #[serial]
    fn move_then_return_finishes() {
        let (_td, src, dst) = one_image();
        let mut session = Session::open(&src, &Config::default()).unwrap();
        let input = format!("k\n{}\nReturn\n", dst.display());
        let mut c = Console::new(Cursor::new(input), Vec::new());
        assert_eq!(c.run(&mut session).unwrap(), RunOutcome::Finished);
        assert!(dst.join("a.png").exists());
        assert!(!src.join("a.png").exists());
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("Please select a directory to associate with: [k]"), "got: {out}");
        assert!(out.contains("committed 1 change(s), 0 failure(s), 0 image(s) remaining"), "got: {out}");
    }

    #[test]
    #[serial]
    fn quit_leaves_files_alone() {
        let (_td, src, _dst) = one_image();
        let mut session = Session::open(&src, &Config::default()).unwrap();
        let mut c = Console::new(Cursor::new("Delete\nQuit\n"), Vec::new());
        assert_eq!(c.run(&mut session).unwrap(), RunOutcome::Quit);
        assert!(src.join("a.png").exists());
    }

    #[test]
    #[serial]
    fn unknown_keys_are_reported() {
        let (_td, src, _dst) = one_image();
        let mut session = Session::open(&src, &Config::default()).unwrap();
        let mut c = Console::new(Cursor::new("Space\n"), Vec::new());
        assert_eq!(c.run(&mut session).unwrap(), RunOutcome::EndOfInput);
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("unknown key: Space"), "got: {out}");
    }

    /// Raises the interrupt flag the first time the loop asks for input.
    struct InterruptingReader(Cursor<&'static [u8]>);

    impl io::Read for InterruptingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            shutdown::request();
            self.0.read(buf)
        }
    }

    impl BufRead for InterruptingReader {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            shutdown::request();
            self.0.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            self.0.consume(amt)
        }
    }

    #[test]
    #[serial]
    fn interrupt_during_read_discards_the_line() {
        let (_td, src, _dst) = one_image();
        let mut session = Session::open(&src, &Config::default()).unwrap();
        session.handle_key(Key::Delete, |_| None).unwrap();
        let reader = InterruptingReader(Cursor::new(&b"Return\n"[..]));
        let mut c = Console::new(reader, Vec::new());
        let outcome = c.run(&mut session);
        shutdown::reset();
        assert_eq!(outcome.unwrap(), RunOutcome::Interrupted);
        assert!(src.join("a.png").exists());
        assert!(session.entries()[0].is_marked_for_delete());
    }

    #[test]
    #[serial]
    fn interrupt_stops_before_reading() {
        let (_td, src, _dst) = one_image();
        let mut session = Session::open(&src, &Config::default()).unwrap();
        let mut c = Console::new(Cursor::new("Delete\nReturn\n"), Vec::new());
        shutdown::request();
        let outcome = c.run(&mut session);
        shutdown::reset();
        assert_eq!(outcome.unwrap(), RunOutcome::Interrupted);
        assert!(src.join("a.png").exists());
    }
}
