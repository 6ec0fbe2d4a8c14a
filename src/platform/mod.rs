//! Platform-specific helpers for the files image_sorter owns (config and log).
//! Unix gets owner-only modes; elsewhere the OS defaults apply.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
use unix as imp;
#[cfg(not(unix))]
use windows as imp;

pub use imp::{open_log_file_secure_append, restrict_dir};

static SEQ: AtomicU64 = AtomicU64::new(0);

fn staging_sibling(target: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    dir.join(format!(".image_sorter.config.{pid}.{nanos}.{seq}.tmp"))
}

/// Write a new owner-only file at `path` via a staged sibling and rename.
/// Fails with `AlreadyExists` rather than replacing a file that is already there.
pub fn write_private_file_new(path: &Path, contents: &[u8]) -> io::Result<()> {
    if fs::symlink_metadata(path).is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("refusing to replace {}", path.display()),
        ));
    }
    let staged = staging_sibling(path);
    let mut opts = OpenOptions::new();
    opts.write(true).create_new(true);
    imp::owner_only(&mut opts);

    let written = opts.open(&staged).and_then(|mut f| {
        f.write_all(contents)?;
        f.sync_all()
    });
    let renamed = written.and_then(|()| fs::rename(&staged, path));
    if let Err(e) = renamed {
        let _ = fs::remove_file(&staged);
        return Err(e);
    }

    #[cfg(unix)]
    if let Some(parent) = path.parent() {
        let _ = fs::File::open(parent).and_then(|d| d.sync_all());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn staged_names_differ() {
        let target = Path::new("/cfg/config.xml");
        let a = staging_sibling(target);
        let b = staging_sibling(target);
        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(Path::new("/cfg")));
    }

    #[test]
    fn writes_once_and_leaves_no_staging_file() {
        let dir = tempdir().unwrap();
        let cfg = dir.path().join("config.xml");
        write_private_file_new(&cfg, b"<config/>").unwrap();
        assert_eq!(fs::read(&cfg).unwrap(), b"<config/>");

        let err = write_private_file_new(&cfg, b"<other/>").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&cfg).unwrap(), b"<config/>");

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1, "leftover files: {names:?}");
    }
}
