//! Atomic rename helper.
//! - Refuses to replace an existing destination (targets were collision-free when marked).
//! - On Unix, best-effort fsync of the destination directory after rename.

use std::fs;
use std::io;
use std::path::Path;

use super::util::fsync_dir;

pub fn try_atomic_move(src: &Path, dst: &Path) -> io::Result<()> {
    // POSIX rename silently replaces; a file that appeared after marking must not be clobbered.
    if dst.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination appeared since it was marked: {}", dst.display()),
        ));
    }

    fs::rename(src, dst)?;

    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        // Ignore fsync errors to avoid turning a successful rename into a failure.
        let _ = fsync_dir(parent);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn renames_into_free_slot() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.png");
        let dst = td.path().join("b.png");
        fs::write(&src, b"img").unwrap();
        try_atomic_move(&src, &dst).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read(&dst).unwrap(), b"img");
    }

    #[test]
    fn refuses_to_clobber() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.png");
        let dst = td.path().join("b.png");
        fs::write(&src, b"new").unwrap();
        fs::write(&dst, b"old").unwrap();
        let err = try_atomic_move(&src, &dst).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&dst).unwrap(), b"old");
        assert!(src.exists());
    }
}
