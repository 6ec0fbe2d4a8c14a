//! Streaming copy used for copy targets and cross-device moves.
//!
//! - Writes to a newly created destination file (O_EXCL semantics; never clobbers).
//! - Buffered I/O with 1 MiB buffers.
//! - Fsyncs the written file before returning so the later rename publishes complete data.
//!
//! The source is read once from start to EOF.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

const BUF_SIZE: usize = 1024 * 1024;

/// Copy `src` -> `dst` and return the number of bytes written.
/// Callers are responsible for syncing the parent directory after the final rename.
pub(super) fn copy_streaming(src: &Path, dst: &Path) -> io::Result<u64> {
    let src_f = File::open(src)?;
    let dst_f = OpenOptions::new().write(true).create_new(true).open(dst)?;

    let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst_f);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn copy_small_file_ok() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src.png");
        let dst_path = dir.path().join("dst.png");
        let data = b"\x89PNG fake image body";
        fs::write(&src_path, data).unwrap();

        let n = copy_streaming(&src_path, &dst_path).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(fs::read(&dst_path).unwrap(), data);
    }

    #[test]
    fn copy_zero_length_ok() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("empty.gif");
        let dst_path = dir.path().join("out.gif");
        File::create(&src_path).unwrap();
        assert_eq!(copy_streaming(&src_path, &dst_path).unwrap(), 0);
        assert!(dst_path.exists());
    }

    #[test]
    fn existing_destination_is_not_clobbered() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("a.jpg");
        let dst_path = dir.path().join("b.jpg");
        fs::write(&src_path, b"new").unwrap();
        fs::write(&dst_path, b"old").unwrap();
        let err = copy_streaming(&src_path, &dst_path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&dst_path).unwrap(), b"old");
    }
}
