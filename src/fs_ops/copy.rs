//! Safe copy-and-rename helper:
//! - Copies to a temp file in the destination directory
//! - Ensures data durability (io_copy::copy_streaming fsyncs the temp file)
//! - Atomically renames temp -> dest, refusing to clobber
//! - Fsyncs the destination directory (Unix; handled in atomic::try_atomic_move)

use std::fs;
use std::io;
use std::path::Path;

use super::atomic::try_atomic_move;
use super::helpers::io_error_with_help;
use super::meta::maybe_preserve_metadata;
use super::{io_copy, util};

/// Copy src -> temp in dest dir, then atomic rename temp -> dest.
/// The destination directory must already exist; copy targets are chosen
/// inside folders the user picked, so a missing folder is an error, not created.
pub fn safe_copy_and_rename(src: &Path, dest: &Path) -> io::Result<()> {
    let dest_dir = dest.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("destination has no parent: {}", dest.display()),
        )
    })?;

    let tmp_path = util::unique_temp_path(dest_dir);

    if let Err(e) = io_copy::copy_streaming(src, &tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error_with_help("copy to temporary file", &tmp_path)(e));
    }

    if let Err(e) = try_atomic_move(&tmp_path, dest) {
        // Best-effort cleanup of the temp file on failure.
        let _ = fs::remove_file(&tmp_path);
        return Err(io_error_with_help("publish copy", dest)(e));
    }

    Ok(())
}

/// Perform safe copy-and-rename, then preserve metadata if requested.
pub fn safe_copy_and_rename_with_metadata(src: &Path, dest: &Path, preserve: bool) -> io::Result<()> {
    safe_copy_and_rename(src, dest)?;
    maybe_preserve_metadata(src, dest, preserve)
        .map_err(io_error_with_help("preserve metadata", dest))
}
