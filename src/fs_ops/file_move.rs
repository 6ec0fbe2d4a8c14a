//! File move implementation.
//! Attempts atomic rename; across filesystems falls back to safe copy+rename
//! followed by removing the original.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use super::atomic::try_atomic_move;
use super::copy::safe_copy_and_rename_with_metadata;
use super::helpers::io_error_with_help;
use super::util::is_cross_device;

/// Move `src` to exactly `dest` (already collision-resolved by the caller).
pub fn move_file(src: &Path, dest: &Path, preserve_metadata: bool) -> io::Result<()> {
    match try_atomic_move(src, dest) {
        Ok(()) => {
            debug!(src = %src.display(), dest = %dest.display(), "Renamed file atomically");
            Ok(())
        }
        Err(e) if is_cross_device(&e) => {
            warn!(error = %e, hint = "cross-filesystem; will copy instead", "Atomic rename failed, using safe copy+rename");
            safe_copy_and_rename_with_metadata(src, dest, preserve_metadata)?;
            fs::remove_file(src).map_err(io_error_with_help("remove original file", src))
        }
        Err(e) => Err(io_error_with_help("rename", dest)(e)),
    }
}

/// Delete the source file.
pub fn delete_file(src: &Path) -> io::Result<()> {
    fs::remove_file(src).map_err(io_error_with_help("delete", src))
}
