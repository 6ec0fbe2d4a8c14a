//! Image discovery.
//! - Walks the root recursively (symlinks are not followed).
//! - Keeps regular files whose extension is in the configured set. The match is
//!   case-sensitive: "a.JPG" is not picked up by ".jpg".
//! - Returns paths sorted lexicographically.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::{Result, SorterError};

/// Extensions picked up when the config does not override them.
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// Default extension set as owned strings (config representation).
pub fn default_extensions() -> Vec<String> {
    DEFAULT_IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

/// True when `path` has one of `extensions` (given without the leading dot).
pub fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// Recursively list image files under `root`, sorted by path.
pub fn scan_images(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(SorterError::ScanRoot(root.to_path_buf()));
    }

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                warn!(error = %err, "Skipping unreadable entry during scan");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_image_extension(p, extensions))
        .collect();

    found.sort();
    debug!(root = %root.display(), count = found.len(), "Scan finished");
    Ok(found)
}
