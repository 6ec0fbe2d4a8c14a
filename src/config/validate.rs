//! Config validation logic.
//! Verifies the review directory, the pre-bound destinations and numeric limits.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

use super::types::Config;

impl Config {
    /// Validate settings against the directory about to be reviewed.
    pub fn validate(&self, source_dir: &Path) -> Result<()> {
        // 1) Review directory: must exist, be a directory, and be readable.
        ensure_dir_exists_and_is_dir(source_dir, "source_dir")?;
        fs::read_dir(source_dir).with_context(|| {
            format!(
                "Cannot read source_dir '{}'; check permissions",
                source_dir.display()
            )
        })?;
        debug!("source_dir readable: {}", source_dir.display());

        // 2) Limits and extension set.
        if self.resolve_limit == 0 {
            bail!("resolve_limit must be at least 1");
        }
        if self.extensions.is_empty() {
            bail!("extensions must list at least one image extension");
        }

        // 3) Pre-bound destinations: letters only, existing directories.
        let src_real = fs::canonicalize(source_dir).unwrap_or_else(|_| source_dir.to_path_buf());
        for (key, folder) in &self.destinations {
            if !key.is_ascii_alphabetic() {
                bail!("destination key must be a letter, got '{key}'");
            }
            ensure_dir_exists_and_is_dir(folder, &format!("destination [{key}]"))?;
            let real = fs::canonicalize(folder).unwrap_or_else(|_| folder.clone());
            if real.starts_with(&src_real) {
                // Scans are recursive: moved images will show up again after commit.
                warn!(
                    key = %key,
                    folder = %folder.display(),
                    "Destination is inside the reviewed directory; its images will be rescanned"
                );
            }
        }

        info!(
            "Config validated: source='{}' destinations={} log_file='{}'",
            source_dir.display(),
            self.destinations.len(),
            self.log_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".into())
        );
        Ok(())
    }
}

/// Ensure path exists and is a directory; emit clear errors with path context.
fn ensure_dir_exists_and_is_dir(path: &Path, name: &str) -> Result<()> {
    if !path.exists() {
        error!("{name} does not exist: {}", path.display());
        bail!("{name} does not exist: {}", path.display());
    }
    if !path.is_dir() {
        error!("{name} is not a directory: {}", path.display());
        bail!("{name} is not a directory: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn accepts_existing_dirs() {
        let td = tempdir().unwrap();
        let keep = td.path().join("keep");
        let src = td.path().join("src");
        fs::create_dir_all(&keep).unwrap();
        fs::create_dir_all(&src).unwrap();
        let mut cfg = Config::default();
        cfg.destinations.insert('k', keep);
        cfg.validate(&src).unwrap();
    }

    #[test]
    fn rejects_missing_source() {
        let td = tempdir().unwrap();
        let err = Config::default().validate(&td.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("does not exist"), "got: {err}");
    }

    #[test]
    fn rejects_file_destination() {
        let td = tempdir().unwrap();
        let file = td.path().join("file.txt");
        fs::write(&file, b"x").unwrap();
        let mut cfg = Config::default();
        cfg.destinations.insert('f', file);
        let err = cfg.validate(td.path()).unwrap_err();
        assert!(err.to_string().contains("not a directory"), "got: {err}");
    }

    #[test]
    fn rejects_zero_limit() {
        let td = tempdir().unwrap();
        let cfg = Config { resolve_limit: 0, ..Config::default() };
        assert!(cfg.validate(td.path()).is_err());
    }
}
