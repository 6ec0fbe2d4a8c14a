//! No POSIX modes here; files and directories inherit the parent's ACLs.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

pub(super) fn owner_only(_opts: &mut OpenOptions) {}

pub fn restrict_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
