use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;

pub(super) fn owner_only(opts: &mut OpenOptions) {
    opts.mode(0o600);
}

/// chmod 0700.
pub fn restrict_dir(path: &Path) -> io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
}

/// Open the log file for appending. A new file is created 0600; an existing
/// file keeps whatever mode the user gave it.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.create(true).append(true);
    owner_only(&mut opts);
    opts.open(path)
}
