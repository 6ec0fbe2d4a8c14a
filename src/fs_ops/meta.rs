//! Metadata preservation.
//! Optionally copies timestamps and (on Unix) permission bits from source to a copy.

use filetime::{FileTime, set_file_times};
use std::fs;
use std::io;
use std::path::Path;

pub(super) fn maybe_preserve_metadata(src: &Path, dest: &Path, preserve: bool) -> io::Result<()> {
    if !preserve {
        return Ok(());
    }

    let meta = fs::metadata(src)?;

    let at = FileTime::from_last_access_time(&meta);
    let mt = FileTime::from_last_modification_time(&meta);
    set_file_times(dest, at, mt)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = meta.permissions().mode() & 0o777;
        fs::set_permissions(dest, fs::Permissions::from_mode(mode))?;
    }

    Ok(())
}
