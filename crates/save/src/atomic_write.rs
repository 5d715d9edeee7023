//! Atomic file write using the write-rename pattern.
//!
//! Data goes to a sibling temp file, is synced, then renamed over the
//! target. A crash mid-write leaves the previous snapshot intact.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// `{path}.tmp`, next to the target so the rename stays on one filesystem.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(OsString::from(".tmp"));
    PathBuf::from(name)
}

/// Write `data` to `path` through a temp file and a rename, creating parent
/// directories as needed. The temp file is removed if the write fails.
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_path(path);
    let written = File::create(&tmp).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    fs::rename(&tmp, path)
}
