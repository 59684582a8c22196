//! Append-only entry files.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::ScanError;

/// Append one entry line to `path`, creating every missing directory and
/// the file itself first.
///
/// The write is flushed and synced before returning. The handle is closed
/// when it goes out of scope, on success and on every error path.
pub fn append_entry(path: &Path, line: &str, blank_line: bool) -> Result<(), ScanError> {
    ensure_parent_directory(path)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ScanError::open_file(path, e))?;

    let mut text = String::with_capacity(line.len().saturating_add(2));
    text.push_str(line);
    text.push('\n');
    if blank_line {
        text.push('\n');
    }

    file.write_all(text.as_bytes())
        .and_then(|()| file.flush())
        .and_then(|()| file.sync_data())
        .map_err(|e| ScanError::write(path, e))
}

fn ensure_parent_directory(path: &Path) -> Result<(), ScanError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(parent).map_err(|e| ScanError::create_directory(parent, e))
}
