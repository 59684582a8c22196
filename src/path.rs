use chrono::NaiveDateTime;
use std::path::PathBuf;

use crate::config::{Config, DIR_DELIMITER};
use crate::error::ScanError;
use crate::format::format_timestamp;

/// Compute where an entry is written:
/// `root/ main/ [today/] name extension`.
///
/// Pure: the same configuration, override and timestamp always give the
/// same path. A blank override falls back to the default file name; a
/// leading delimiter on the override is dropped so the file stays inside
/// the main directory.
pub fn resolve_entry_path(
    config: &Config,
    file_override: Option<&str>,
    now: &NaiveDateTime,
) -> Result<PathBuf, ScanError> {
    let mut path = config.file.full_path_to_main_directory();

    if config.file.daily_subdirectory {
        let today = format_timestamp(config.date.subdirectory_pattern(), now)?;
        path.push_str(&today);
        path.push(DIR_DELIMITER);
    }

    let name = config
        .file
        .file_name_or_default(file_override)
        .trim_start_matches(DIR_DELIMITER);
    if name.is_empty() || name.ends_with(DIR_DELIMITER) {
        return Err(ScanError::invalid_path(
            format!("{path}{name}"),
            "no file name after the last directory",
        ));
    }
    path.push_str(name);
    path.push_str(config.file.extension());

    Ok(PathBuf::from(path))
}
