//! The write pipeline behind every scan call.

use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use tracing::debug;

use super::entry::Entry;
use super::Inner;
use crate::config::Config;
use crate::console::emit;
use crate::error::ScanError;
use crate::format::{compose_line, format_timestamp};
use crate::path::resolve_entry_path;
use crate::reporter::WRITE_FAILED;
use crate::state::Warning;
use crate::storage::append_entry;

impl Inner {
    /// Route one entry to its file and/or the console.
    ///
    /// Nothing here returns an error: every failure goes to the reporter and
    /// the entry is written wherever it still can be.
    pub(super) fn write_entry(&self, entry: &Entry, config: &Config) {
        if !self.state.is_setup_complete() {
            self.warn(config, Warning::SetupIncomplete, None);
        }
        if !self.state.is_enabled() {
            return;
        }

        let now = Local::now().naive_local();
        let to_file = config.file.routes_to_file();
        let date_enabled = if to_file {
            config.date.include_date_in_file_entries
        } else {
            config.date.include_date_in_log_entries
        };
        let date = match entry_date(config, date_enabled, &now) {
            Ok(date) => date,
            Err(e) => {
                self.warn(config, Warning::DatePattern, Some(&e));
                return;
            }
        };
        // Numbered after the last point where the entry can be dropped
        let counter = config
            .file
            .write_count_with_every_entry
            .then(|| self.state.next_entry_number());
        let line = compose_line(date.as_deref(), counter, config.separator(), entry.body());

        let path = resolve_entry_path(config, entry.file(), &now);
        let written = to_file && self.permission.is_granted() && self.store(config, &path, &line);

        let printed = config.file.routes_to_console();
        if printed {
            emit(self.console.as_ref(), config, self.state.is_debug_build(), &line);
        }

        if to_file && !written {
            self.file_fallback(config, path.as_ref().err(), &line, printed);
        }
    }

    fn store(&self, config: &Config, path: &Result<PathBuf, ScanError>, line: &str) -> bool {
        let Ok(path) = path else {
            return false;
        };
        match append_entry(path, line, config.file.line_break_between_entries) {
            Ok(()) => {
                debug!(path = %path.display(), "Entry written");
                true
            }
            Err(e) => {
                self.reporter(config).report(Some(&e), Some(WRITE_FAILED));
                false
            }
        }
    }

    fn file_fallback(
        &self,
        config: &Config,
        path_error: Option<&ScanError>,
        line: &str,
        printed: bool,
    ) {
        if !self.permission.is_granted() {
            self.warn(config, Warning::PermissionDenied, None);
        }
        if let Some(e) = path_error {
            self.warn(config, Warning::InvalidPath, Some(e));
        }
        let requesting = self.permission.is_requesting();
        if requesting {
            self.warn(config, Warning::RequestInProgress, None);
        }
        if !printed && (requesting || config.internal_errors.show_entry_in_log_on_file_failure) {
            emit(self.console.as_ref(), config, self.state.is_debug_build(), line);
        }
    }
}

fn entry_date(
    config: &Config,
    enabled: bool,
    now: &NaiveDateTime,
) -> Result<Option<String>, ScanError> {
    if !enabled {
        return Ok(None);
    }
    format_timestamp(config.date.entry_pattern(), now).map(Some)
}
