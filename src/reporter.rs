//! Last-resort sink for the logger's own failures.

use chrono::Local;
use std::error::Error;
use std::panic::{self, AssertUnwindSafe};

use crate::config::Config;
use crate::console::{emit, Console};
use crate::format::{compose_line, format_timestamp, render_error};
use crate::state::Warning;

pub const SETUP_INCOMPLETE: &str =
    "KatScan: setup() was not called before the first scan; call it once at startup";
pub const PERMISSION_DENIED: &str =
    "KatScan: storage write permission is not granted; entries are not written to file";
pub const INVALID_PATH: &str = "KatScan: entry path could not be resolved; entry dropped";
pub const BAD_DATE_PATTERN: &str = "KatScan: entry date pattern could not be used; entry dropped";
pub const REQUEST_IN_PROGRESS: &str =
    "KatScan: permission request still in progress; entry routed to console only";
pub const NON_INTERACTIVE_HOST: &str =
    "KatScan: host handle cannot show a permission prompt; pass a foreground handle to setup()";
pub const POLL_UNAVAILABLE: &str =
    "KatScan: no scheduler for the permission poll; call notify_permission_result() on grant";
pub const PERMISSION_TIMED_OUT: &str =
    "KatScan: permission request timed out; call setup() again once permission is granted";
pub const PERMISSION_CHECK_FAILED: &str = "KatScan: permission check failed";
pub const REQUEST_FAILED: &str = "KatScan: permission request failed";
pub const WRITE_FAILED: &str = "KatScan: entry could not be written to file";
pub const WORKER_FAILED: &str = "KatScan: entry worker could not be started";
pub const DISPATCH_PANICKED: &str = "KatScan: scan panicked internally; entry dropped";

/// Diagnostic shown the first time `warning` fires.
#[must_use]
pub const fn warning_text(warning: Warning) -> &'static str {
    match warning {
        Warning::SetupIncomplete => SETUP_INCOMPLETE,
        Warning::PermissionDenied => PERMISSION_DENIED,
        Warning::InvalidPath => INVALID_PATH,
        Warning::DatePattern => BAD_DATE_PATTERN,
        Warning::RequestInProgress => REQUEST_IN_PROGRESS,
        Warning::NonInteractiveHost => NON_INTERACTIVE_HOST,
        Warning::PollUnavailable => POLL_UNAVAILABLE,
        Warning::PermissionCheckFailed => PERMISSION_CHECK_FAILED,
        Warning::PermissionTimedOut => PERMISSION_TIMED_OUT,
    }
}

/// Writes internal failures to the console, never to storage.
pub struct Reporter<'a> {
    console: &'a dyn Console,
    config: &'a Config,
    debug_build: bool,
}

impl<'a> Reporter<'a> {
    #[must_use]
    pub fn new(console: &'a dyn Console, config: &'a Config, debug_build: bool) -> Self {
        Self {
            console,
            config,
            debug_build,
        }
    }

    /// Report an optional message and an optional error.
    ///
    /// The message goes on its own line, the rendered error trace on the
    /// next. Silent unless the build is debug and internal errors are shown.
    /// Never unwinds into the caller; a panic inside is printed raw.
    pub fn report(&self, error: Option<&dyn Error>, message: Option<&str>) {
        if !self.debug_build || !self.config.internal_errors.show_internal_errors {
            return;
        }
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.write(error, message)));
        if outcome.is_err() {
            self.console.print_err("KatScan: internal reporter failed");
        }
    }

    pub fn message(&self, message: &str) {
        self.report(None, Some(message));
    }

    fn write(&self, error: Option<&dyn Error>, message: Option<&str>) {
        let date = self.date_prefix();
        if let Some(message) = message {
            self.line(date.as_deref(), message);
        }
        if let Some(error) = error {
            self.line(date.as_deref(), &render_error(error));
        }
    }

    fn line(&self, date: Option<&str>, text: &str) {
        let line = compose_line(date, None, self.config.separator(), text);
        emit(self.console, self.config, self.debug_build, &line);
    }

    fn date_prefix(&self) -> Option<String> {
        if !self.config.date.include_date_in_log_entries {
            return None;
        }
        let now = Local::now().naive_local();
        // A bad pattern here must not recurse into the reporter
        format_timestamp(self.config.date.entry_pattern(), &now).ok()
    }
}
