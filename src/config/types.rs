use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::host::DEFAULT_PACKAGE_NAME;

/// Prefix shared by the main directory and the default file name.
pub const KATSCAN_PREFIX: &str = "KatScan_";
pub const DEFAULT_FILE_NAME: &str = "KatScan_log";
pub const DEFAULT_FILE_EXTENSION: &str = ".txt";
pub const DEFAULT_ENTRY_DATE_PATTERN: &str = "%y-%m-%d_%H:%M:%S";
pub const DEFAULT_SUBDIRECTORY_DATE_PATTERN: &str = "%Y-%m-%d";
pub const DEFAULT_SEPARATOR: &str = " - ";
pub const DEFAULT_LOG_TAG: &str = "katscan_entry";
pub const DEFAULT_PERMISSION_REQUEST_CODE: i32 = 65496;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_MAX_WAIT_MS: u64 = 60_000;
pub const DIR_DELIMITER: char = '/';

/// Main directory name derived from a host package name.
#[must_use]
pub fn main_directory_for(package_name: &str) -> String {
    format!("{KATSCAN_PREFIX}{package_name}{DIR_DELIMITER}")
}

/// Root under which the main directory is created when none is configured.
#[must_use]
pub fn default_root_directory() -> String {
    dirs::home_dir().map_or_else(
        || DIR_DELIMITER.to_string(),
        |home| home.to_string_lossy().into_owned(),
    )
}

/// Ensure a directory string ends with exactly one delimiter; blank values
/// fall back to `default`.
#[must_use]
pub fn normalize_dir(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    let chosen = if trimmed.is_empty() {
        default.trim()
    } else {
        trimmed
    };
    let stripped = chosen.trim_end_matches(DIR_DELIMITER);
    format!("{stripped}{DIR_DELIMITER}")
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

/// Severity used when writing to the host's structured log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMethod {
    Error,
    Warning,
    Information,
    #[default]
    Debug,
    Verbose,
}

impl std::str::FromStr for LogMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = match s.to_lowercase().as_str() {
            "error" | "e" => Self::Error,
            "warning" | "warn" | "w" => Self::Warning,
            "information" | "info" | "i" => Self::Information,
            "debug" | "d" => Self::Debug,
            "verbose" | "trace" | "v" => Self::Verbose,
            _ => return Err(format!("Invalid log method: {s}")),
        };
        Ok(method)
    }
}

/// Where entries go and how files are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    /// Absolute path in front of `main_directory_name`.
    pub root_directory_path: String,
    /// Directory holding every entry file for this application.
    pub main_directory_name: String,
    /// File used when a scan call names no file of its own.
    pub default_file_name: String,
    /// Extension appended to every entry file, default or caller-named.
    pub file_extension: String,
    pub line_break_between_entries: bool,
    /// Write to a file instead of the console.
    pub write_to_file_instead_of_log: bool,
    /// Write to both; `write_to_file_instead_of_log` is ignored when set.
    pub write_to_file_and_log: bool,
    /// Tag each entry with a per-process counter.
    pub write_count_with_every_entry: bool,
    /// Put entries into a subdirectory named after today's date.
    pub daily_subdirectory: bool,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            root_directory_path: default_root_directory(),
            main_directory_name: main_directory_for(DEFAULT_PACKAGE_NAME),
            default_file_name: DEFAULT_FILE_NAME.to_string(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            line_break_between_entries: false,
            write_to_file_instead_of_log: true,
            write_to_file_and_log: true,
            write_count_with_every_entry: false,
            daily_subdirectory: false,
        }
    }
}

impl FileSettings {
    #[must_use]
    pub fn root_directory(&self) -> String {
        normalize_dir(&self.root_directory_path, &default_root_directory())
    }

    #[must_use]
    pub fn main_directory(&self) -> String {
        normalize_dir(
            &self.main_directory_name,
            &main_directory_for(DEFAULT_PACKAGE_NAME),
        )
    }

    /// Root and main directory joined, e.g. `/sdcard/KatScan_com.example/`.
    #[must_use]
    pub fn full_path_to_main_directory(&self) -> String {
        format!("{}{}", self.root_directory(), self.main_directory())
    }

    #[must_use]
    pub fn file_name_or_default<'a>(&'a self, name: Option<&'a str>) -> &'a str {
        match name {
            Some(n) if !n.trim().is_empty() => n.trim(),
            _ => or_default(&self.default_file_name, DEFAULT_FILE_NAME).trim(),
        }
    }

    #[must_use]
    pub fn extension(&self) -> &str {
        or_default(&self.file_extension, DEFAULT_FILE_EXTENSION).trim()
    }

    /// Whether entries should be written to a file.
    #[must_use]
    pub fn routes_to_file(&self) -> bool {
        self.write_to_file_and_log || self.write_to_file_instead_of_log
    }

    /// Whether entries should be written to the console.
    #[must_use]
    pub fn routes_to_console(&self) -> bool {
        self.write_to_file_and_log || !self.write_to_file_instead_of_log
    }
}

/// Date prefixes and the daily subdirectory name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateSettings {
    pub include_date_in_file_entries: bool,
    /// chrono `strftime` pattern for entry prefixes.
    pub entry_date_pattern: String,
    /// chrono `strftime` pattern for the daily subdirectory.
    pub subdirectory_date_pattern: String,
    /// Prefix the date on console output and internal errors.
    pub include_date_in_log_entries: bool,
}

impl Default for DateSettings {
    fn default() -> Self {
        Self {
            include_date_in_file_entries: true,
            entry_date_pattern: DEFAULT_ENTRY_DATE_PATTERN.to_string(),
            subdirectory_date_pattern: DEFAULT_SUBDIRECTORY_DATE_PATTERN.to_string(),
            include_date_in_log_entries: false,
        }
    }
}

impl DateSettings {
    #[must_use]
    pub fn entry_pattern(&self) -> &str {
        or_default(&self.entry_date_pattern, DEFAULT_ENTRY_DATE_PATTERN)
    }

    #[must_use]
    pub fn subdirectory_pattern(&self) -> &str {
        or_default(
            &self.subdirectory_date_pattern,
            DEFAULT_SUBDIRECTORY_DATE_PATTERN,
        )
    }
}

/// Visibility of the logger's own diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternalErrorSettings {
    /// Master switch for every internal diagnostic.
    pub show_internal_errors: bool,
    pub show_setup_warning: bool,
    pub show_permission_denied_warning: bool,
    /// Invalid paths and empty entries.
    pub show_invalid_path_warning: bool,
    pub show_request_in_progress_warning: bool,
    /// Non-interactive host, unavailable poll scheduler and poll timeout.
    pub show_permission_request_warnings: bool,
    pub show_permission_check_errors: bool,
    /// Structured log (tracing) rather than stderr.
    pub use_structured_log: bool,
    /// Echo an entry to the console when its file write fails.
    pub show_entry_in_log_on_file_failure: bool,
    pub log_method: LogMethod,
    pub log_tag: String,
}

impl Default for InternalErrorSettings {
    fn default() -> Self {
        Self {
            show_internal_errors: true,
            show_setup_warning: true,
            show_permission_denied_warning: true,
            show_invalid_path_warning: true,
            show_request_in_progress_warning: true,
            show_permission_request_warnings: true,
            show_permission_check_errors: true,
            use_structured_log: true,
            show_entry_in_log_on_file_failure: true,
            log_method: LogMethod::Debug,
            log_tag: DEFAULT_LOG_TAG.to_string(),
        }
    }
}

impl InternalErrorSettings {
    #[must_use]
    pub fn tag(&self) -> &str {
        or_default(&self.log_tag, DEFAULT_LOG_TAG)
    }
}

/// Tuning for the permission grant poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionRequestSettings {
    pub request_code: i32,
    pub poll_interval_ms: u64,
    pub max_wait_ms: u64,
}

impl Default for PermissionRequestSettings {
    fn default() -> Self {
        Self {
            request_code: DEFAULT_PERMISSION_REQUEST_CODE,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_wait_ms: DEFAULT_MAX_WAIT_MS,
        }
    }
}

impl PermissionRequestSettings {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(if self.poll_interval_ms == 0 {
            DEFAULT_POLL_INTERVAL_MS
        } else {
            self.poll_interval_ms
        })
    }

    #[must_use]
    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(if self.max_wait_ms == 0 {
            DEFAULT_MAX_WAIT_MS
        } else {
            self.max_wait_ms
        })
    }
}

/// Every runtime-tunable setting of the logger.
///
/// Changes take effect on the next scan; nothing is validated on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Placed between the date, the counter and the entry body.
    pub entry_separator: String,
    /// Run each entry's write on its own worker.
    pub worker_per_call: bool,
    pub file: FileSettings,
    pub date: DateSettings,
    pub internal_errors: InternalErrorSettings,
    pub permission_request: PermissionRequestSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry_separator: DEFAULT_SEPARATOR.to_string(),
            worker_per_call: false,
            file: FileSettings::default(),
            date: DateSettings::default(),
            internal_errors: InternalErrorSettings::default(),
            permission_request: PermissionRequestSettings::default(),
        }
    }
}

impl Config {
    /// Separator between entry segments. Whitespace-only separators are kept
    /// as written; only an empty one falls back to the default.
    #[must_use]
    pub fn separator(&self) -> &str {
        if self.entry_separator.is_empty() {
            DEFAULT_SEPARATOR
        } else {
            &self.entry_separator
        }
    }
}
