mod io;
mod types;

pub use io::{load_config, parse_config, to_toml, ConfigError};
pub use types::{
    default_root_directory, main_directory_for, normalize_dir, Config, DateSettings,
    FileSettings, InternalErrorSettings, LogMethod, PermissionRequestSettings,
    DEFAULT_ENTRY_DATE_PATTERN, DEFAULT_FILE_EXTENSION, DEFAULT_FILE_NAME, DEFAULT_LOG_TAG,
    DEFAULT_MAX_WAIT_MS, DEFAULT_PERMISSION_REQUEST_CODE, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_SEPARATOR, DEFAULT_SUBDIRECTORY_DATE_PATTERN, DIR_DELIMITER, KATSCAN_PREFIX,
};

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
