mod init;
pub use init::{default_filter, init_logging};
use tracing::Level;
/// Crate target used in the default filter directive.
pub const LOG_TARGET: &str = "katscan";
/// Configuration for the tracing subscriber installed by host binaries.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: Level,
    pub json_format: bool,
}
impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            json_format: false,
        }
    }
}
#[cfg(test)]
#[path = "../logging_tests.rs"]
mod logging_tests;
