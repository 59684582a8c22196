//! One process-wide logger behind free functions.
//!
//! The instance is created with default configuration on first use. Call
//! [`setup`] once at startup, then [`scan`] from anywhere.

use std::error::Error;
use std::fmt::Display;
use std::sync::{Arc, OnceLock};

use crate::config::Config;
use crate::dispatch::KatScan;
use crate::host::Host;

static INSTANCE: OnceLock<KatScan> = OnceLock::new();

/// The process-wide logger.
pub fn instance() -> &'static KatScan {
    INSTANCE.get_or_init(KatScan::new)
}

pub fn setup(host: Arc<dyn Host>) -> bool {
    instance().setup(host)
}

pub fn setup_with_daily_subdirectory(host: Arc<dyn Host>, daily: bool) -> bool {
    instance().setup_with_daily_subdirectory(host, daily)
}

pub fn scan<M: Display>(message: M) {
    instance().scan(message);
}

pub fn scan_error(error: &dyn Error) {
    instance().scan_error(error);
}

pub fn scan_error_with<M: Display>(error: &dyn Error, message: M) {
    instance().scan_error_with(error, message);
}

pub fn scan_to<M: Display>(file: &str, message: M) {
    instance().scan_to(file, message);
}

pub fn scan_error_to(file: &str, error: &dyn Error) {
    instance().scan_error_to(file, error);
}

pub fn scan_error_with_to<M: Display>(file: &str, error: &dyn Error, message: M) {
    instance().scan_error_with_to(file, error, message);
}

pub fn force_enable(enable: bool, host: Option<Arc<dyn Host>>) {
    instance().force_enable(enable, host);
}

pub fn notify_permission_result(granted: bool) {
    instance().notify_permission_result(granted);
}

#[must_use]
pub fn config() -> Config {
    instance().config()
}

pub fn update_config<F: FnOnce(&mut Config)>(update: F) {
    instance().update_config(update);
}
