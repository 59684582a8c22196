// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

//! Crash-safe diagnostic logging to append-only text files.
//!
//! Call [`KatScan::setup`] (or [`setup`] on the process-wide instance) once
//! with a [`Host`], then [`KatScan::scan`] from anywhere. Entries go to
//! `{root}/KatScan_{package}/[{yyyy-MM-dd}/]{file}.txt` and/or the console;
//! no scan call ever returns an error or panics.

pub mod config;
pub mod console;
mod dispatch;
pub mod error;
pub mod format;
mod global;
pub mod host;
pub mod logging;
pub mod path;
pub mod permission;
mod reporter;
pub mod state;
pub mod storage;

pub use config::{load_config, parse_config, Config, ConfigError, LogMethod};
pub use console::{Console, ConsoleLine, MemoryConsole, PlatformConsole};
pub use dispatch::KatScan;
pub use error::ScanError;
pub use global::{
    config, force_enable, instance, notify_permission_result, scan, scan_error,
    scan_error_to, scan_error_with, scan_error_with_to, scan_to, setup,
    setup_with_daily_subdirectory, update_config,
};
pub use host::{Host, HostError, StaticHost};
pub use permission::PermissionState;
pub use state::Warning;
