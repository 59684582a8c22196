//! Common test utilities

use katscan::{KatScan, MemoryConsole, StaticHost};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const PACKAGE: &str = "com.example.tests";

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// A logger rooted in `root` that captures console output in memory
pub fn logger_in(root: &Path) -> (KatScan, Arc<MemoryConsole>) {
    let console = Arc::new(MemoryConsole::new());
    let katscan = KatScan::with_console(console.clone());
    let root = root.display().to_string();
    katscan.update_config(|config| config.file.root_directory_path = root);
    (katscan, console)
}

/// Debug-build host with storage access already granted
pub fn granted_host() -> Arc<StaticHost> {
    Arc::new(StaticHost::granted().with_package_name(PACKAGE))
}

/// Debug-build host that must prompt for storage access
#[allow(dead_code)] // Test utility for integration tests
pub fn prompting_host() -> Arc<StaticHost> {
    Arc::new(StaticHost::prompting().with_package_name(PACKAGE))
}

/// Main directory the logger writes into under `root`
pub fn main_dir(root: &Path) -> PathBuf {
    root.join(format!("KatScan_{PACKAGE}"))
}

/// Read a log file into lines
pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("Log file should exist")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Wait until `path` holds `count` lines, for entries written by workers
#[allow(dead_code)] // Test utility for integration tests
pub fn wait_for_lines(path: &Path, count: usize) -> Vec<String> {
    for _ in 0..300 {
        if let Ok(content) = std::fs::read_to_string(path) {
            if content.lines().count() >= count {
                return content.lines().map(str::to_string).collect();
            }
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("Timed out waiting for {count} lines in {}", path.display());
}
