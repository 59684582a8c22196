//! Console fallback: the platform log, or stderr.

use std::io::Write;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, info, trace, warn};

use crate::config::{Config, LogMethod};

/// The host's log/console facility.
pub trait Console: Send + Sync {
    /// Write to the structured platform log at `method` severity.
    fn log(&self, method: LogMethod, tag: &str, text: &str);

    /// Write a raw line to the standard error stream.
    fn print_err(&self, text: &str);
}

/// Console backed by `tracing` events and the process's stderr.
///
/// On a mobile host, install a subscriber that forwards to the platform log
/// (logcat, `os_log`); the event carries the configured tag as a field.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformConsole;

impl Console for PlatformConsole {
    fn log(&self, method: LogMethod, tag: &str, text: &str) {
        match method {
            LogMethod::Error => error!(tag = %tag, "{text}"),
            LogMethod::Warning => warn!(tag = %tag, "{text}"),
            LogMethod::Information => info!(tag = %tag, "{text}"),
            LogMethod::Debug => debug!(tag = %tag, "{text}"),
            LogMethod::Verbose => trace!(tag = %tag, "{text}"),
        }
    }

    fn print_err(&self, text: &str) {
        let mut stderr = std::io::stderr().lock();
        // Nowhere left to report a failing stderr
        drop(writeln!(stderr, "{text}"));
    }
}

/// A line captured by [`MemoryConsole`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    /// `None` when the line went to stderr.
    pub method: Option<LogMethod>,
    pub tag: Option<String>,
    pub text: String,
}

/// Console that keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemoryConsole {
    lines: Mutex<Vec<ConsoleLine>>,
}

impl MemoryConsole {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<ConsoleLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Just the text of every captured line.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.lines().into_iter().map(|line| line.text).collect()
    }

    /// Number of captured lines containing `needle`.
    #[must_use]
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines()
            .iter()
            .filter(|line| line.text.contains(needle))
            .count()
    }

    fn push(&self, line: ConsoleLine) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}

impl Console for MemoryConsole {
    fn log(&self, method: LogMethod, tag: &str, text: &str) {
        self.push(ConsoleLine {
            method: Some(method),
            tag: Some(tag.to_string()),
            text: text.to_string(),
        });
    }

    fn print_err(&self, text: &str) {
        self.push(ConsoleLine {
            method: None,
            tag: None,
            text: text.to_string(),
        });
    }
}

/// Write `text` to the console. Output only happens in debug builds, even
/// when logging was forced on for a release build.
pub fn emit(console: &dyn Console, config: &Config, debug_build: bool, text: &str) {
    if !debug_build {
        return;
    }
    let settings = &config.internal_errors;
    if settings.use_structured_log {
        console.log(settings.log_method, settings.tag(), text);
    } else {
        console.print_err(text);
    }
}
