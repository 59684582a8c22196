//! Rendering of entry bodies and entry lines.

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Write};

use crate::error::ScanError;

/// Joins a message and an error trace inside one entry body.
pub const MESSAGE_TRACE_JOINER: &str = "\n\t";

/// Render the complete trace of an error: its own message followed by one
/// `Caused by:` line per source. One trailing newline is stripped.
#[must_use]
pub fn render_error(error: &dyn Error) -> String {
    let mut trace = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        // Writing into a String cannot fail
        let _ = write!(trace, "\nCaused by: {cause}");
        source = cause.source();
    }
    match trace.strip_suffix('\n') {
        Some(stripped) => stripped.to_string(),
        None => trace,
    }
}

/// What a scan call supplied.
#[derive(Clone, Copy)]
pub enum Content<'a> {
    Message(&'a dyn Display),
    Error(&'a dyn Error),
    MessageAndError(&'a dyn Display, &'a dyn Error),
}

/// Build the entry body: the message alone, the error trace alone, or the
/// message followed by the trace on a tab-indented line.
#[must_use]
pub fn render_body(content: Content<'_>) -> String {
    match content {
        Content::Message(message) => message.to_string(),
        Content::Error(error) => render_error(error),
        Content::MessageAndError(message, error) => {
            format!("{message}{MESSAGE_TRACE_JOINER}{}", render_error(error))
        }
    }
}

/// Format `at` with a chrono `strftime` pattern, rejecting patterns chrono
/// cannot parse.
pub fn format_timestamp(pattern: &str, at: &NaiveDateTime) -> Result<String, ScanError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(ScanError::date_pattern(pattern));
    }
    let mut out = String::new();
    write!(out, "{}", at.format_with_items(items.iter()))
        .map_err(|_| ScanError::date_pattern(pattern))?;
    Ok(out)
}

/// Compose an entry line: `[date] [counter] separator body`, each prefix
/// segment optional. Without any prefix the line is just the body.
#[must_use]
pub fn compose_line(
    date: Option<&str>,
    counter: Option<u64>,
    separator: &str,
    body: &str,
) -> String {
    let mut line = String::new();
    if let Some(date) = date {
        line.push_str(date);
        line.push_str(separator);
    }
    if let Some(counter) = counter {
        let _ = write!(line, "{counter}{separator}");
    }
    line.push_str(body);
    line
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod format_tests;
