use super::*;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug)]
struct Layer {
    message: &'static str,
    source: Option<Box<Layer>>,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

impl Error for Layer {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.source {
            Some(inner) => Some(&**inner),
            None => None,
        }
    }
}

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 5, 7)
        .unwrap()
}

#[test]
fn test_render_error_includes_sources() {
    let err = Layer {
        message: "outer failure",
        source: Some(Box::new(Layer {
            message: "inner failure",
            source: None,
        })),
    };
    assert_eq!(
        render_error(&err),
        "outer failure\nCaused by: inner failure"
    );
}

#[test]
fn test_render_error_strips_one_trailing_newline() {
    let err = Layer {
        message: "ends with newlines\n\n",
        source: None,
    };
    assert_eq!(render_error(&err), "ends with newlines\n");
}

#[test]
fn test_render_body_message_only() {
    assert_eq!(render_body(Content::Message(&"hello")), "hello");
}

#[test]
fn test_render_body_error_only() {
    let err = Layer {
        message: "outer",
        source: Some(Box::new(Layer {
            message: "inner",
            source: None,
        })),
    };
    assert_eq!(render_body(Content::Error(&err)), "outer\nCaused by: inner");
}

#[test]
fn test_render_body_both() {
    let err = Layer {
        message: "trace line",
        source: None,
    };
    assert_eq!(
        render_body(Content::MessageAndError(&"boom", &err)),
        "boom\n\ttrace line"
    );
}

#[test]
fn test_format_timestamp_default_patterns() {
    assert_eq!(
        format_timestamp("%y-%m-%d_%H:%M:%S", &at()).unwrap(),
        "24-03-01_09:05:07"
    );
    assert_eq!(format_timestamp("%Y-%m-%d", &at()).unwrap(), "2024-03-01");
}

#[test]
fn test_format_timestamp_rejects_bad_pattern() {
    let result = format_timestamp("%Y-%Q", &at());
    assert!(matches!(result, Err(ScanError::DatePattern { .. })));
}

#[test]
fn test_compose_line_all_segments() {
    assert_eq!(
        compose_line(Some("24-03-01"), Some(7), " - ", "hello"),
        "24-03-01 - 7 - hello"
    );
}

#[test]
fn test_compose_line_date_only() {
    assert_eq!(
        compose_line(Some("24-03-01"), None, " - ", "hello"),
        "24-03-01 - hello"
    );
}

#[test]
fn test_compose_line_counter_only() {
    assert_eq!(compose_line(None, Some(3), " | ", "hello"), "3 | hello");
}

#[test]
fn test_compose_line_no_prefix() {
    assert_eq!(compose_line(None, None, " - ", "hello"), "hello");
}
