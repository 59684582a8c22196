use super::*;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.file.default_file_name, "KatScan_log");
    assert_eq!(cfg.file.file_extension, ".txt");
    assert_eq!(cfg.file.main_directory_name, "KatScan_katscan/");
    assert!(cfg.file.write_to_file_instead_of_log);
    assert!(cfg.file.write_to_file_and_log);
    assert!(!cfg.file.write_count_with_every_entry);
    assert!(cfg.date.include_date_in_file_entries);
    assert!(!cfg.date.include_date_in_log_entries);
    assert_eq!(cfg.entry_separator, " - ");
    assert!(!cfg.worker_per_call);
    assert_eq!(cfg.internal_errors.log_method, LogMethod::Debug);
    assert_eq!(cfg.permission_request.request_code, 65496);
}

#[test]
fn test_normalize_dir_adds_single_delimiter() {
    assert_eq!(normalize_dir("/sdcard", "/"), "/sdcard/");
    assert_eq!(normalize_dir("/sdcard/", "/"), "/sdcard/");
    assert_eq!(normalize_dir("/sdcard//", "/"), "/sdcard/");
    assert_eq!(normalize_dir("  logs  ", "/"), "logs/");
}

#[test]
fn test_normalize_dir_blank_falls_back() {
    assert_eq!(normalize_dir("", "/data"), "/data/");
    assert_eq!(normalize_dir("   ", "KatScan_x/"), "KatScan_x/");
    assert_eq!(normalize_dir("/", "/data"), "/");
}

#[test]
fn test_blank_overrides_fall_back_at_read_time() {
    let mut cfg = Config::default();
    cfg.file.main_directory_name = "  ".to_string();
    cfg.file.default_file_name = String::new();
    cfg.file.file_extension = " ".to_string();
    cfg.date.entry_date_pattern = String::new();
    cfg.internal_errors.log_tag = String::new();

    // Stored values are untouched
    assert_eq!(cfg.file.main_directory_name, "  ");

    assert_eq!(cfg.file.main_directory(), "KatScan_katscan/");
    assert_eq!(cfg.file.file_name_or_default(None), "KatScan_log");
    assert_eq!(cfg.file.extension(), ".txt");
    assert_eq!(cfg.date.entry_pattern(), DEFAULT_ENTRY_DATE_PATTERN);
    assert_eq!(cfg.internal_errors.tag(), DEFAULT_LOG_TAG);
}

#[test]
fn test_file_name_override() {
    let cfg = Config::default();
    assert_eq!(cfg.file.file_name_or_default(Some("Errors/log")), "Errors/log");
    assert_eq!(cfg.file.file_name_or_default(Some("   ")), "KatScan_log");
}

#[test]
fn test_full_path_to_main_directory() {
    let mut cfg = Config::default();
    cfg.file.root_directory_path = "/storage/emulated/0".to_string();
    cfg.file.main_directory_name = main_directory_for("com.example.app");
    assert_eq!(
        cfg.file.full_path_to_main_directory(),
        "/storage/emulated/0/KatScan_com.example.app/"
    );
}

#[test]
fn test_routing_toggles() {
    let mut file = FileSettings::default();
    assert!(file.routes_to_file());
    assert!(file.routes_to_console());

    file.write_to_file_and_log = false;
    assert!(file.routes_to_file());
    assert!(!file.routes_to_console());

    file.write_to_file_instead_of_log = false;
    assert!(!file.routes_to_file());
    assert!(file.routes_to_console());
}

#[test]
fn test_zero_durations_fall_back() {
    let mut settings = PermissionRequestSettings::default();
    settings.poll_interval_ms = 0;
    settings.max_wait_ms = 0;
    assert_eq!(settings.poll_interval(), Duration::from_millis(1000));
    assert_eq!(settings.max_wait(), Duration::from_secs(60));
}

#[test]
fn test_empty_separator_falls_back() {
    let mut cfg = Config::default();
    cfg.entry_separator = String::new();
    assert_eq!(cfg.separator(), " - ");
    cfg.entry_separator = " | ".to_string();
    assert_eq!(cfg.separator(), " | ");
}

#[test]
fn test_log_method_from_str() {
    assert_eq!("warn".parse::<LogMethod>(), Ok(LogMethod::Warning));
    assert_eq!("VERBOSE".parse::<LogMethod>(), Ok(LogMethod::Verbose));
    assert_eq!("info".parse::<LogMethod>(), Ok(LogMethod::Information));
    assert!("loud".parse::<LogMethod>().is_err());
}

#[test]
fn test_empty_toml_produces_defaults() {
    let cfg = parse_config("").expect("Should parse empty TOML");
    assert_eq!(cfg, Config::default());
}

#[test]
fn test_partial_toml() {
    let toml_str = r#"
entry_separator = " | "
worker_per_call = true

[file]
default_file_name = "app"
write_count_with_every_entry = true

[internal_errors]
log_method = "error"
"#;
    let cfg = parse_config(toml_str).expect("Should parse partial TOML");
    assert_eq!(cfg.entry_separator, " | ");
    assert!(cfg.worker_per_call);
    assert_eq!(cfg.file.default_file_name, "app");
    assert!(cfg.file.write_count_with_every_entry);
    assert_eq!(cfg.file.file_extension, ".txt");
    assert_eq!(cfg.internal_errors.log_method, LogMethod::Error);
    assert!(cfg.internal_errors.show_internal_errors);
}

#[test]
fn test_invalid_toml_is_error() {
    let result = parse_config("[file]\nline_break_between_entries = \"yes\"\n");
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn test_roundtrip_through_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("katscan.toml");
    let mut cfg = Config::default();
    cfg.file.daily_subdirectory = true;
    cfg.permission_request.poll_interval_ms = 250;

    fs::write(&path, to_toml(&cfg).expect("serialize")).expect("write config");
    let loaded = load_config(&path).expect("load config");
    assert_eq!(loaded, cfg);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempdir().expect("tempdir");
    let result = load_config(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
