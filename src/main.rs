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

use clap::Parser;
use color_eyre::eyre::Result;
use katscan::logging::{init_logging, LogConfig};
use katscan::{load_config, Config, KatScan, PermissionState, StaticHost};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};

/// KatScan demo - writes a few entries the way an application would
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory the KatScan_<package> folder is created in (default: home)
    #[arg(long, env = "KATSCAN_ROOT_DIR")]
    root_dir: Option<String>,

    /// Package name used for the main directory
    #[arg(long, env = "KATSCAN_PACKAGE", default_value = "com.example.katscan")]
    package: String,

    /// TOML configuration file, applied before the flags below
    #[arg(long, env = "KATSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Write entries into a subdirectory named after today's date
    #[arg(long, env = "KATSCAN_DAILY", default_value = "false")]
    daily: bool,

    /// Write each entry on its own worker
    #[arg(long, env = "KATSCAN_WORKER_PER_CALL", default_value = "false")]
    worker_per_call: bool,

    /// Tag each entry with a running counter
    #[arg(long, env = "KATSCAN_COUNT", default_value = "false")]
    count: bool,

    /// Leave a blank line after each entry
    #[arg(long, env = "KATSCAN_BLANK_LINES", default_value = "false")]
    blank_lines: bool,

    /// Simulate a host that prompts for storage access and is granted it
    /// after this many milliseconds
    #[arg(long, env = "KATSCAN_GRANT_AFTER_MS")]
    grant_after_ms: Option<u64>,

    /// Enable JSON log format
    #[arg(long, env = "KATSCAN_LOG_JSON", default_value = "false")]
    log_json: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "KATSCAN_LOG_LEVEL", default_value = "debug")]
    log_level: Level,

    /// Messages to write
    #[arg(default_values_t = vec!["Hello from katscan-demo".to_string()])]
    messages: Vec<String>,
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if let Some(root) = &args.root_dir {
        config.file.root_directory_path.clone_from(root);
    }
    config.worker_per_call |= args.worker_per_call;
    config.file.write_count_with_every_entry |= args.count;
    config.file.line_break_between_entries |= args.blank_lines;
    Ok(config)
}

/// Wait for the permission poll to settle, at most `max_wait`.
async fn wait_for_permission(katscan: &KatScan, interval: Duration, max_wait: Duration) {
    let mut waited = Duration::ZERO;
    while katscan.permission_state() == PermissionState::Requesting && waited < max_wait {
        tokio::time::sleep(interval).await;
        waited = waited.saturating_add(interval);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    init_logging(&LogConfig {
        log_level: args.log_level,
        json_format: args.log_json,
    })?;

    let config = build_config(&args)?;
    let poll_interval = config.permission_request.poll_interval();
    let max_wait = config.permission_request.max_wait();

    let katscan = KatScan::new();
    katscan.set_config(config);

    let host = Arc::new(
        match args.grant_after_ms {
            Some(_) => StaticHost::prompting(),
            None => StaticHost::granted(),
        }
        .with_package_name(args.package.clone()),
    );
    let complete = if args.daily {
        katscan.setup_with_daily_subdirectory(host.clone(), true)
    } else {
        katscan.setup(host.clone())
    };
    info!(complete, state = ?katscan.permission_state(), "Setup finished");

    if let Some(delay) = args.grant_after_ms {
        let granting = Arc::clone(&host);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            granting.set_granted(true);
        });
    }

    for message in &args.messages {
        katscan.scan(message);
    }

    if let Err(e) = "forty-two".parse::<i32>() {
        katscan.scan_error(&e);
        katscan.scan_error_with(&e, "Parsing the answer failed");
        katscan.scan_error_with_to("Errors/log", &e, "Parsing the answer failed");
    }

    if let Some(delay) = args.grant_after_ms {
        wait_for_permission(&katscan, poll_interval, max_wait).await;
        if katscan.is_permission_granted() {
            katscan.scan(format!("Storage access granted after {delay} ms"));
        } else {
            warn!(state = ?katscan.permission_state(), "Storage access was not granted");
        }
    }

    info!(
        directory = %katscan.config().file.full_path_to_main_directory(),
        "Demo entries written"
    );
    Ok(())
}
