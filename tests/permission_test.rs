#![allow(clippy::indexing_slicing)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::{create_test_dir, granted_host, logger_in, main_dir, prompting_host, read_lines};
use katscan::{Host, PermissionState, Warning};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_grant_observed_by_poll() {
    let temp_dir = create_test_dir();
    let (katscan, _console) = logger_in(temp_dir.path());
    let host = prompting_host();

    assert!(katscan.setup(host.clone()));
    assert_eq!(katscan.permission_state(), PermissionState::Requesting);

    tokio::time::sleep(Duration::from_millis(4500)).await;
    assert_eq!(katscan.elapsed_permission_polls(), 4);

    host.set_granted(true);
    tokio::time::sleep(Duration::from_millis(1000)).await;

    assert_eq!(katscan.permission_state(), PermissionState::Granted);
    katscan.scan("after grant");
    assert_eq!(
        read_lines(&main_dir(temp_dir.path()).join("KatScan_log.txt")).len(),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn test_request_path_is_idempotent() {
    let temp_dir = create_test_dir();
    let (katscan, _console) = logger_in(temp_dir.path());
    let host = prompting_host();
    let dyn_host: Arc<dyn Host> = host.clone();

    katscan.setup(Arc::clone(&dyn_host));
    katscan.setup(Arc::clone(&dyn_host));
    katscan.force_enable(true, Some(dyn_host));

    assert_eq!(host.prompt_count(), 1);
    tokio::time::sleep(Duration::from_millis(2500)).await;
    // One timer: two ticks, not six
    assert_eq!(katscan.elapsed_permission_polls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_reported_once() {
    let temp_dir = create_test_dir();
    let (katscan, console) = logger_in(temp_dir.path());
    katscan.update_config(|config| {
        config.permission_request.poll_interval_ms = 250;
        config.permission_request.max_wait_ms = 1000;
    });

    katscan.setup(prompting_host());
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(katscan.permission_state(), PermissionState::TimedOut);
    assert_eq!(katscan.elapsed_permission_polls(), 4);
    assert!(katscan.warning_shown(Warning::PermissionTimedOut));
    assert_eq!(console.count_containing("timed out"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_external_notification_short_circuits_poll() {
    let temp_dir = create_test_dir();
    let (katscan, _console) = logger_in(temp_dir.path());

    katscan.setup(prompting_host());
    katscan.notify_permission_result(true);
    tokio::time::sleep(Duration::from_secs(120)).await;

    assert!(katscan.is_permission_granted());
    assert_eq!(katscan.elapsed_permission_polls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_granted_host_never_prompts() {
    let temp_dir = create_test_dir();
    let (katscan, _console) = logger_in(temp_dir.path());
    let host = granted_host();

    katscan.setup(host.clone());

    assert_eq!(host.prompt_count(), 0);
    assert_eq!(katscan.permission_state(), PermissionState::Granted);
}

#[test]
fn test_runtime_shutdown_mid_poll_allows_new_request() {
    let temp_dir = create_test_dir();
    let (katscan, console) = logger_in(temp_dir.path());
    let host = prompting_host();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    assert!(runtime.block_on(async { katscan.setup(host.clone()) }));
    assert_eq!(katscan.permission_state(), PermissionState::Requesting);
    drop(runtime);
    assert_eq!(katscan.permission_state(), PermissionState::Denied);

    // No runtime now: the prompt is shown again and the poll is skipped
    katscan.setup(host.clone());
    assert_eq!(host.prompt_count(), 2);
    assert_eq!(katscan.permission_state(), PermissionState::Unknown);
    assert!(katscan.warning_shown(Warning::PollUnavailable));

    katscan.scan("after restart");
    assert!(!katscan.warning_shown(Warning::RequestInProgress));
    assert_eq!(console.count_containing("after restart"), 1);
}
