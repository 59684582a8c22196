//! Public entry points: setup, the scan family and the permission hooks.

mod entry;
mod pipeline;

use std::error::Error;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;
use tokio::runtime::Handle;
use tracing::debug;

use crate::config::{main_directory_for, Config};
use crate::console::{Console, PlatformConsole};
use crate::error::ScanError;
use crate::host::{Host, DEFAULT_PACKAGE_NAME};
use crate::permission::{spawn_poll, PermissionGate, PermissionState, SessionOutcome};
use crate::format::Content;
use crate::reporter::{
    warning_text, Reporter, DISPATCH_PANICKED, REQUEST_FAILED, WORKER_FAILED,
};
use crate::state::{LifecycleState, Warning};
use entry::Entry;

/// Name given to entry worker threads.
const WORKER_THREAD_NAME: &str = "katscan-entry";

/// Handle to one logger.
///
/// Clones share the same configuration, lifecycle state and permission
/// session. None of the scan methods ever fail or panic: internal problems
/// go to the console reporter and are swallowed.
#[derive(Clone)]
pub struct KatScan {
    inner: Arc<Inner>,
}

struct Inner {
    config: RwLock<Config>,
    state: LifecycleState,
    permission: Arc<PermissionGate>,
    console: Arc<dyn Console>,
}

impl Default for KatScan {
    fn default() -> Self {
        Self::new()
    }
}

impl KatScan {
    /// A logger with default configuration that reports to the platform log.
    #[must_use]
    pub fn new() -> Self {
        Self::with_console(Arc::new(PlatformConsole))
    }

    #[must_use]
    pub fn with_console(console: Arc<dyn Console>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config: RwLock::new(Config::default()),
                state: LifecycleState::new(),
                permission: Arc::new(PermissionGate::new()),
                console,
            }),
        }
    }

    /// Snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> Config {
        self.inner.config()
    }

    /// Replace the configuration. Applies from the next scan call.
    pub fn set_config(&self, config: Config) {
        self.update_config(|current| *current = config);
    }

    /// Change the configuration in place.
    pub fn update_config<F: FnOnce(&mut Config)>(&self, update: F) {
        let mut config = self
            .inner
            .config
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        update(&mut config);
    }

    /// One-time initialization against the host.
    ///
    /// The first call records the build type and the package-based main
    /// directory and asks for storage access. Later calls only retry the
    /// permission request while access is not granted. Returns whether
    /// setup has completed, not whether access was granted.
    pub fn setup(&self, host: Arc<dyn Host>) -> bool {
        self.guarded(|| self.run_setup(&host, None));
        self.inner.state.is_setup_complete()
    }

    /// [`KatScan::setup`] that also turns the dated subdirectory on or off.
    /// The flag is only applied by the call that completes setup.
    pub fn setup_with_daily_subdirectory(&self, host: Arc<dyn Host>, daily: bool) -> bool {
        self.guarded(|| self.run_setup(&host, Some(daily)));
        self.inner.state.is_setup_complete()
    }

    fn run_setup(&self, host: &Arc<dyn Host>, daily: Option<bool>) {
        let state = &self.inner.state;
        if state.is_setup_complete() {
            if !self.inner.permission.is_granted() {
                self.inner.request_permission(host);
            }
            return;
        }

        state.set_debug_build(host.is_debug_build());
        self.inner.request_permission(host);

        let package = host
            .package_name()
            .ok()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_PACKAGE_NAME.to_string());
        let main_directory = main_directory_for(&package);
        debug!(%main_directory, debug_build = state.is_debug_build(), "Setup complete");
        self.update_config(|config| {
            config.file.main_directory_name = main_directory;
            if let Some(daily) = daily {
                config.file.daily_subdirectory = daily;
            }
        });
        state.mark_setup_complete();
    }

    /// Turn logging on regardless of build type. With a host, storage access
    /// is requested as well.
    pub fn force_enable(&self, enable: bool, host: Option<Arc<dyn Host>>) {
        self.guarded(|| {
            self.inner.state.set_forced(enable);
            if let Some(host) = host {
                self.inner.request_permission(&host);
            }
        });
    }

    /// Feed the answer from the host's own permission callback. Ends a
    /// running poll immediately.
    pub fn notify_permission_result(&self, granted: bool) {
        let outcome = if granted {
            SessionOutcome::Granted
        } else {
            SessionOutcome::Denied
        };
        if self.inner.permission.finish(&outcome, true) {
            debug!(granted, "Permission result received from host");
        }
    }

    /// Write `message` to the default file.
    pub fn scan<M: Display>(&self, message: M) {
        self.dispatch(Content::Message(&message), None);
    }

    /// Write the full trace of `error` to the default file.
    pub fn scan_error(&self, error: &dyn Error) {
        self.dispatch(Content::Error(error), None);
    }

    /// Write `message` followed by the trace of `error` to the default file.
    pub fn scan_error_with<M: Display>(&self, error: &dyn Error, message: M) {
        self.dispatch(Content::MessageAndError(&message, error), None);
    }

    /// Write `message` to `file`, relative to the main directory and without
    /// extension (`"Errors/log"`).
    pub fn scan_to<M: Display>(&self, file: &str, message: M) {
        self.dispatch(Content::Message(&message), Some(file));
    }

    pub fn scan_error_to(&self, file: &str, error: &dyn Error) {
        self.dispatch(Content::Error(error), Some(file));
    }

    pub fn scan_error_with_to<M: Display>(&self, file: &str, error: &dyn Error, message: M) {
        self.dispatch(Content::MessageAndError(&message, error), Some(file));
    }

    fn dispatch(&self, content: Content<'_>, file: Option<&str>) {
        self.guarded(|| {
            let config = self.inner.config();
            let entry = Entry::render(content, file);
            if config.worker_per_call {
                self.spawn_worker(entry, config);
            } else {
                self.inner.write_entry(&entry, &config);
            }
        });
    }

    /// Hand the entry to a fire-and-forget worker: the blocking pool when a
    /// tokio runtime is current, a fresh thread otherwise.
    fn spawn_worker(&self, entry: Entry, config: Config) {
        let inner = Arc::clone(&self.inner);
        if let Ok(runtime) = Handle::try_current() {
            drop(runtime.spawn_blocking(move || inner.write_guarded(&entry, &config)));
            return;
        }
        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || inner.write_guarded(&entry, &config));
        if let Err(e) = spawned {
            let config = self.inner.config();
            self.inner
                .reporter(&config)
                .report(Some(&ScanError::Spawn(e)), Some(WORKER_FAILED));
        }
    }

    fn guarded<F: FnOnce()>(&self, f: F) {
        if panic::catch_unwind(AssertUnwindSafe(f)).is_err() {
            self.inner.report_panic();
        }
    }

    #[must_use]
    pub fn is_setup_complete(&self) -> bool {
        self.inner.state.is_setup_complete()
    }

    #[must_use]
    pub fn is_debug_build(&self) -> bool {
        self.inner.state.is_debug_build()
    }

    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.inner.state.is_forced()
    }

    /// Debug build or forced on. Says nothing about storage access.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.state.is_enabled()
    }

    #[must_use]
    pub fn permission_state(&self) -> PermissionState {
        self.inner.permission.state()
    }

    #[must_use]
    pub fn is_permission_granted(&self) -> bool {
        self.inner.permission.is_granted()
    }

    /// Poll ticks elapsed in the current or last permission session.
    #[must_use]
    pub fn elapsed_permission_polls(&self) -> u64 {
        self.inner.permission.elapsed_polls()
    }

    /// Whether the one-time diagnostic for `warning` has already fired.
    #[must_use]
    pub fn warning_shown(&self, warning: Warning) -> bool {
        self.inner.state.was_shown(warning)
    }
}

impl Inner {
    fn config(&self) -> Config {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn reporter<'a>(&'a self, config: &'a Config) -> Reporter<'a> {
        Reporter::new(self.console.as_ref(), config, self.state.is_debug_build())
    }

    /// Show the diagnostic for `warning` if it is visible and has not been
    /// shown before. A hidden warning is not consumed.
    fn warn(&self, config: &Config, warning: Warning, error: Option<&dyn Error>) {
        if !warning.is_visible(&config.internal_errors) || !self.state.first_time(warning) {
            return;
        }
        self.reporter(config).report(error, Some(warning_text(warning)));
    }

    fn report_panic(&self) {
        let config = self.config();
        self.reporter(&config).message(DISPATCH_PANICKED);
    }

    fn write_guarded(&self, entry: &Entry, config: &Config) {
        if panic::catch_unwind(AssertUnwindSafe(|| self.write_entry(entry, config))).is_err() {
            self.report_panic();
        }
    }

    /// Ask for storage access unless it is already granted.
    ///
    /// Only hosts that prompt at runtime are asked, and only while logging
    /// is enabled and entries go to files. At most one poll session runs.
    fn request_permission(self: &Arc<Self>, host: &Arc<dyn Host>) {
        let config = self.config();
        match self.permission.check(host.as_ref()) {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => self.warn(&config, Warning::PermissionCheckFailed, Some(&e)),
        }
        if !host.requires_runtime_permission()
            || !self.state.is_enabled()
            || !config.file.routes_to_file()
        {
            return;
        }
        if !host.is_interactive() {
            self.warn(&config, Warning::NonInteractiveHost, None);
            return;
        }
        if !self.permission.begin() {
            return;
        }

        if let Some(scheduler) = host.scheduler() {
            let inner = Arc::clone(self);
            let task = spawn_poll(
                &scheduler,
                Arc::clone(&self.permission),
                Arc::clone(host),
                config.permission_request.poll_interval(),
                config.permission_request.max_wait(),
                move |outcome| inner.session_finished(&outcome),
            );
            self.permission.attach(task);
        } else {
            self.permission.abandon();
            self.warn(&config, Warning::PollUnavailable, None);
        }

        if let Err(e) = host.request_write_permission(config.permission_request.request_code) {
            self.permission
                .finish(&SessionOutcome::Failed(e.clone()), true);
            self.reporter(&config).report(Some(&e), Some(REQUEST_FAILED));
        }
    }

    fn session_finished(&self, outcome: &SessionOutcome) {
        let config = self.config();
        match outcome {
            SessionOutcome::Granted => debug!("Storage permission granted"),
            SessionOutcome::Denied => debug!("Storage permission denied"),
            SessionOutcome::TimedOut => self.warn(&config, Warning::PermissionTimedOut, None),
            SessionOutcome::Failed(e) => {
                self.warn(&config, Warning::PermissionCheckFailed, Some(e));
            }
        }
    }
}
