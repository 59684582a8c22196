//! The seam between the logger and the host operating system.
//!
//! Everything the logger needs to know about the running application
//! (build type, package identity, storage permission) comes through
//! [`Host`]. The permission prompt and the file system stay black boxes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use thiserror::Error;
use tokio::runtime::Handle;

/// Package name used when the host cannot report its own.
pub const DEFAULT_PACKAGE_NAME: &str = "katscan";

/// Error raised by a host capability call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Host call failed: {message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    #[must_use]
    pub fn new<M: Into<String>>(message: M) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Capabilities the logger borrows from the host application.
pub trait Host: Send + Sync {
    /// Whether the host application was built in debug mode.
    fn is_debug_build(&self) -> bool;

    /// Package/namespace identity of the host application.
    fn package_name(&self) -> Result<String, HostError>;

    /// True when the OS grants storage access at runtime through a prompt
    /// rather than at install time.
    fn requires_runtime_permission(&self) -> bool;

    /// True when the handle belongs to a foreground, interactive context able
    /// to show a permission prompt.
    fn is_interactive(&self) -> bool;

    /// Current state of the storage write permission.
    fn check_write_permission(&self) -> Result<bool, HostError>;

    /// Show the host's permission prompt. The answer is not returned; it is
    /// picked up by polling [`Host::check_write_permission`].
    fn request_write_permission(&self, request_code: i32) -> Result<(), HostError>;

    /// Facility for repeating deferred callbacks (the permission poll).
    fn scheduler(&self) -> Option<Handle> {
        Handle::try_current().ok()
    }
}

/// A host with fixed answers.
///
/// Suits desktop processes where storage access is never prompted for, and
/// lets tests drive the permission flow by flipping the grant.
#[derive(Debug)]
pub struct StaticHost {
    debug_build: bool,
    package_name: Option<String>,
    runtime_permission: bool,
    interactive: bool,
    granted: AtomicBool,
    fail_checks: AtomicBool,
    fail_requests: AtomicBool,
    prompts: AtomicUsize,
}

impl StaticHost {
    /// A debug-build host with storage access already granted.
    #[must_use]
    pub fn granted() -> Self {
        Self {
            debug_build: true,
            package_name: None,
            runtime_permission: false,
            interactive: true,
            granted: AtomicBool::new(true),
            fail_checks: AtomicBool::new(false),
            fail_requests: AtomicBool::new(false),
            prompts: AtomicUsize::new(0),
        }
    }

    /// A debug-build host that must prompt for storage access and has not
    /// been granted it yet.
    #[must_use]
    pub fn prompting() -> Self {
        Self {
            runtime_permission: true,
            granted: AtomicBool::new(false),
            ..Self::granted()
        }
    }

    #[must_use]
    pub fn with_debug_build(mut self, debug_build: bool) -> Self {
        self.debug_build = debug_build;
        self
    }

    #[must_use]
    pub fn with_package_name<S: Into<String>>(mut self, name: S) -> Self {
        self.package_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Grant or revoke storage access, as the user would in the prompt.
    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    /// Make permission checks fail with a host error.
    pub fn set_failing_checks(&self, failing: bool) {
        self.fail_checks.store(failing, Ordering::SeqCst);
    }

    /// Make the permission prompt fail with a host error.
    pub fn set_failing_requests(&self, failing: bool) {
        self.fail_requests.store(failing, Ordering::SeqCst);
    }

    /// How many permission prompts were shown.
    #[must_use]
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl Host for StaticHost {
    fn is_debug_build(&self) -> bool {
        self.debug_build
    }

    fn package_name(&self) -> Result<String, HostError> {
        self.package_name
            .clone()
            .ok_or_else(|| HostError::new("package name unavailable"))
    }

    fn requires_runtime_permission(&self) -> bool {
        self.runtime_permission
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn check_write_permission(&self) -> Result<bool, HostError> {
        if self.fail_checks.load(Ordering::SeqCst) {
            return Err(HostError::new("permission service unavailable"));
        }
        Ok(self.granted.load(Ordering::SeqCst))
    }

    fn request_write_permission(&self, _request_code: i32) -> Result<(), HostError> {
        if self.fail_requests.load(Ordering::SeqCst) {
            return Err(HostError::new("permission prompt unavailable"));
        }
        self.prompts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
