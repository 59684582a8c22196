use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use crate::config::InternalErrorSettings;

/// Conditions reported to the developer at most once per logger lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Warning {
    SetupIncomplete,
    PermissionDenied,
    InvalidPath,
    DatePattern,
    RequestInProgress,
    NonInteractiveHost,
    PollUnavailable,
    PermissionCheckFailed,
    PermissionTimedOut,
}

impl Warning {
    const fn bit(self) -> u32 {
        match 1_u32.checked_shl(self as u32) {
            Some(bit) => bit,
            None => 0,
        }
    }

    /// Whether the visibility settings allow this warning to be shown.
    #[must_use]
    pub fn is_visible(self, settings: &InternalErrorSettings) -> bool {
        match self {
            Self::SetupIncomplete => settings.show_setup_warning,
            Self::PermissionDenied => settings.show_permission_denied_warning,
            Self::InvalidPath | Self::DatePattern => settings.show_invalid_path_warning,
            Self::RequestInProgress => settings.show_request_in_progress_warning,
            Self::NonInteractiveHost | Self::PollUnavailable | Self::PermissionTimedOut => {
                settings.show_permission_request_warnings
            }
            Self::PermissionCheckFailed => settings.show_permission_check_errors,
        }
    }
}

/// Process-lifetime facts about the logger.
///
/// All fields are atomics so scan workers and the permission poll can read
/// and update them without a lock.
#[derive(Debug, Default)]
pub struct LifecycleState {
    setup_complete: AtomicBool,
    debug_build: AtomicBool,
    forced: AtomicBool,
    entry_count: AtomicU64,
    shown: AtomicU32,
}

impl LifecycleState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_setup_complete(&self) -> bool {
        self.setup_complete.load(Ordering::SeqCst)
    }

    pub fn mark_setup_complete(&self) {
        self.setup_complete.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_debug_build(&self) -> bool {
        self.debug_build.load(Ordering::SeqCst)
    }

    pub fn set_debug_build(&self, debug_build: bool) {
        self.debug_build.store(debug_build, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.forced.load(Ordering::SeqCst)
    }

    pub fn set_forced(&self, forced: bool) {
        self.forced.store(forced, Ordering::SeqCst);
    }

    /// Logging is enabled for debug builds or when forced on, regardless of
    /// whether storage access was granted.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.is_debug_build() || self.is_forced()
    }

    /// Advance the entry counter and return the new value. The first entry
    /// is number 1.
    pub fn next_entry_number(&self) -> u64 {
        self.entry_count
            .fetch_add(1, Ordering::SeqCst)
            .saturating_add(1)
    }

    /// Claim a one-time warning. Returns true for exactly one caller per
    /// warning, even when several threads race on the first trigger.
    #[must_use]
    pub fn first_time(&self, warning: Warning) -> bool {
        let bit = warning.bit();
        (self.shown.fetch_or(bit, Ordering::SeqCst) & bit) == 0
    }

    #[must_use]
    pub fn was_shown(&self, warning: Warning) -> bool {
        (self.shown.load(Ordering::SeqCst) & warning.bit()) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_defaults() {
        let state = LifecycleState::new();
        assert!(!state.is_setup_complete());
        assert!(!state.is_debug_build());
        assert!(!state.is_enabled());
        assert_eq!(state.next_entry_number(), 1);
    }

    #[test]
    fn test_enabled_by_debug_or_force() {
        let state = LifecycleState::new();
        state.set_forced(true);
        assert!(state.is_enabled());
        state.set_forced(false);
        state.set_debug_build(true);
        assert!(state.is_enabled());
    }

    #[test]
    fn test_entry_numbers_start_at_one() {
        let state = LifecycleState::new();
        assert_eq!(state.next_entry_number(), 1);
        assert_eq!(state.next_entry_number(), 2);
        assert_eq!(state.next_entry_number(), 3);
    }

    #[test]
    fn test_first_time_is_once_per_warning() {
        let state = LifecycleState::new();
        assert!(state.first_time(Warning::PermissionDenied));
        assert!(!state.first_time(Warning::PermissionDenied));
        assert!(!state.first_time(Warning::PermissionDenied));
        assert!(state.first_time(Warning::InvalidPath));
        assert!(state.was_shown(Warning::PermissionDenied));
        assert!(!state.was_shown(Warning::SetupIncomplete));
    }

    #[test]
    fn test_first_time_under_contention() {
        let state = Arc::new(LifecycleState::new());
        let winners = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let state = Arc::clone(&state);
                let winners = Arc::clone(&winners);
                thread::spawn(move || {
                    if state.first_time(Warning::SetupIncomplete) {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_visibility_toggles() {
        let mut settings = InternalErrorSettings::default();
        assert!(Warning::DatePattern.is_visible(&settings));
        settings.show_invalid_path_warning = false;
        assert!(!Warning::DatePattern.is_visible(&settings));
        assert!(!Warning::InvalidPath.is_visible(&settings));
        settings.show_permission_request_warnings = false;
        assert!(!Warning::PermissionTimedOut.is_visible(&settings));
        assert!(Warning::PermissionCheckFailed.is_visible(&settings));
    }
}
