//! Storage-permission tracking and the grant-poll session.

mod poll;

pub use poll::spawn_poll;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::host::{Host, HostError};

/// Where the storage permission currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    #[default]
    Unknown,
    /// A prompt was shown and the poll is waiting for the answer.
    Requesting,
    /// Terminal: a grant is never revoked for the life of the logger.
    Granted,
    Denied,
    TimedOut,
}

/// How a request session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Granted,
    Denied,
    TimedOut,
    /// The host failed while checking or requesting.
    Failed(HostError),
}

impl SessionOutcome {
    fn state(&self) -> PermissionState {
        match self {
            Self::Granted => PermissionState::Granted,
            Self::Denied | Self::Failed(_) => PermissionState::Denied,
            Self::TimedOut => PermissionState::TimedOut,
        }
    }
}

#[derive(Debug, Default)]
struct Session {
    id: u64,
    state: PermissionState,
    polls: u64,
    task: Option<JoinHandle<()>>,
}

/// Tracks the storage grant and owns at most one request session.
#[derive(Debug, Default)]
pub struct PermissionGate {
    granted: AtomicBool,
    session: Mutex<Session>,
}

impl PermissionGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn state(&self) -> PermissionState {
        self.session().state
    }

    #[must_use]
    pub fn is_requesting(&self) -> bool {
        self.state() == PermissionState::Requesting
    }

    /// Poll ticks elapsed in the current or last session.
    #[must_use]
    pub fn elapsed_polls(&self) -> u64 {
        self.session().polls
    }

    /// Ask the host whether access is granted. A grant is remembered and
    /// ends any running session; a refusal is not cached.
    pub fn check(&self, host: &dyn Host) -> Result<bool, HostError> {
        if self.is_granted() {
            return Ok(true);
        }
        let granted = host.check_write_permission()?;
        if granted {
            self.finish(&SessionOutcome::Granted, true);
        }
        Ok(granted)
    }

    /// Start a session. Returns false when one is already running or access
    /// is already granted, so a second request never starts a second poll.
    #[must_use]
    pub fn begin(&self) -> bool {
        let mut session = self.session();
        match session.state {
            PermissionState::Requesting | PermissionState::Granted => false,
            PermissionState::Unknown | PermissionState::Denied | PermissionState::TimedOut => {
                session.id = session.id.wrapping_add(1);
                session.state = PermissionState::Requesting;
                session.polls = 0;
                debug!("Permission request session started");
                true
            }
        }
    }

    /// Hand the running poll task to the session so an external finish can
    /// cancel it. A task for a session that already ended is aborted.
    pub fn attach(&self, task: JoinHandle<()>) {
        let mut session = self.session();
        if session.state == PermissionState::Requesting {
            session.task = Some(task);
            return;
        }
        drop(session);
        task.abort();
    }

    /// Identifier of the current or last session.
    #[must_use]
    pub fn session_id(&self) -> u64 {
        self.session().id
    }

    /// Count one poll tick and return the total.
    #[must_use]
    pub fn record_poll(&self) -> u64 {
        let mut session = self.session();
        session.polls = session.polls.saturating_add(1);
        session.polls
    }

    /// End the session with `outcome`.
    ///
    /// A grant applies from any state that is not already granted; every
    /// other outcome applies only while a session is running. With `abort`
    /// the poll task is cancelled. Returns whether the outcome was applied.
    pub fn finish(&self, outcome: &SessionOutcome, abort: bool) -> bool {
        let mut session = self.session();
        if !applies(&session, outcome) {
            return false;
        }
        let task = self.close(&mut session, outcome);
        drop(session);
        if let Some(task) = task.filter(|_| abort) {
            task.abort();
        }
        true
    }

    /// [`PermissionGate::finish`] on behalf of session `id`. Outcomes other
    /// than a grant are ignored once a newer session has started.
    pub fn finish_session(&self, id: u64, outcome: &SessionOutcome) -> bool {
        let mut session = self.session();
        let current = session.id == id || outcome.state() == PermissionState::Granted;
        if !current || !applies(&session, outcome) {
            return false;
        }
        drop(self.close(&mut session, outcome));
        true
    }

    /// End session `id` as denied when its poll died before reaching an
    /// outcome. No-op once the session has ended or a newer one started.
    pub fn interrupt(&self, id: u64) {
        let mut session = self.session();
        if session.id != id || session.state != PermissionState::Requesting {
            return;
        }
        session.state = PermissionState::Denied;
        session.task = None;
        debug!(polls = session.polls, "Permission poll stopped before an answer");
    }

    fn close(&self, session: &mut Session, outcome: &SessionOutcome) -> Option<JoinHandle<()>> {
        let next = outcome.state();
        session.state = next;
        if next == PermissionState::Granted {
            self.granted.store(true, Ordering::SeqCst);
        }
        debug!(state = ?next, polls = session.polls, "Permission request session finished");
        session.task.take()
    }

    /// Drop a session that could not be polled, back to `Unknown`.
    pub fn abandon(&self) {
        let mut session = self.session();
        if session.state == PermissionState::Requesting {
            session.state = PermissionState::Unknown;
            session.task = None;
        }
    }
}

fn applies(session: &Session, outcome: &SessionOutcome) -> bool {
    match outcome.state() {
        PermissionState::Granted => session.state != PermissionState::Granted,
        _ => session.state == PermissionState::Requesting,
    }
}
