use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use super::{PermissionGate, SessionOutcome};
use crate::host::{Host, HostError};

/// Spawn the grant poll on `scheduler`.
///
/// Every `interval` the host is asked again. The session ends on a grant, on
/// a host error, or once `polls * interval` reaches `max_wait`. `on_finish`
/// runs only when this task is the one that ended the session. If the task
/// is dropped or unwinds first (its runtime shut down), the session ends as
/// denied so a later request can start a new one.
pub fn spawn_poll<F>(
    scheduler: &Handle,
    gate: Arc<PermissionGate>,
    host: Arc<dyn Host>,
    interval: Duration,
    max_wait: Duration,
    on_finish: F,
) -> JoinHandle<()>
where
    F: FnOnce(SessionOutcome) + Send + 'static,
{
    let guard = PollGuard {
        session: gate.session_id(),
        gate,
    };
    scheduler.spawn(async move {
        let outcome = wait_for_grant(&guard.gate, host.as_ref(), interval, max_wait).await;
        if guard.gate.finish_session(guard.session, &outcome) {
            on_finish(outcome);
        }
    })
}

/// Owned by the poll future; ends its session if the future never finishes.
struct PollGuard {
    gate: Arc<PermissionGate>,
    session: u64,
}

impl Drop for PollGuard {
    fn drop(&mut self) {
        self.gate.interrupt(self.session);
    }
}

async fn wait_for_grant(
    gate: &PermissionGate,
    host: &dyn Host,
    interval: Duration,
    max_wait: Duration,
) -> SessionOutcome {
    loop {
        tokio::time::sleep(interval).await;
        match check(host) {
            Ok(true) => return SessionOutcome::Granted,
            Ok(false) => {
                let polls = gate.record_poll();
                debug!(polls, "Storage permission not granted yet");
                if timed_out(interval, polls, max_wait) {
                    return SessionOutcome::TimedOut;
                }
            }
            Err(e) => return SessionOutcome::Failed(e),
        }
    }
}

fn check(host: &dyn Host) -> Result<bool, HostError> {
    panic::catch_unwind(AssertUnwindSafe(|| host.check_write_permission()))
        .unwrap_or_else(|_| Err(HostError::new("permission check panicked")))
}

fn timed_out(interval: Duration, polls: u64, max_wait: Duration) -> bool {
    interval.as_millis().saturating_mul(u128::from(polls)) >= max_wait.as_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_out_boundary() {
        let second = Duration::from_millis(1000);
        let minute = Duration::from_millis(60_000);
        assert!(!timed_out(second, 59, minute));
        assert!(timed_out(second, 60, minute));
        assert!(timed_out(second, 61, minute));
    }

    #[test]
    fn test_timed_out_uneven_interval() {
        let interval = Duration::from_millis(700);
        let max_wait = Duration::from_millis(2000);
        assert!(!timed_out(interval, 2, max_wait));
        assert!(timed_out(interval, 3, max_wait));
    }
}
