//! Background session expiry monitor
//!
//! `current_user()` already expires sessions lazily; the monitor exists so
//! the view layer learns about an expiry without having to ask. Detection may
//! lag by up to one check interval.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::manager::{SessionManager, SessionStatus};

/// Receives expiry notifications (the view layer)
pub trait SessionNotifier: Send + Sync {
    /// Called once when a session is found expired and has been cleared.
    /// Distinct from a voluntary logout.
    fn session_expired(&self, user: &str);
}

impl<F> SessionNotifier for F
where
    F: Fn(&str) + Send + Sync,
{
    fn session_expired(&self, user: &str) {
        self(user)
    }
}

/// Notifier that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl SessionNotifier for LogNotifier {
    fn session_expired(&self, user: &str) {
        warn!("Session for {} expired, please log in again", user);
    }
}

/// Handle to a running monitor. Dropping it stops the monitor.
#[derive(Debug)]
pub struct MonitorHandle {
    task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Stop the periodic check. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Session expiry monitor stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Periodic expiry check over a shared session manager
pub struct ExpiryMonitor;

impl ExpiryMonitor {
    /// Spawn the monitor on the current tokio runtime. The first check runs
    /// one `interval` after start.
    pub fn start(
        manager: Arc<SessionManager>,
        interval: Duration,
        notifier: Arc<dyn SessionNotifier>,
    ) -> MonitorHandle {
        info!("Starting session expiry monitor (every {:?})", interval);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let SessionStatus::Expired { user } = manager.check_expiry().await {
                    notifier.session_expired(&user);
                }
            }
        });

        MonitorHandle { task: Some(task) }
    }
}
