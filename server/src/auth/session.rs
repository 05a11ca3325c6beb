//! Session record persistence
//!
//! The record is split across two keys ([`SESSION_USER_KEY`] and
//! [`SESSION_TIME_KEY`]). Both present means a session exists; anything else
//! is treated as no session.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::keys::{SESSION_TIME_KEY, SESSION_USER_KEY};
use crate::storage::KeyValueStore;

/// The persisted login of the current user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub user: String,
    /// Epoch milliseconds
    pub login_time: u64,
}

impl SessionRecord {
    pub fn new(user: impl Into<String>, login_time: u64) -> Self {
        Self {
            user: user.into(),
            login_time,
        }
    }

    /// Milliseconds since login. A login time in the future counts as zero.
    pub fn elapsed_millis(&self, now: u64) -> u64 {
        now.saturating_sub(self.login_time)
    }

    /// Expired once strictly more than `duration` has elapsed
    pub fn is_expired(&self, now: u64, duration: Duration) -> bool {
        self.elapsed_millis(now) > duration.as_millis() as u64
    }

    pub fn remaining(&self, now: u64, duration: Duration) -> Duration {
        let total = duration.as_millis() as u64;
        Duration::from_millis(total.saturating_sub(self.elapsed_millis(now)))
    }
}

/// Outcome of reading the session keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredSession {
    Present(SessionRecord),
    Absent,
    /// One key without the other, or an unusable timestamp
    Partial,
}

/// Reads and writes the session keys. Storage failures are logged and
/// degrade to "no session".
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn read(&self) -> StoredSession {
        let user = self.read_key(SESSION_USER_KEY).await;
        let time = self.read_key(SESSION_TIME_KEY).await;

        match (user, time) {
            (None, None) => StoredSession::Absent,
            (Some(user), Some(time)) if !user.is_empty() => match time.trim().parse::<u64>() {
                Ok(login_time) if login_time > 0 => {
                    StoredSession::Present(SessionRecord { user, login_time })
                }
                _ => {
                    warn!("Session login time {:?} is not usable", time);
                    StoredSession::Partial
                }
            },
            _ => StoredSession::Partial,
        }
    }

    pub async fn write(&self, record: &SessionRecord) {
        if let Err(e) = self.store.set(SESSION_USER_KEY, &record.user).await {
            error!("Failed to write session user: {}", e);
            return;
        }
        if let Err(e) = self
            .store
            .set(SESSION_TIME_KEY, &record.login_time.to_string())
            .await
        {
            error!("Failed to write session time: {}", e);
        }
        debug!("Session written for {}", record.user);
    }

    pub async fn clear(&self) {
        for key in [SESSION_USER_KEY, SESSION_TIME_KEY] {
            if let Err(e) = self.store.remove(key).await {
                error!("Failed to clear session key {}: {}", key, e);
            }
        }
    }

    async fn read_key(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to read session key {}: {}", key, e);
                None
            }
        }
    }
}
