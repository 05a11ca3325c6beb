use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::auth::{AuthConfig, SessionManager};
use crate::storage::{KeyValueStore, MemoryStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session_manager: Arc<SessionManager>,
    started_at: Instant,
}

impl AppState {
    /// State over a fresh in-memory store with default settings
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), AuthConfig::default())
    }

    pub fn with_store(store: Arc<dyn KeyValueStore>, config: AuthConfig) -> Self {
        Self::with_session_manager(Arc::new(SessionManager::with_config(store, config)))
    }

    pub fn with_session_manager(session_manager: Arc<SessionManager>) -> Self {
        Self {
            session_manager,
            started_at: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
