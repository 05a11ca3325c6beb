//! Credential store: email -> plaintext password map
//!
//! The whole map is persisted as one JSON object under [`USERS_KEY`]. Reads
//! fail soft: a missing, unreadable or corrupt blob loads as an empty map.
//! Writes that fail are logged and dropped.

use metrics::counter;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::keys::USERS_KEY;
use crate::storage::KeyValueStore;

/// Persisted user collection (email -> password)
pub type UserMap = HashMap<String, String>;

/// Registration attempted for an email that already exists
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Email already registered: {0}")]
pub struct DuplicateEmail(pub String);

/// Credential store over a shared key-value namespace
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the persisted user map. Never fails: errors yield an empty map.
    pub async fn load(&self) -> UserMap {
        let raw = match self.store.get(USERS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return UserMap::new(),
            Err(e) => {
                error!("Failed to read user store: {}", e);
                counter!("folio_storage_errors_total", "op" => "load_users").increment(1);
                return UserMap::new();
            }
        };

        match serde_json::from_str::<UserMap>(&raw) {
            Ok(users) => users,
            Err(e) => {
                warn!("User store is corrupt, treating as empty: {}", e);
                UserMap::new()
            }
        }
    }

    /// Persist the full user map, overwriting the previous value
    pub async fn save(&self, users: &UserMap) {
        let raw = match serde_json::to_string(users) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to serialize user store: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(USERS_KEY, &raw).await {
            error!("Failed to save user store: {}", e);
            counter!("folio_storage_errors_total", "op" => "save_users").increment(1);
        } else {
            debug!("Saved user store ({} users)", users.len());
        }
    }

    /// Register a new user. Email match is exact and case-sensitive.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), DuplicateEmail> {
        let mut users = self.load().await;
        if users.contains_key(email) {
            return Err(DuplicateEmail(email.to_string()));
        }

        users.insert(email.to_string(), password.to_string());
        self.save(&users).await;
        info!("Registered user {}", email);
        Ok(())
    }

    /// True iff the stored password for `email` equals `password` exactly
    pub async fn verify(&self, email: &str, password: &str) -> bool {
        self.load()
            .await
            .get(email)
            .is_some_and(|stored| stored == password)
    }

    pub async fn contains(&self, email: &str) -> bool {
        self.load().await.contains_key(email)
    }

    pub async fn user_count(&self) -> usize {
        self.load().await.len()
    }
}
