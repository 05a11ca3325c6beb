//! Authentication module for the portfolio overlay
//!
//! This module provides:
//! - `CredentialStore`: plaintext email -> password map in the key-value store
//! - `SessionManager`: login/register/logout state machine with 24h expiry
//! - `ExpiryMonitor`: cancellable background expiry check
//! - HTTP routes exposing the session manager to the page
//!
//! Passwords are stored and compared in plaintext. This is demo behavior and
//! must not be reused for real credentials.

pub mod clock;
pub mod credentials;
pub mod manager;
pub mod monitor;
pub mod routes;
pub mod session;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::{CredentialStore, DuplicateEmail, UserMap};
pub use manager::{AuthConfig, AuthError, SessionManager, SessionStatus};
pub use monitor::{ExpiryMonitor, LogNotifier, MonitorHandle, SessionNotifier};
pub use routes::auth_routes;
pub use session::{SessionRecord, SessionStore, StoredSession};
pub use validation::ValidationReason;

/// Persisted key names, schema version 1
pub mod keys {
    /// JSON object of email -> password
    pub const USERS_KEY: &str = "auth.v1.users";
    /// Email of the signed-in user
    pub const SESSION_USER_KEY: &str = "auth.v1.session.user";
    /// Login time as decimal epoch milliseconds
    pub const SESSION_TIME_KEY: &str = "auth.v1.session.time";
}
