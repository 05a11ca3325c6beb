use crate::auth::clock::{Clock, SystemClock};
use crate::auth::credentials::{CredentialStore, DuplicateEmail};
use crate::auth::session::{SessionRecord, SessionStore, StoredSession};
use crate::auth::validation::{ValidationReason, validate_login, validate_registration};
use crate::storage::KeyValueStore;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Authentication errors surfaced to the view layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{0}")]
    ValidationFailed(ValidationReason),

    /// Deliberately does not say whether the email or the password was wrong
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    DuplicateEmail,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::ValidationFailed(_) => "validation_failed",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::DuplicateEmail => "duplicate_email",
        }
    }
}

impl From<ValidationReason> for AuthError {
    fn from(reason: ValidationReason) -> Self {
        AuthError::ValidationFailed(reason)
    }
}

impl From<DuplicateEmail> for AuthError {
    fn from(_: DuplicateEmail) -> Self {
        AuthError::DuplicateEmail
    }
}

/// Session state as seen by an expiry check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Active(SessionRecord),
    /// The session for this user just ran out and has been cleared
    Expired { user: String },
}

/// Session lifecycle configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Elapsed time after which a session is expired
    pub session_duration: Duration,
    /// How often the background monitor re-evaluates expiry
    pub check_interval: Duration,
    /// Minimum password length accepted at registration
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_duration: Duration::from_secs(24 * 60 * 60), // 24 hours
            check_interval: Duration::from_secs(60),
            min_password_length: 4,
        }
    }
}

/// Session manager: owns login, registration, logout and expiry.
///
/// It is the only writer of the session record. Each state transition runs
/// under `transition` so the expiry monitor and request handlers never
/// interleave within one read-then-write.
pub struct SessionManager {
    credentials: CredentialStore,
    sessions: SessionStore,
    clock: Arc<dyn Clock>,
    config: AuthConfig,
    transition: Mutex<()>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, AuthConfig::default())
    }

    pub fn with_config(store: Arc<dyn KeyValueStore>, config: AuthConfig) -> Self {
        Self {
            credentials: CredentialStore::new(store.clone()),
            sessions: SessionStore::new(store),
            clock: Arc::new(SystemClock),
            config,
            transition: Mutex::new(()),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Log in an existing user. Returns the (trimmed) email now signed in.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = validate_login(email, password)?;

        let _guard = self.transition.lock().await;
        if !self.credentials.verify(email, password).await {
            counter!("folio_login_failures_total").increment(1);
            debug!("Rejected login for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        self.start_session(email).await;
        counter!("folio_logins_total").increment(1);
        info!("User {} logged in", email);
        Ok(email.to_string())
    }

    /// Register a new user and sign them in
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<String, AuthError> {
        let email =
            validate_registration(email, password, confirm, self.config.min_password_length)?;

        let _guard = self.transition.lock().await;
        self.credentials.register(email, password).await?;

        self.start_session(email).await;
        counter!("folio_registrations_total").increment(1);
        Ok(email.to_string())
    }

    /// End the current session. Returns whether an unexpired one was active.
    ///
    /// Calling this while anonymous is a no-op.
    pub async fn logout(&self) -> bool {
        let _guard = self.transition.lock().await;
        let was_authenticated = matches!(self.resolve().await, SessionStatus::Active(_));
        self.sessions.clear().await;
        if was_authenticated {
            info!("User logged out");
        }
        was_authenticated
    }

    /// Evaluate the session against the configured duration, clearing it if
    /// it has run out or is only partially stored.
    pub async fn check_expiry(&self) -> SessionStatus {
        let _guard = self.transition.lock().await;
        self.resolve().await
    }

    /// Email of the signed-in user, or `None`. A stale session is cleared.
    pub async fn current_user(&self) -> Option<String> {
        self.session().await.map(|record| record.user)
    }

    pub async fn session(&self) -> Option<SessionRecord> {
        match self.check_expiry().await {
            SessionStatus::Active(record) => Some(record),
            SessionStatus::Anonymous | SessionStatus::Expired { .. } => None,
        }
    }

    /// Epoch millis of the current login
    pub async fn login_time(&self) -> Option<u64> {
        self.session().await.map(|record| record.login_time)
    }

    /// Time left before the current session expires
    pub async fn remaining(&self) -> Option<Duration> {
        let record = self.session().await?;
        Some(self.remaining_for(&record))
    }

    /// Time left on `record` as of now
    pub fn remaining_for(&self, record: &SessionRecord) -> Duration {
        record.remaining(self.clock.now_millis(), self.config.session_duration)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session().await.is_some()
    }

    async fn start_session(&self, email: &str) {
        let record = SessionRecord::new(email, self.clock.now_millis());
        self.sessions.write(&record).await;
    }

    /// Caller must hold `transition`
    async fn resolve(&self) -> SessionStatus {
        match self.sessions.read().await {
            StoredSession::Absent => SessionStatus::Anonymous,
            StoredSession::Partial => {
                debug!("Clearing partial session record");
                self.sessions.clear().await;
                SessionStatus::Anonymous
            }
            StoredSession::Present(record) => {
                let now = self.clock.now_millis();
                if record.is_expired(now, self.config.session_duration) {
                    warn!(
                        "Session for {} expired after {} ms",
                        record.user,
                        record.elapsed_millis(now)
                    );
                    self.sessions.clear().await;
                    counter!("folio_sessions_expired_total").increment(1);
                    SessionStatus::Expired { user: record.user }
                } else {
                    SessionStatus::Active(record)
                }
            }
        }
    }
}
