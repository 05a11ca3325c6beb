//! Server configuration
//!
//! Configuration is loaded from environment variables on top of defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::AuthConfig;

/// Main server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Session configuration
    pub session: SessionConfig,
}

/// Where the key-value namespace lives
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// JSON file holding users and the session. `None` keeps everything in memory.
    pub path: Option<PathBuf>,
}

/// Session-related configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session lifetime after login
    pub duration: Duration,
    /// Background expiry check period
    pub check_interval: Duration,
    /// Minimum password length at registration
    pub min_password_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            storage: StorageConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(24 * 60 * 60), // 24 hours
            check_interval: Duration::from_secs(60),
            min_password_length: 4,
        }
    }
}

impl From<&SessionConfig> for AuthConfig {
    fn from(session: &SessionConfig) -> Self {
        AuthConfig {
            session_duration: session.duration,
            check_interval: session.check_interval,
            min_password_length: session.min_password_length,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // Server config
        if let Some(host) = lookup("HOST")
            && !host.is_empty()
        {
            config.host = host;
        }
        if let Some(port) = lookup("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }

        // Storage config
        if let Some(path) = lookup("FOLIO_STORE_PATH")
            && !path.is_empty()
        {
            config.storage.path = Some(PathBuf::from(path));
        }

        // Session config
        if let Some(val) = lookup("SESSION_DURATION_HOURS")
            && let Ok(hours) = val.parse::<u64>()
            && hours > 0
        {
            config.session.duration = Duration::from_secs(hours * 60 * 60);
        }
        if let Some(val) = lookup("SESSION_CHECK_INTERVAL_SECS")
            && let Ok(secs) = val.parse::<u64>()
            && secs > 0
        {
            config.session.check_interval = Duration::from_secs(secs);
        }
        if let Some(val) = lookup("MIN_PASSWORD_LENGTH")
            && let Ok(len) = val.parse()
        {
            config.session.min_password_length = len;
        }

        config
    }

    pub fn auth(&self) -> AuthConfig {
        AuthConfig::from(&self.session)
    }
}
