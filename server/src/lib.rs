//! Folio Server Library
//!
//! This module exports the authentication core, storage backends and HTTP
//! routes for use in integration tests and the `folio` binary.

pub mod auth;
pub mod config;
pub mod contact;
pub mod server;
pub mod storage;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use auth::{AuthConfig, AuthError, ExpiryMonitor, SessionManager, SessionStatus};
pub use server::{AppState, build_router};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
