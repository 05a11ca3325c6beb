//! Key-value storage module
//!
//! This module provides:
//! - `KeyValueStore` trait for abstracting the persisted string namespace
//! - `MemoryStore` for ephemeral runs and tests
//! - `FileStore` for persisting the whole namespace as one JSON file

mod file;
mod memory;
mod service;
mod types;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use service::KeyValueStore;
pub use types::StorageError;
