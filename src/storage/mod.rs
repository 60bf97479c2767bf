//! Local key-value storage.
//!
//! # Data Flow
//! ```text
//! startup
//!     → open store (memory or JSON file)
//!     → api client reads the token key once
//! ```
//!
//! # Design Decisions
//! - Read access goes through the `KeyValueStore` trait so callers never
//!   depend on the backing technology
//! - Absent keys are `Ok(None)`, not errors
//! - Failures surface to the caller unchanged

pub mod file;
pub mod memory;

use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::config::StorageConfig;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String key-value storage in the shape of browser local storage.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Open the store described by the configuration.
pub fn open_store(config: &StorageConfig) -> StorageResult<Box<dyn KeyValueStore>> {
    match &config.path {
        Some(path) => {
            tracing::debug!(path = %path, "Opening file-backed local storage");
            Ok(Box::new(JsonFileStore::open(path)?))
        }
        None => {
            tracing::debug!("Using in-memory local storage");
            Ok(Box::new(MemoryStore::new()))
        }
    }
}
