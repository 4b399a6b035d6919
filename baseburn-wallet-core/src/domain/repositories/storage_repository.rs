//! Storage repository for data access
//!
//! Durable string key/value entries, the same shape as browser local storage.

use crate::shared::error::BurnError;

/// Key/value storage trait
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, BurnError>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), BurnError>;

    /// Delete a value. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<(), BurnError>;

    /// List all stored keys
    fn keys(&self) -> Result<Vec<String>, BurnError>;
}
