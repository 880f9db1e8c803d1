//! Storage repository traits
//!
//! The persistence boundary is a plain byte store keyed by strings, so the
//! snapshot can live in SQLite, in memory, or anywhere else that can hold
//! a few kilobytes under a fixed key.

use chrono::{DateTime, Utc};

use crate::error::Result;

/// Key-value byte store
pub trait KeyValueStore {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// When `key` was last written; `None` if absent or the backend keeps no timestamps
    fn updated_at(&self, _key: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(None)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        (**self).updated_at(key)
    }
}
