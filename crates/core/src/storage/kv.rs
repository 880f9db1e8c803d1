//! SQLite-backed key-value table

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::instrument;

use super::parse::{parse_datetime, OptionalExt};
use crate::error::Result;

/// Key-value storage operations
pub struct KvStore<'a> {
    conn: &'a Connection,
}

impl<'a> KvStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Read a value
    #[instrument(skip(self))]
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Insert or replace a value
    #[instrument(skip(self, value), fields(len = value.len()))]
    pub fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Delete a value (no-op if absent)
    #[instrument(skip(self))]
    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// When the value under `key` was last written
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let updated_at = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv_store WHERE key = ?1",
                params![key],
                |row| parse_datetime(&row.get::<_, String>(0)?),
            )
            .optional()?;
        Ok(updated_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    #[test]
    fn test_put_and_get() {
        let db = Database::open_in_memory().unwrap();
        let store = db.kv();

        assert!(store.get("persist:root").unwrap().is_none());

        store.put("persist:root", b"{}").unwrap();
        assert_eq!(store.get("persist:root").unwrap().unwrap(), b"{}".to_vec());
        assert!(store.updated_at("persist:root").unwrap().is_some());
    }

    #[test]
    fn test_put_replaces() {
        let db = Database::open_in_memory().unwrap();
        let store = db.kv();

        store.put("key", b"first").unwrap();
        store.put("key", b"second").unwrap();
        assert_eq!(store.get("key").unwrap().unwrap(), b"second".to_vec());
    }

    #[test]
    fn test_remove() {
        let db = Database::open_in_memory().unwrap();
        let store = db.kv();

        store.put("key", b"value").unwrap();
        store.remove("key").unwrap();
        assert!(store.get("key").unwrap().is_none());
        assert!(store.updated_at("key").unwrap().is_none());

        // Removing again is fine
        store.remove("key").unwrap();
    }
}
