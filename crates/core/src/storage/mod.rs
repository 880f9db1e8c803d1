//! SQLite storage layer for Pulse

mod kv;
mod memory;
mod migrations;
mod parse;
mod snapshot;
mod traits;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;

use crate::error::Result;

pub use kv::KvStore;
pub use memory::MemoryStore;
pub use snapshot::{Rehydrated, SeedReason, SnapshotStore, ROOT_KEY};
pub use traits::KeyValueStore;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Highest migration applied to this file
    pub fn schema_version(&self) -> Result<u32> {
        migrations::current_version(&self.conn)
    }

    /// Get key-value store
    pub fn kv(&self) -> KvStore<'_> {
        KvStore::new(&self.conn)
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.kv().get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.kv().put(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.kv().remove(key)
    }

    fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        self.kv().updated_at(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_snapshot;
    use chrono::Utc;

    #[test]
    fn test_schema_version() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), 1);
    }

    #[test]
    fn test_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pulse.db");
        let snapshot = seed_snapshot(Utc::now());

        {
            let db = Database::open(&path).unwrap();
            SnapshotStore::new(&db).save(&snapshot).unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert!(db.updated_at(ROOT_KEY).unwrap().is_some());
        let (restored, source) = SnapshotStore::new(&db).rehydrate(Utc::now());
        assert!(source.is_restored());
        assert_eq!(restored, snapshot);
    }
}
