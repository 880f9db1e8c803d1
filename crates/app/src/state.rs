//! Application state management

use chrono::{DateTime, Utc};
use pulse_core::{
    Board, Database, KeyValueStore, MemoryStore, Mutation, Rehydrated, Result,
};
use tracing::info;

use crate::config::{Config, DataLocation, SessionConfig};

/// Snapshot backend picked by configuration
pub enum Backend {
    Sqlite(Database),
    Memory(MemoryStore),
}

impl Backend {
    pub fn open(location: &DataLocation) -> Result<Self> {
        match location {
            DataLocation::File(path) => {
                // Ensure parent directory exists
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let db = Database::open(path)?;
                info!(path = %path.display(), schema_version = db.schema_version()?, "Opened data file");
                Ok(Backend::Sqlite(db))
            }
            DataLocation::Memory => Ok(Backend::Memory(MemoryStore::new())),
        }
    }
}

impl KeyValueStore for Backend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self {
            Backend::Sqlite(db) => db.get(key),
            Backend::Memory(mem) => mem.get(key),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        match self {
            Backend::Sqlite(db) => db.put(key, value),
            Backend::Memory(mem) => mem.put(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self {
            Backend::Sqlite(db) => db.remove(key),
            Backend::Memory(mem) => mem.remove(key),
        }
    }

    fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        match self {
            Backend::Sqlite(db) => db.updated_at(key),
            Backend::Memory(mem) => mem.updated_at(key),
        }
    }
}

/// Main application state, alive for the whole process
pub struct AppState {
    pub board: Board<Backend>,
    pub source: Rehydrated,
}

impl AppState {
    pub fn new(config: &Config, now: DateTime<Utc>) -> Result<Self> {
        let backend = Backend::open(&config.data)?;
        Ok(Self::with_backend(backend, &config.session, now))
    }

    /// Rehydrate from `backend`; the session defaults only apply to fresh seed data
    pub fn with_backend(backend: Backend, session: &SessionConfig, now: DateTime<Utc>) -> Self {
        let (mut board, source) = Board::open(backend, now);
        if !source.is_restored() {
            apply_session(&mut board, session, now);
        }
        Self { board, source }
    }
}

fn apply_session(board: &mut Board<Backend>, session: &SessionConfig, now: DateTime<Utc>) {
    if let Some(role) = session.role {
        board.dispatch_at(Mutation::SwitchRole(role), now);
    }
    if let Some(user) = &session.user {
        board.dispatch_at(Mutation::SetUser(user.clone()), now);
    }
    if session.role.is_some() || session.user.is_some() {
        info!(role = ?session.role, user = ?session.user, "Applied session defaults");
    }
}
