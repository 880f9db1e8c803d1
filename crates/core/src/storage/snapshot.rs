//! Snapshot persistence
//!
//! The whole [`Snapshot`] is stored as one JSON document under a fixed root
//! key. Loading never fails startup: a missing, unreadable, or inconsistent
//! document is replaced by the seed data.

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use super::traits::KeyValueStore;
use crate::error::Result;
use crate::invariants::snapshot_violation;
use crate::seed::seed_snapshot;
use crate::store::Snapshot;

/// Key under which the snapshot is stored
pub const ROOT_KEY: &str = "persist:root";

/// Why the seed data was used instead of a persisted snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedReason {
    Missing,
    Unreadable(String),
    Malformed(String),
    Inconsistent(String),
}

/// Where the rehydrated snapshot came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rehydrated {
    Restored,
    Seeded(SeedReason),
}

impl Rehydrated {
    pub fn is_restored(&self) -> bool {
        matches!(self, Rehydrated::Restored)
    }
}

/// Reads and writes the snapshot through a key-value backend
pub struct SnapshotStore<K> {
    kv: K,
}

impl<K: KeyValueStore> SnapshotStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn backend(&self) -> &K {
        &self.kv
    }

    /// Serialize and write the snapshot
    #[instrument(skip_all, fields(members = snapshot.members.len(), tasks = snapshot.tasks.len()))]
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec(snapshot)?;
        self.kv.put(ROOT_KEY, &bytes)
    }

    /// When the snapshot was last written, if the backend records it
    pub fn last_saved(&self) -> Result<Option<DateTime<Utc>>> {
        self.kv.updated_at(ROOT_KEY)
    }

    /// Read the stored snapshot without any fallback
    pub fn load(&self) -> Result<Option<Snapshot>> {
        match self.kv.get(ROOT_KEY)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Load the stored snapshot, falling back to the seed data
    #[instrument(skip(self))]
    pub fn rehydrate(&self, now: DateTime<Utc>) -> (Snapshot, Rehydrated) {
        let reason = match self.kv.get(ROOT_KEY) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Snapshot>(&bytes) {
                Ok(snapshot) => match snapshot_violation(&snapshot) {
                    None => {
                        info!(
                            members = snapshot.members.len(),
                            tasks = snapshot.tasks.len(),
                            "Snapshot restored"
                        );
                        return (snapshot, Rehydrated::Restored);
                    }
                    Some(violation) => SeedReason::Inconsistent(violation),
                },
                Err(e) => SeedReason::Malformed(e.to_string()),
            },
            Ok(None) => SeedReason::Missing,
            Err(e) => SeedReason::Unreadable(e.to_string()),
        };

        match &reason {
            SeedReason::Missing => info!("No stored snapshot, starting from seed data"),
            other => warn!(reason = ?other, "Stored snapshot unusable, starting from seed data"),
        }
        (seed_snapshot(now), Rehydrated::Seeded(reason))
    }

    /// Forget the stored snapshot; the next start uses the seed data
    pub fn reset(&self) -> Result<()> {
        self.kv.remove(ROOT_KEY)
    }
}
