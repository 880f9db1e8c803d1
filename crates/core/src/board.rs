//! The dashboard board: the entity store plus its persistence side channel
//!
//! Created once at startup and passed to whatever needs to read or mutate
//! the dashboard. Every applied mutation is followed by a snapshot write;
//! a failed write is logged and never undoes or fails the mutation.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::Result;
use crate::export::ExportDocument;
use crate::models::{MemberId, NewMember, NewTask, TaskId};
use crate::mutation::Mutation;
use crate::seed::seed_snapshot;
use crate::storage::{KeyValueStore, Rehydrated, SnapshotStore};
use crate::store::{EntityStore, Outcome, Snapshot};

pub struct Board<K> {
    store: EntityStore,
    snapshots: SnapshotStore<K>,
}

impl<K: KeyValueStore> Board<K> {
    /// Rehydrate from `kv`, falling back to the seed data
    pub fn open(kv: K, now: DateTime<Utc>) -> (Self, Rehydrated) {
        let snapshots = SnapshotStore::new(kv);
        let (snapshot, source) = snapshots.rehydrate(now);
        let board = Self {
            store: EntityStore::new(snapshot),
            snapshots,
        };
        (board, source)
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.store.snapshot()
    }

    pub fn backend(&self) -> &K {
        self.snapshots.backend()
    }

    pub fn last_saved(&self) -> Result<Option<DateTime<Utc>>> {
        self.snapshots.last_saved()
    }

    pub fn dispatch(&mut self, mutation: Mutation) -> Outcome {
        self.dispatch_at(mutation, Utc::now())
    }

    /// Apply a mutation as of `now`, then persist if anything changed
    pub fn dispatch_at(&mut self, mutation: Mutation, now: DateTime<Utc>) -> Outcome {
        let name = mutation.name();
        let outcome = self.store.apply_at(mutation, now);
        debug!(mutation = name, ?outcome, "Mutation dispatched");
        if outcome.is_applied() {
            self.persist();
        }
        outcome
    }

    /// Add a member and return the generated id
    pub fn add_member(&mut self, new_member: NewMember) -> MemberId {
        let id = self.store.add_member(new_member);
        self.persist();
        id
    }

    /// Add a task created at `now` and return the generated id
    pub fn add_task(&mut self, new_task: NewTask, now: DateTime<Utc>) -> TaskId {
        let id = self.store.add_task(new_task, now);
        self.persist();
        id
    }

    /// Drop the stored snapshot and start over from the seed data
    pub fn reset(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.snapshots.reset()?;
        self.store = EntityStore::new(seed_snapshot(now));
        Ok(())
    }

    pub fn export(&self, now: DateTime<Utc>) -> ExportDocument {
        ExportDocument::from_snapshot(self.store.snapshot(), now)
    }

    fn persist(&self) {
        if let Err(e) = self.snapshots.save(self.store.snapshot()) {
            warn!(error = %e, "Failed to persist snapshot");
        }
    }
}
