//! Pulse Core Library
//!
//! Entity store, mutations, derived views, and snapshot persistence for the
//! Pulse team-status and task dashboard.

pub mod board;
pub mod error;
pub mod export;
pub mod invariants;
pub mod models;
pub mod mutation;
pub mod permissions;
pub mod seed;
pub mod storage;
pub mod store;
pub mod views;

pub use board::Board;
pub use error::{Error, Result};
pub use export::{export_file_name, ExportDocument, EXPORT_VERSION};
pub use models::*;
pub use mutation::Mutation;
pub use permissions::*;
pub use storage::{
    Database, KeyValueStore, KvStore, MemoryStore, Rehydrated, SeedReason, SnapshotStore,
    ROOT_KEY,
};
pub use store::{
    CountChange, EntityStore, MemberViewState, Outcome, Snapshot, SortBy, StatusFilter,
};
