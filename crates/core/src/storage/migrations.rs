//! Schema versioning
//!
//! Each step runs inside its own transaction together with the row that
//! records it, so a file is never left half-migrated.

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{debug, info, instrument};

use crate::error::Result;

struct Step {
    version: u32,
    label: &'static str,
    sql: &'static str,
}

/// Ordered schema steps; versions start at 1 and have no gaps
const STEPS: &[Step] = &[Step {
    version: 1,
    label: "kv_store table",
    sql: "CREATE TABLE IF NOT EXISTS kv_store (
              key TEXT PRIMARY KEY,
              value BLOB NOT NULL,
              updated_at TEXT NOT NULL
          );",
}];

const VERSION_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    description TEXT NOT NULL,
    applied_at TEXT NOT NULL
)";

/// Highest recorded step, or 0 for a file nothing has been applied to
///
/// Fails if the version table does not exist or cannot be read.
pub(crate) fn current_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
        row.get::<_, Option<u32>>(0)
    })?;
    Ok(version.unwrap_or(0))
}

fn apply(conn: &Connection, step: &Step) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(step.sql)?;
    tx.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        params![step.version, step.label, Utc::now().to_rfc3339()],
    )?;
    tx.commit()?;
    Ok(())
}

/// Bring the schema up to the latest step
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(VERSION_TABLE, [])?;
    let from = current_version(conn)?;

    let pending: Vec<&Step> = STEPS.iter().filter(|s| s.version > from).collect();
    if pending.is_empty() {
        debug!(version = from, "Schema up to date");
        return Ok(());
    }

    for step in &pending {
        debug!(version = step.version, label = step.label, "Applying schema step");
        apply(conn, step)?;
    }
    info!(from, to = current_version(conn)?, "Schema migrated");
    Ok(())
}
