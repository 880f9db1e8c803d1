//! One-way JSON export of members and tasks

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Member, Task};
use crate::store::Snapshot;

/// Format version written into every export
pub const EXPORT_VERSION: &str = "1.0";

/// Downloadable dump of the team's data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub members: Vec<Member>,
    pub tasks: Vec<Task>,
    /// ISO-8601 timestamp of the export
    pub export_date: String,
    pub version: String,
}

impl ExportDocument {
    pub fn from_snapshot(snapshot: &Snapshot, now: DateTime<Utc>) -> Self {
        Self {
            members: snapshot.members.clone(),
            tasks: snapshot.tasks.clone(),
            export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            version: EXPORT_VERSION.to_string(),
        }
    }

    /// Pretty-printed JSON, two-space indented
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Suggested download name, e.g. `team-pulse-data-2024-03-10.json`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("team-pulse-data-{}.json", now.format("%Y-%m-%d"))
}
