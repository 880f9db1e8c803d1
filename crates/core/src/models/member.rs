//! Team member model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long after a status change a member still counts as recently active
pub const RECENT_ACTIVITY_MINUTES: i64 = 5;

/// Stable identifier of a team member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MemberId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Self-reported working status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Working,
    Break,
    Meeting,
    Offline,
}

impl MemberStatus {
    /// All statuses in display order
    pub const ALL: [MemberStatus; 4] = [
        MemberStatus::Working,
        MemberStatus::Break,
        MemberStatus::Meeting,
        MemberStatus::Offline,
    ];

    /// Wire tag, also the key used when sorting members by status
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Working => "working",
            MemberStatus::Break => "break",
            MemberStatus::Meeting => "meeting",
            MemberStatus::Offline => "offline",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MemberStatus::Working => "💼 Working",
            MemberStatus::Break => "☕ Break",
            MemberStatus::Meeting => "📅 Meeting",
            MemberStatus::Offline => "🔒 Offline",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            MemberStatus::Working => 0,
            MemberStatus::Break => 1,
            MemberStatus::Meeting => 2,
            MemberStatus::Offline => 3,
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemberStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown member status '{}'", s))
    }
}

/// A tracked team member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub avatar: String,
    /// Free-text job title, unrelated to [`crate::UserRole`]
    #[serde(rename = "role")]
    pub job_title: String,
    pub status: MemberStatus,
    /// Updated on every status change
    pub last_activity: DateTime<Utc>,
    /// Maintained by explicit calls, never derived from the task list
    pub tasks_count: u32,
}

impl Member {
    /// Whether the member changed status within the last few minutes
    pub fn is_recently_active(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.last_activity) < Duration::minutes(RECENT_ACTIVITY_MINUTES)
    }

    pub fn is_online(&self) -> bool {
        self.status != MemberStatus::Offline
    }
}

/// Member fields supplied when adding a member (the id is generated)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub job_title: String,
    pub status: MemberStatus,
    pub last_activity: DateTime<Utc>,
    pub tasks_count: u32,
}

impl NewMember {
    /// Build a freshly invited member from a name and job title.
    ///
    /// Returns `None` if either is blank. The member starts offline with no
    /// tasks and a placeholder avatar; the email is derived from the name.
    pub fn invite(name: &str, job_title: &str, now: DateTime<Utc>) -> Option<Self> {
        let name = name.trim();
        let job_title = job_title.trim();
        if name.is_empty() || job_title.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replacen(' ', ".", 1)),
            avatar: "👤".to_string(),
            job_title: job_title.to_string(),
            status: MemberStatus::Offline,
            last_activity: now,
            tasks_count: 0,
        })
    }

    pub(crate) fn into_member(self, id: MemberId) -> Member {
        Member {
            id,
            name: self.name,
            email: self.email,
            avatar: self.avatar,
            job_title: self.job_title,
            status: self.status,
            last_activity: self.last_activity,
            tasks_count: self.tasks_count,
        }
    }
}
