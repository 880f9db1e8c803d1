//! Task model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::member::MemberId;

/// Attribution used for tasks created from the lead's assignment form
pub const DEFAULT_ASSIGNED_BY: &str = "Team Lead";

/// Progress value at which a task counts as completed
pub const PROGRESS_COMPLETE: u8 = 100;

/// Stable identifier of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Clamp any requested progress value into `0..=100`
pub fn clamp_progress(progress: i32) -> u8 {
    progress.clamp(0, PROGRESS_COMPLETE as i32) as u8
}

/// Status badge shown next to a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskBadge {
    Completed,
    Overdue,
    DueSoon,
    InProgress,
}

impl TaskBadge {
    pub fn display_name(&self) -> &'static str {
        match self {
            TaskBadge::Completed => "Completed",
            TaskBadge::Overdue => "Overdue",
            TaskBadge::DueSoon => "Due Soon",
            TaskBadge::InProgress => "In Progress",
        }
    }
}

impl fmt::Display for TaskBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A unit of work assigned to one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Weak reference; the member may no longer exist
    pub assigned_to: MemberId,
    pub assigned_by: String,
    pub due_date: DateTime<Utc>,
    pub progress: u8,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Store a clamped progress value and keep `completed` in step with it
    pub(crate) fn set_progress(&mut self, progress: i32) {
        self.progress = clamp_progress(progress);
        self.completed = self.progress == PROGRESS_COMPLETE;
    }

    pub(crate) fn mark_complete(&mut self) {
        self.progress = PROGRESS_COMPLETE;
        self.completed = true;
    }

    /// Not completed and past its due date
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date < now
    }

    /// Not completed and due within the next 24 hours (but not yet due)
    pub fn is_due_soon(&self, now: DateTime<Utc>) -> bool {
        let remaining = self.due_date.signed_duration_since(now);
        !self.completed && remaining > Duration::zero() && remaining < Duration::hours(24)
    }

    /// Not completed and due within `[now, now + 7 days)`
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date >= now && self.due_date < now + Duration::days(7)
    }

    pub fn badge(&self, now: DateTime<Utc>) -> TaskBadge {
        if self.completed {
            TaskBadge::Completed
        } else if self.is_overdue(now) {
            TaskBadge::Overdue
        } else if self.is_due_soon(now) {
            TaskBadge::DueSoon
        } else {
            TaskBadge::InProgress
        }
    }
}

/// Task fields supplied when adding a task (id and creation time are generated)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: String,
    description: Option<String>,
    assigned_to: MemberId,
    assigned_by: String,
    due_date: DateTime<Utc>,
    progress: i32,
    completed: bool,
}

impl NewTask {
    /// Start a task payload. Returns `None` for a blank title.
    pub fn new(title: &str, assigned_to: MemberId, due_date: DateTime<Utc>) -> Option<Self> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        Some(Self {
            title: title.to_string(),
            description: None,
            assigned_to,
            assigned_by: DEFAULT_ASSIGNED_BY.to_string(),
            due_date,
            progress: 0,
            completed: false,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    pub fn with_assigned_by(mut self, assigned_by: impl Into<String>) -> Self {
        self.assigned_by = assigned_by.into();
        self
    }

    pub fn with_progress(mut self, progress: i32) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn assigned_to(&self) -> MemberId {
        self.assigned_to
    }

    /// Materialize the task. A completed flag forces full progress; otherwise
    /// completion follows the clamped progress.
    pub(crate) fn into_task(self, id: TaskId, created_at: DateTime<Utc>) -> Task {
        let mut task = Task {
            id,
            title: self.title,
            description: self.description,
            assigned_to: self.assigned_to,
            assigned_by: self.assigned_by,
            due_date: self.due_date,
            progress: 0,
            completed: false,
            created_at,
        };
        if self.completed {
            task.mark_complete();
        } else {
            task.set_progress(self.progress);
        }
        task
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(due_in: Duration) -> Task {
        let now = Utc::now();
        NewTask::new("Write docs", MemberId::new(), now + due_in)
            .unwrap()
            .into_task(TaskId::new(), now)
    }

    #[test]
    fn test_clamp_progress() {
        assert_eq!(clamp_progress(-30), 0);
        assert_eq!(clamp_progress(0), 0);
        assert_eq!(clamp_progress(55), 55);
        assert_eq!(clamp_progress(250), 100);
    }

    #[test]
    fn test_set_progress_couples_completion() {
        let mut task = make_task(Duration::days(1));
        task.set_progress(100);
        assert!(task.completed);

        task.set_progress(99);
        assert!(!task.completed);
        assert_eq!(task.progress, 99);

        task.set_progress(400);
        assert!(task.completed);
        assert_eq!(task.progress, 100);
    }

    #[test]
    fn test_new_task_rejects_blank_title() {
        assert!(NewTask::new("  ", MemberId::new(), Utc::now()).is_none());
    }

    #[test]
    fn test_new_task_normalizes_payload() {
        let now = Utc::now();
        let done = NewTask::new("Ship", MemberId::new(), now)
            .unwrap()
            .with_progress(20)
            .with_completed(true)
            .into_task(TaskId::new(), now);
        assert_eq!(done.progress, 100);
        assert!(done.completed);

        let full = NewTask::new("Ship", MemberId::new(), now)
            .unwrap()
            .with_progress(130)
            .into_task(TaskId::new(), now);
        assert_eq!(full.progress, 100);
        assert!(full.completed);

        let fresh = NewTask::new("Ship", MemberId::new(), now)
            .unwrap()
            .into_task(TaskId::new(), now);
        assert_eq!(fresh.assigned_by, DEFAULT_ASSIGNED_BY);
        assert_eq!(fresh.progress, 0);
        assert!(!fresh.completed);
    }

    #[test]
    fn test_blank_description_is_dropped() {
        let now = Utc::now();
        let task = NewTask::new("Ship", MemberId::new(), now)
            .unwrap()
            .with_description("   ")
            .into_task(TaskId::new(), now);
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_badges() {
        let now = Utc::now();
        let mut task = make_task(Duration::days(3));
        assert_eq!(task.badge(now), TaskBadge::InProgress);

        task.due_date = now + Duration::hours(5);
        assert_eq!(task.badge(now), TaskBadge::DueSoon);

        task.due_date = now - Duration::hours(1);
        assert_eq!(task.badge(now), TaskBadge::Overdue);

        task.mark_complete();
        assert_eq!(task.badge(now), TaskBadge::Completed);
    }

    #[test]
    fn test_due_soon_excludes_due_now_and_overdue() {
        let now = Utc::now();
        let mut task = make_task(Duration::zero());
        task.due_date = now;
        assert!(!task.is_due_soon(now));

        task.due_date = now - Duration::minutes(1);
        assert!(!task.is_due_soon(now));

        task.due_date = now + Duration::hours(24);
        assert!(!task.is_due_soon(now));
    }

    #[test]
    fn test_upcoming_window_is_half_open() {
        let now = Utc::now();
        let mut task = make_task(Duration::zero());
        task.due_date = now;
        assert!(task.is_upcoming(now));

        task.due_date = now + Duration::days(7);
        assert!(!task.is_upcoming(now));

        task.due_date = now + Duration::days(7) - Duration::seconds(1);
        assert!(task.is_upcoming(now));
    }

    #[test]
    fn test_task_json_field_names() {
        let task = make_task(Duration::days(1));
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("assignedTo").is_some());
        assert!(value.get("dueDate").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("description").is_none());
    }
}
