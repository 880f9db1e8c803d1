//! Entity store
//!
//! Owns the canonical snapshot: members, tasks, role, theme, and the member
//! list view settings. Readers borrow the snapshot; writers go through
//! [`EntityStore`] methods (or [`crate::Mutation`]) which take `&mut self`,
//! so a reader can never observe a half-applied change.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::invariants::{assert_snapshot_invariants, assert_task_invariants};
use crate::models::{
    Member, MemberId, MemberStatus, NewMember, NewTask, RoleState, Task, TaskId, Theme, UserRole,
};

/// Result of a mutation that targets an existing entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The id was stale; the snapshot is unchanged
    NotFound,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Member list filter: one status or all of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(MemberStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: MemberStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        filter.to_string()
    }
}

/// Member list ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Ascending by name
    #[default]
    Name,
    /// Descending by tasks count
    Tasks,
    /// Ascending by status tag
    Status,
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortBy::Name => "name",
            SortBy::Tasks => "tasks",
            SortBy::Status => "status",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortBy::Name),
            "tasks" => Ok(SortBy::Tasks),
            "status" => Ok(SortBy::Status),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

/// Member list settings chosen in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberViewState {
    pub status_filter: StatusFilter,
    pub sort_by: SortBy,
}

/// Direction for [`EntityStore::update_tasks_count`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountChange {
    Increment,
    /// Floors at zero
    Decrement,
}

/// Complete dashboard state at one instant
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub members: Vec<Member>,
    #[serde(default)]
    pub member_view: MemberViewState,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub role: RoleState,
    #[serde(default)]
    pub theme: Theme,
}

impl Snapshot {
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

/// Single owner of the dashboard snapshot
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    snapshot: Snapshot,
}

impl EntityStore {
    pub fn new(snapshot: Snapshot) -> Self {
        assert_snapshot_invariants(&snapshot);
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }

    pub fn members(&self) -> &[Member] {
        &self.snapshot.members
    }

    pub fn tasks(&self) -> &[Task] {
        &self.snapshot.tasks
    }

    pub fn role(&self) -> &RoleState {
        &self.snapshot.role
    }

    pub fn theme(&self) -> Theme {
        self.snapshot.theme
    }

    pub fn member_view(&self) -> MemberViewState {
        self.snapshot.member_view
    }

    fn member_mut(&mut self, id: MemberId) -> Option<&mut Member> {
        self.snapshot.members.iter_mut().find(|m| m.id == id)
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.snapshot.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Set a member's status and stamp their last activity
    pub fn update_member_status(
        &mut self,
        id: MemberId,
        status: MemberStatus,
        now: DateTime<Utc>,
    ) -> Outcome {
        let Some(member) = self.member_mut(id) else {
            warn!(member_id = %id, "Status update for unknown member ignored");
            return Outcome::NotFound;
        };
        member.status = status;
        member.last_activity = now;
        debug!(member_id = %id, status = %status, "Member status updated");
        Outcome::Applied
    }

    pub fn update_tasks_count(&mut self, id: MemberId, change: CountChange) -> Outcome {
        let Some(member) = self.member_mut(id) else {
            warn!(member_id = %id, "Tasks count update for unknown member ignored");
            return Outcome::NotFound;
        };
        member.tasks_count = match change {
            CountChange::Increment => member.tasks_count.saturating_add(1),
            CountChange::Decrement => member.tasks_count.saturating_sub(1),
        };
        debug!(member_id = %id, tasks_count = member.tasks_count, "Tasks count updated");
        Outcome::Applied
    }

    /// Append a member under a freshly generated id
    pub fn add_member(&mut self, new_member: NewMember) -> MemberId {
        let id = loop {
            let candidate = MemberId::new();
            if self.snapshot.member(candidate).is_none() {
                break candidate;
            }
        };
        self.snapshot.members.push(new_member.into_member(id));
        debug!(member_id = %id, "Member added");
        self.check();
        id
    }

    /// Store `clamp(progress, 0, 100)` and set `completed` accordingly
    pub fn update_task_progress(&mut self, id: TaskId, progress: i32) -> Outcome {
        let Some(task) = self.task_mut(id) else {
            warn!(task_id = %id, "Progress update for unknown task ignored");
            return Outcome::NotFound;
        };
        task.set_progress(progress);
        assert_task_invariants(task);
        debug!(task_id = %id, progress = task.progress, completed = task.completed, "Task progress updated");
        Outcome::Applied
    }

    /// Move progress by `delta` from its current value, clamped
    pub fn adjust_task_progress(&mut self, id: TaskId, delta: i32) -> Outcome {
        let Some(current) = self.snapshot.task(id).map(|t| t.progress) else {
            warn!(task_id = %id, "Progress adjustment for unknown task ignored");
            return Outcome::NotFound;
        };
        self.update_task_progress(id, i32::from(current).saturating_add(delta))
    }

    /// Idempotent: completing a completed task changes nothing
    pub fn mark_task_complete(&mut self, id: TaskId) -> Outcome {
        let Some(task) = self.task_mut(id) else {
            warn!(task_id = %id, "Completion of unknown task ignored");
            return Outcome::NotFound;
        };
        task.mark_complete();
        assert_task_invariants(task);
        debug!(task_id = %id, "Task marked complete");
        Outcome::Applied
    }

    /// Append a task under a freshly generated id, created at `now`
    pub fn add_task(&mut self, new_task: NewTask, now: DateTime<Utc>) -> TaskId {
        let id = loop {
            let candidate = TaskId::new();
            if self.snapshot.task(candidate).is_none() {
                break candidate;
            }
        };
        self.snapshot.tasks.push(new_task.into_task(id, now));
        debug!(task_id = %id, "Task added");
        self.check();
        id
    }

    pub fn delete_task(&mut self, id: TaskId) -> Outcome {
        let before = self.snapshot.tasks.len();
        self.snapshot.tasks.retain(|t| t.id != id);
        if self.snapshot.tasks.len() == before {
            warn!(task_id = %id, "Deletion of unknown task ignored");
            return Outcome::NotFound;
        }
        debug!(task_id = %id, "Task deleted");
        Outcome::Applied
    }

    pub fn switch_role(&mut self, role: UserRole) {
        self.snapshot.role.current_role = role;
        debug!(role = role.as_str(), "Role switched");
    }

    /// Not validated against the member list
    pub fn set_user(&mut self, name: impl Into<String>) {
        self.snapshot.role.current_user = name.into();
        debug!(user = %self.snapshot.role.current_user, "Current user set");
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.snapshot.member_view.status_filter = filter;
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.snapshot.member_view.sort_by = sort_by;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.snapshot.theme = theme;
        debug!(theme = theme.as_str(), "Theme set");
    }

    fn check(&self) {
        assert_snapshot_invariants(&self.snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn store_with_members() -> (EntityStore, MemberId, MemberId) {
        let now = Utc::now();
        let mut store = EntityStore::default();
        let mut a = NewMember::invite("Alice", "Engineer", now).unwrap();
        a.status = MemberStatus::Working;
        let mut b = NewMember::invite("Bob", "Designer", now).unwrap();
        b.status = MemberStatus::Break;
        let a = store.add_member(a);
        let b = store.add_member(b);
        (store, a, b)
    }

    #[test]
    fn test_update_member_status_stamps_activity() {
        let (mut store, alice, bob) = store_with_members();
        let bob_before = store.snapshot().member(bob).cloned();
        let later = Utc::now() + Duration::minutes(10);

        let outcome = store.update_member_status(alice, MemberStatus::Meeting, later);
        assert_eq!(outcome, Outcome::Applied);

        let a = store.snapshot().member(alice).unwrap();
        assert_eq!(a.status, MemberStatus::Meeting);
        assert_eq!(a.last_activity, later);
        assert_eq!(store.snapshot().member(bob).cloned(), bob_before);
    }

    #[test]
    fn test_unknown_member_is_not_found() {
        let (mut store, _, _) = store_with_members();
        let before = store.snapshot().clone();

        assert_eq!(
            store.update_member_status(MemberId::new(), MemberStatus::Offline, Utc::now()),
            Outcome::NotFound
        );
        assert_eq!(
            store.update_tasks_count(MemberId::new(), CountChange::Increment),
            Outcome::NotFound
        );
        assert_eq!(store.snapshot(), &before);
    }

    #[test]
    fn test_tasks_count_floors_at_zero() {
        let (mut store, alice, _) = store_with_members();
        store.update_tasks_count(alice, CountChange::Increment);
        store.update_tasks_count(alice, CountChange::Decrement);
        store.update_tasks_count(alice, CountChange::Decrement);
        assert_eq!(store.snapshot().member(alice).unwrap().tasks_count, 0);

        store.update_tasks_count(alice, CountChange::Increment);
        assert_eq!(store.snapshot().member(alice).unwrap().tasks_count, 1);
    }

    #[test]
    fn test_added_ids_are_unique() {
        let (mut store, _, _) = store_with_members();
        let now = Utc::now();
        for i in 0..50 {
            let new_member = NewMember::invite(&format!("Member {}", i), "Tester", now).unwrap();
            store.add_member(new_member);
        }
        let mut ids: Vec<_> = store.members().iter().map(|m| m.id).collect();
        ids.sort_by_key(|id| id.0);
        ids.dedup();
        assert_eq!(ids.len(), 52);
    }

    #[test]
    fn test_progress_scenario() {
        let (mut store, alice, _) = store_with_members();
        let now = Utc::now();
        let task = NewTask::new("Build", alice, now + Duration::days(2))
            .unwrap()
            .with_progress(50);
        let task_id = store.add_task(task, now);

        store.update_task_progress(task_id, 60);
        let task = store.snapshot().task(task_id).unwrap();
        assert_eq!((task.progress, task.completed), (60, false));

        store.update_task_progress(task_id, 100);
        let task = store.snapshot().task(task_id).unwrap();
        assert_eq!((task.progress, task.completed), (100, true));

        store.update_task_progress(task_id, -30);
        let task = store.snapshot().task(task_id).unwrap();
        assert_eq!((task.progress, task.completed), (0, false));
    }

    #[test]
    fn test_adjust_task_progress_clamps() {
        let (mut store, alice, _) = store_with_members();
        let now = Utc::now();
        let task_id = store.add_task(
            NewTask::new("Build", alice, now).unwrap().with_progress(95),
            now,
        );

        store.adjust_task_progress(task_id, 10);
        assert!(store.snapshot().task(task_id).unwrap().completed);

        store.adjust_task_progress(task_id, -10);
        let task = store.snapshot().task(task_id).unwrap();
        assert_eq!((task.progress, task.completed), (90, false));

        assert_eq!(store.adjust_task_progress(TaskId::new(), 10), Outcome::NotFound);
    }

    #[test]
    fn test_mark_complete_is_idempotent() {
        let (mut store, alice, _) = store_with_members();
        let now = Utc::now();
        let task_id = store.add_task(NewTask::new("Build", alice, now).unwrap(), now);

        store.mark_task_complete(task_id);
        let once = store.snapshot().clone();
        store.mark_task_complete(task_id);
        assert_eq!(store.snapshot(), &once);
        assert_eq!(store.snapshot().task(task_id).unwrap().progress, 100);
    }

    #[test]
    fn test_delete_unknown_task_leaves_tasks_identical() {
        let (mut store, alice, _) = store_with_members();
        let now = Utc::now();
        store.add_task(NewTask::new("One", alice, now).unwrap(), now);
        store.add_task(NewTask::new("Two", alice, now).unwrap(), now);
        let before = store.tasks().to_vec();

        assert_eq!(store.delete_task(TaskId::new()), Outcome::NotFound);
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_delete_task() {
        let (mut store, alice, _) = store_with_members();
        let now = Utc::now();
        let keep = store.add_task(NewTask::new("Keep", alice, now).unwrap(), now);
        let drop = store.add_task(NewTask::new("Drop", alice, now).unwrap(), now);

        assert_eq!(store.delete_task(drop), Outcome::Applied);
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].id, keep);
    }

    #[test]
    fn test_scalar_state_setters() {
        let mut store = EntityStore::default();
        store.switch_role(UserRole::Lead);
        store.set_user("Nobody In Particular");
        store.set_status_filter(StatusFilter::Only(MemberStatus::Break));
        store.set_sort_by(SortBy::Tasks);
        store.set_theme(Theme::Dark);

        assert_eq!(store.role().current_role, UserRole::Lead);
        assert_eq!(store.role().current_user, "Nobody In Particular");
        assert_eq!(
            store.member_view(),
            MemberViewState {
                status_filter: StatusFilter::Only(MemberStatus::Break),
                sort_by: SortBy::Tasks,
            }
        );
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn test_status_filter_strings() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "meeting".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(MemberStatus::Meeting)
        );
        assert!("lunch".parse::<StatusFilter>().is_err());

        let json = serde_json::to_string(&StatusFilter::Only(MemberStatus::Offline)).unwrap();
        assert_eq!(json, "\"offline\"");
    }
}
