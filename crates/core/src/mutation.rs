//! The closed set of state transitions
//!
//! A [`Mutation`] is a typed payload from the presentation layer. Applying
//! one is total: stale ids come back as [`Outcome::NotFound`] and out of
//! range numbers are clamped.

use chrono::{DateTime, Utc};

use crate::models::{MemberId, MemberStatus, NewMember, NewTask, TaskId, Theme, UserRole};
use crate::store::{CountChange, EntityStore, Outcome, SortBy, StatusFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    UpdateMemberStatus { member_id: MemberId, status: MemberStatus },
    UpdateTasksCount { member_id: MemberId, change: CountChange },
    AddMember(NewMember),
    UpdateTaskProgress { task_id: TaskId, progress: i32 },
    AdjustTaskProgress { task_id: TaskId, delta: i32 },
    MarkTaskComplete(TaskId),
    AddTask(NewTask),
    DeleteTask(TaskId),
    SwitchRole(UserRole),
    SetUser(String),
    SetStatusFilter(StatusFilter),
    SetSortBy(SortBy),
    SetTheme(Theme),
}

impl Mutation {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::UpdateMemberStatus { .. } => "update_member_status",
            Mutation::UpdateTasksCount { .. } => "update_tasks_count",
            Mutation::AddMember(_) => "add_member",
            Mutation::UpdateTaskProgress { .. } => "update_task_progress",
            Mutation::AdjustTaskProgress { .. } => "adjust_task_progress",
            Mutation::MarkTaskComplete(_) => "mark_task_complete",
            Mutation::AddTask(_) => "add_task",
            Mutation::DeleteTask(_) => "delete_task",
            Mutation::SwitchRole(_) => "switch_role",
            Mutation::SetUser(_) => "set_user",
            Mutation::SetStatusFilter(_) => "set_status_filter",
            Mutation::SetSortBy(_) => "set_sort_by",
            Mutation::SetTheme(_) => "set_theme",
        }
    }
}

impl EntityStore {
    /// Apply a mutation, stamping any timestamps with the current time
    pub fn apply(&mut self, mutation: Mutation) -> Outcome {
        self.apply_at(mutation, Utc::now())
    }

    /// Apply a mutation as of `now`
    pub fn apply_at(&mut self, mutation: Mutation, now: DateTime<Utc>) -> Outcome {
        match mutation {
            Mutation::UpdateMemberStatus { member_id, status } => {
                self.update_member_status(member_id, status, now)
            }
            Mutation::UpdateTasksCount { member_id, change } => {
                self.update_tasks_count(member_id, change)
            }
            Mutation::AddMember(new_member) => {
                self.add_member(new_member);
                Outcome::Applied
            }
            Mutation::UpdateTaskProgress { task_id, progress } => {
                self.update_task_progress(task_id, progress)
            }
            Mutation::AdjustTaskProgress { task_id, delta } => {
                self.adjust_task_progress(task_id, delta)
            }
            Mutation::MarkTaskComplete(task_id) => self.mark_task_complete(task_id),
            Mutation::AddTask(new_task) => {
                self.add_task(new_task, now);
                Outcome::Applied
            }
            Mutation::DeleteTask(task_id) => self.delete_task(task_id),
            Mutation::SwitchRole(role) => {
                self.switch_role(role);
                Outcome::Applied
            }
            Mutation::SetUser(name) => {
                self.set_user(name);
                Outcome::Applied
            }
            Mutation::SetStatusFilter(filter) => {
                self.set_status_filter(filter);
                Outcome::Applied
            }
            Mutation::SetSortBy(sort_by) => {
                self.set_sort_by(sort_by);
                Outcome::Applied
            }
            Mutation::SetTheme(theme) => {
                self.set_theme(theme);
                Outcome::Applied
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Snapshot;
    use chrono::Duration;

    #[test]
    fn test_apply_add_and_progress() {
        let now = Utc::now();
        let mut store = EntityStore::default();
        let member = NewMember::invite("Alice", "Engineer", now).unwrap();
        assert_eq!(store.apply_at(Mutation::AddMember(member), now), Outcome::Applied);
        let alice = store.members()[0].id;

        let task = NewTask::new("Build", alice, now + Duration::days(1)).unwrap();
        store.apply_at(Mutation::AddTask(task), now);
        let task_id = store.tasks()[0].id;
        assert_eq!(store.tasks()[0].created_at, now);

        let outcome = store.apply_at(
            Mutation::UpdateTaskProgress { task_id, progress: 250 },
            now,
        );
        assert!(outcome.is_applied());
        assert_eq!(store.tasks()[0].progress, 100);
        assert!(store.tasks()[0].completed);
    }

    #[test]
    fn test_apply_stale_ids() {
        let mut store = EntityStore::default();
        let stale = [
            Mutation::UpdateMemberStatus {
                member_id: MemberId::new(),
                status: MemberStatus::Working,
            },
            Mutation::UpdateTasksCount {
                member_id: MemberId::new(),
                change: CountChange::Decrement,
            },
            Mutation::UpdateTaskProgress { task_id: TaskId::new(), progress: 10 },
            Mutation::AdjustTaskProgress { task_id: TaskId::new(), delta: 10 },
            Mutation::MarkTaskComplete(TaskId::new()),
            Mutation::DeleteTask(TaskId::new()),
        ];
        for mutation in stale {
            assert_eq!(store.apply(mutation), Outcome::NotFound);
        }
        assert_eq!(store.snapshot(), &Snapshot::default());
    }

    #[test]
    fn test_apply_scalar_mutations() {
        let mut store = EntityStore::default();
        store.apply(Mutation::SwitchRole(UserRole::Lead));
        store.apply(Mutation::SetUser("Sarah Wilson".to_string()));
        store.apply(Mutation::SetTheme(Theme::System));
        store.apply(Mutation::SetSortBy(SortBy::Status));
        store.apply(Mutation::SetStatusFilter(StatusFilter::Only(MemberStatus::Working)));

        assert_eq!(store.role().current_role, UserRole::Lead);
        assert_eq!(store.role().current_user, "Sarah Wilson");
        assert_eq!(store.theme(), Theme::System);
        assert_eq!(store.member_view().sort_by, SortBy::Status);
    }

    #[test]
    fn test_mutation_names() {
        assert_eq!(Mutation::DeleteTask(TaskId::new()).name(), "delete_task");
        assert_eq!(Mutation::SetTheme(Theme::Dark).name(), "set_theme");
    }
}
