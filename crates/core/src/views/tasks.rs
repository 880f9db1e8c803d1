//! Role-scoped task filtering and aggregates

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::models::{Member, MemberId, Task, UserRole};
use crate::store::Snapshot;

/// Shown in place of a member name when an assignee id is dangling
pub const UNKNOWN_MEMBER: &str = "Unknown";

/// Result of resolving the acting user's display name to a member.
///
/// Names are not unique, so a name can match several members. The first
/// match in collection order is used in that case; the ambiguity is kept
/// visible so callers can warn about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberMatch<'a> {
    None,
    Unique(&'a Member),
    Ambiguous { first: &'a Member, matches: usize },
}

impl<'a> MemberMatch<'a> {
    /// The member acting as the current user, if any
    pub fn member(&self) -> Option<&'a Member> {
        match self {
            MemberMatch::None => None,
            MemberMatch::Unique(member) => Some(member),
            MemberMatch::Ambiguous { first, .. } => Some(first),
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, MemberMatch::Ambiguous { .. })
    }
}

/// Find the member whose name equals `name` exactly
pub fn resolve_current_member<'a>(members: &'a [Member], name: &str) -> MemberMatch<'a> {
    let mut found = members.iter().filter(|m| m.name == name);
    let Some(first) = found.next() else {
        return MemberMatch::None;
    };
    match found.count() {
        0 => MemberMatch::Unique(first),
        extra => MemberMatch::Ambiguous {
            first,
            matches: extra + 1,
        },
    }
}

/// Name of the assignee, or [`UNKNOWN_MEMBER`] for a dangling id
pub fn assignee_name(members: &[Member], id: MemberId) -> &str {
    members
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.name.as_str())
        .unwrap_or(UNKNOWN_MEMBER)
}

/// Number of tasks actually assigned to a member, for comparison with the
/// independently maintained `tasks_count`
pub fn derived_tasks_count(tasks: &[Task], member_id: MemberId) -> usize {
    tasks.iter().filter(|t| t.assigned_to == member_id).count()
}

/// Task list status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatusFilter {
    #[default]
    All,
    Completed,
    Pending,
    /// Not completed and past due
    Overdue,
}

impl TaskStatusFilter {
    pub fn matches(&self, task: &Task, now: DateTime<Utc>) -> bool {
        match self {
            TaskStatusFilter::All => true,
            TaskStatusFilter::Completed => task.completed,
            TaskStatusFilter::Pending => !task.completed,
            TaskStatusFilter::Overdue => task.is_overdue(now),
        }
    }
}

impl fmt::Display for TaskStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskStatusFilter::All => "all",
            TaskStatusFilter::Completed => "completed",
            TaskStatusFilter::Pending => "pending",
            TaskStatusFilter::Overdue => "overdue",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TaskStatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TaskStatusFilter::All),
            "completed" => Ok(TaskStatusFilter::Completed),
            "pending" => Ok(TaskStatusFilter::Pending),
            "overdue" => Ok(TaskStatusFilter::Overdue),
            other => Err(format!("unknown task filter '{}'", other)),
        }
    }
}

/// Filters selected on the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskQuery {
    pub status: TaskStatusFilter,
    /// Only honored for the lead role
    pub assignee: Option<MemberId>,
}

/// Tasks visible to the acting role, narrowed by `query`.
///
/// A member only sees tasks assigned to the member resolved from
/// `current_user`; if no member has that name they see nothing. The
/// assignee filter only applies to the lead. All filters combine with AND.
pub fn filter_tasks<'a>(snapshot: &'a Snapshot, query: &TaskQuery, now: DateTime<Utc>) -> Vec<&'a Task> {
    let role = snapshot.role.current_role;
    let scope = match role {
        UserRole::Lead => None,
        UserRole::Member => {
            match resolve_current_member(&snapshot.members, &snapshot.role.current_user).member() {
                Some(member) => Some(member.id),
                None => return Vec::new(),
            }
        }
    };
    let assignee = match role {
        UserRole::Lead => query.assignee,
        UserRole::Member => None,
    };

    snapshot
        .tasks
        .iter()
        .filter(|t| scope.map_or(true, |id| t.assigned_to == id))
        .filter(|t| query.status.matches(t, now))
        .filter(|t| assignee.map_or(true, |id| t.assigned_to == id))
        .collect()
}

/// Counts over a set of tasks
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TaskAggregates {
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
    /// Mean progress at full precision; 0 for an empty set
    pub average_progress: f64,
}

pub fn aggregate_tasks<'a, I>(tasks: I, now: DateTime<Utc>) -> TaskAggregates
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut aggregates = TaskAggregates::default();
    let mut progress_sum: u64 = 0;
    for task in tasks {
        aggregates.total += 1;
        progress_sum += u64::from(task.progress);
        if task.completed {
            aggregates.completed += 1;
        }
        if task.is_overdue(now) {
            aggregates.overdue += 1;
        }
    }
    if aggregates.total > 0 {
        aggregates.average_progress = progress_sum as f64 / aggregates.total as f64;
    }
    aggregates
}
