//! Screen-level summaries composed from the other views

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Member, Task};
use crate::store::Snapshot;

use super::calendar::{calendar_month, overdue_tasks, upcoming_tasks, CalendarDay, MonthCursor};
use super::members::member_list;
use super::status::{status_distribution, StatusDistribution};
use super::tasks::{aggregate_tasks, resolve_current_member, MemberMatch, TaskAggregates};

/// What the lead sees on the dashboard
#[derive(Debug, Clone)]
pub struct LeadDashboard<'a> {
    pub status_counts: StatusDistribution,
    /// Filtered and sorted per the stored member view settings
    pub members: Vec<&'a Member>,
    /// Over every task in the team
    pub tasks: TaskAggregates,
}

pub fn lead_dashboard(snapshot: &Snapshot, now: DateTime<Utc>) -> LeadDashboard<'_> {
    LeadDashboard {
        status_counts: status_distribution(&snapshot.members),
        members: member_list(&snapshot.members, snapshot.member_view),
        tasks: aggregate_tasks(&snapshot.tasks, now),
    }
}

/// What a team member sees on the dashboard
#[derive(Debug, Clone)]
pub struct MemberDashboard<'a> {
    pub current: MemberMatch<'a>,
    pub tasks: Vec<&'a Task>,
    pub aggregates: TaskAggregates,
    pub due_soon: usize,
}

impl<'a> MemberDashboard<'a> {
    pub fn member(&self) -> Option<&'a Member> {
        self.current.member()
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.member().map(|m| m.last_activity)
    }
}

/// Dashboard for the member resolved from the current user name.
///
/// Without a matching member the task list is empty.
pub fn member_dashboard(snapshot: &Snapshot, now: DateTime<Utc>) -> MemberDashboard<'_> {
    let current = resolve_current_member(&snapshot.members, &snapshot.role.current_user);
    let tasks: Vec<&Task> = match current.member() {
        Some(member) => snapshot
            .tasks
            .iter()
            .filter(|t| t.assigned_to == member.id)
            .collect(),
        None => Vec::new(),
    };
    let due_soon = tasks.iter().filter(|t| t.is_due_soon(now)).count();
    let aggregates = aggregate_tasks(tasks.iter().copied(), now);

    MemberDashboard {
        current,
        tasks,
        aggregates,
        due_soon,
    }
}

/// Calendar screen: month grid plus the side lists
#[derive(Debug, Clone)]
pub struct CalendarOverview<'a> {
    pub month: MonthCursor,
    pub days: Vec<CalendarDay<'a>>,
    pub upcoming: Vec<&'a Task>,
    pub overdue: Vec<&'a Task>,
    pub active_members: usize,
}

pub fn calendar_overview<'a, Tz: TimeZone>(
    snapshot: &'a Snapshot,
    month: MonthCursor,
    now: DateTime<Utc>,
    tz: &Tz,
) -> CalendarOverview<'a> {
    CalendarOverview {
        month,
        days: calendar_month(&snapshot.tasks, month, tz),
        upcoming: upcoming_tasks(&snapshot.tasks, now),
        overdue: overdue_tasks(&snapshot.tasks, now),
        active_members: status_distribution(&snapshot.members).active(),
    }
}

/// Totals shown on the settings screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsSummary {
    pub total_members: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub active_members: usize,
}

pub fn settings_summary(snapshot: &Snapshot) -> SettingsSummary {
    SettingsSummary {
        total_members: snapshot.members.len(),
        total_tasks: snapshot.tasks.len(),
        completed_tasks: snapshot.tasks.iter().filter(|t| t.completed).count(),
        active_members: snapshot.members.iter().filter(|m| m.is_online()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberStatus;
    use crate::seed::seed_snapshot;
    use crate::store::{SortBy, StatusFilter};

    #[test]
    fn test_lead_dashboard_on_seed() {
        let now = Utc::now();
        let mut snapshot = seed_snapshot(now);
        snapshot.member_view.status_filter = StatusFilter::Only(MemberStatus::Working);
        snapshot.member_view.sort_by = SortBy::Tasks;

        let dashboard = lead_dashboard(&snapshot, now);
        assert_eq!(dashboard.status_counts.total(), 7);
        let names: Vec<_> = dashboard.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Emily Davis", "John Doe", "Lisa Kim"]);
        assert_eq!(dashboard.tasks.total, 8);
        assert_eq!(dashboard.tasks.completed, 1);
        assert_eq!(dashboard.tasks.overdue, 1);
    }

    #[test]
    fn test_member_dashboard_for_default_user() {
        let now = Utc::now();
        let snapshot = seed_snapshot(now);

        let dashboard = member_dashboard(&snapshot, now);
        let member = dashboard.member().unwrap();
        assert_eq!(member.name, "John Doe");
        assert_eq!(dashboard.tasks.len(), 1);
        assert!((dashboard.aggregates.average_progress - 60.0).abs() < f64::EPSILON);
        assert_eq!(dashboard.due_soon, 0);
        assert_eq!(dashboard.last_activity(), Some(member.last_activity));
    }

    #[test]
    fn test_member_dashboard_without_match() {
        let now = Utc::now();
        let mut snapshot = seed_snapshot(now);
        snapshot.role.current_user = "Ghost".to_string();

        let dashboard = member_dashboard(&snapshot, now);
        assert!(dashboard.member().is_none());
        assert!(dashboard.tasks.is_empty());
        assert_eq!(dashboard.aggregates.average_progress, 0.0);
        assert_eq!(dashboard.last_activity(), None);
    }

    #[test]
    fn test_calendar_overview() {
        let now = Utc::now();
        let snapshot = seed_snapshot(now);
        let month = MonthCursor::current(now, &Utc);

        let overview = calendar_overview(&snapshot, month, now, &Utc);
        assert_eq!(overview.days.len(), month.days().count());
        assert_eq!(overview.overdue.len(), 1);
        assert_eq!(overview.active_members, 6);
        assert!(overview
            .upcoming
            .windows(2)
            .all(|pair| pair[0].due_date <= pair[1].due_date));
    }

    #[test]
    fn test_settings_summary() {
        let snapshot = seed_snapshot(Utc::now());
        let summary = settings_summary(&snapshot);
        assert_eq!(
            summary,
            SettingsSummary {
                total_members: 7,
                total_tasks: 8,
                completed_tasks: 1,
                active_members: 6,
            }
        );
    }
}
