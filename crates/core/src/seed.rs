//! Built-in starter data
//!
//! Used when no persisted snapshot exists or the persisted one is unusable.
//! Times are relative to `now` so the dashboard always has something due.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::{
    Member, MemberId, MemberStatus, RoleState, Task, TaskId, Theme, DEFAULT_ASSIGNED_BY,
};
use crate::store::{MemberViewState, Snapshot};

/// Fixed id of the n-th seeded member (1-based)
pub fn seed_member_id(n: u128) -> MemberId {
    MemberId(Uuid::from_u128(n))
}

/// Fixed id of the n-th seeded task (1-based)
pub fn seed_task_id(n: u128) -> TaskId {
    TaskId(Uuid::from_u128(0x1000 + n))
}

#[allow(clippy::too_many_arguments)]
fn member(
    n: u128,
    name: &str,
    email: &str,
    avatar: &str,
    job_title: &str,
    status: MemberStatus,
    last_activity: DateTime<Utc>,
    tasks_count: u32,
) -> Member {
    Member {
        id: seed_member_id(n),
        name: name.to_string(),
        email: email.to_string(),
        avatar: avatar.to_string(),
        job_title: job_title.to_string(),
        status,
        last_activity,
        tasks_count,
    }
}

fn task(
    n: u128,
    title: &str,
    description: &str,
    assignee: u128,
    due_date: DateTime<Utc>,
    progress: u8,
    created_at: DateTime<Utc>,
) -> Task {
    Task {
        id: seed_task_id(n),
        title: title.to_string(),
        description: Some(description.to_string()),
        assigned_to: seed_member_id(assignee),
        assigned_by: DEFAULT_ASSIGNED_BY.to_string(),
        due_date,
        progress,
        completed: progress == 100,
        created_at,
    }
}

pub fn seed_members(now: DateTime<Utc>) -> Vec<Member> {
    use MemberStatus::*;

    vec![
        member(1, "John Doe", "john@example.com", "👨‍💻", "Full Stack Developer", Working, now, 3),
        member(2, "Sarah Wilson", "sarah@example.com", "👩‍💼", "Project Manager", Meeting, now, 2),
        member(3, "Mike Chen", "mike@example.com", "👨‍🔬", "UI/UX Designer", Break, now, 1),
        member(4, "Emily Davis", "emily@example.com", "👩‍🎨", "Frontend Developer", Working, now, 4),
        member(
            5,
            "Alex Rodriguez",
            "alex@example.com",
            "👨‍💼",
            "Backend Developer",
            Offline,
            now - Duration::minutes(30),
            0,
        ),
        member(6, "Lisa Kim", "lisa@example.com", "👩‍💻", "QA Engineer", Working, now, 2),
        member(7, "David Thompson", "david@example.com", "👨‍🔧", "DevOps Engineer", Meeting, now, 1),
    ]
}

pub fn seed_tasks(now: DateTime<Utc>) -> Vec<Task> {
    let days = Duration::days;

    vec![
        task(
            1,
            "Implement responsive navigation",
            "Create a mobile-friendly navigation component with proper accessibility",
            1,
            now + days(3),
            60,
            now,
        ),
        task(
            2,
            "Design dashboard wireframes",
            "Create wireframes for the new dashboard layout and user flows",
            2,
            now + days(2),
            30,
            now,
        ),
        task(
            3,
            "API performance optimization",
            "Optimize database queries and implement caching for better performance",
            5,
            now + days(1),
            90,
            now,
        ),
        task(
            4,
            "Setup CI/CD pipeline",
            "Configure automated testing and deployment pipeline",
            7,
            now + days(5),
            45,
            now,
        ),
        task(
            5,
            "User interface testing",
            "Write comprehensive UI tests for critical user journeys",
            6,
            now + days(4),
            20,
            now,
        ),
        task(
            6,
            "Frontend component library",
            "Build reusable component library with Storybook documentation",
            4,
            now + days(7),
            75,
            now,
        ),
        task(
            7,
            "Database optimization",
            "Optimize database schema and add proper indexing",
            5,
            now - days(1),
            85,
            now - days(10),
        ),
        task(
            8,
            "Security audit report",
            "Complete security assessment and vulnerability testing",
            6,
            now + days(6),
            100,
            now - days(5),
        ),
    ]
}

/// Complete starter snapshot
pub fn seed_snapshot(now: DateTime<Utc>) -> Snapshot {
    Snapshot {
        members: seed_members(now),
        member_view: MemberViewState::default(),
        tasks: seed_tasks(now),
        role: RoleState::default(),
        theme: Theme::default(),
    }
}
