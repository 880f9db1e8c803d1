//! Command execution and text rendering
//!
//! Each command reads the board through the core views or dispatches one
//! mutation, after checking the permission matrix for the acting role.

use std::fmt::Display;
use std::io::Write;

use chrono::{DateTime, TimeZone, Utc};
use pulse_core::views::{
    aggregate_tasks, assignee_name, calendar_overview, filter_tasks, lead_dashboard,
    member_dashboard, member_list, resolve_current_member, settings_summary, MemberMatch,
    MonthCursor, TaskQuery,
};
use pulse_core::{
    export_file_name, Board, DashboardAction, KeyValueStore, Member, MemberId, Mutation,
    NewMember, NewTask, Outcome, PermissionMatrix, Snapshot, Task, TaskId, UserRole,
};
use tracing::{info, warn};

use crate::cli::Command;

const SHORT_ID_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Core(#[from] pulse_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("the {} role cannot {}", .role.as_str(), .action.description())]
    NotPermitted {
        role: UserRole,
        action: DashboardAction,
    },

    #[error("no team member named '{0}'")]
    UnknownMember(String),

    #[error("no task matching '{0}'")]
    UnknownTask(String),

    #[error("'{prefix}' matches {matches} tasks; use more of the id")]
    AmbiguousTask { prefix: String, matches: usize },

    #[error("{0}")]
    InvalidInput(String),
}

pub type CommandResult = std::result::Result<(), CommandError>;

/// Run one command against the board, writing human-readable output to `out`
pub fn run<K, Tz, W>(
    board: &mut Board<K>,
    command: Command,
    now: DateTime<Utc>,
    tz: &Tz,
    out: &mut W,
) -> CommandResult
where
    K: KeyValueStore,
    Tz: TimeZone,
    Tz::Offset: Display,
    W: Write,
{
    match command {
        Command::Dashboard => show_dashboard(board.snapshot(), now, tz, out),
        Command::Members { status, sort } => {
            if let Some(filter) = status {
                board.dispatch_at(Mutation::SetStatusFilter(filter), now);
            }
            if let Some(sort_by) = sort {
                board.dispatch_at(Mutation::SetSortBy(sort_by), now);
            }
            show_members(board.snapshot(), now, out)
        }
        Command::Tasks { status, assignee } => {
            let snapshot = board.snapshot();
            let assignee = match assignee {
                Some(arg) => {
                    require(snapshot, DashboardAction::FilterByAssignee)?;
                    Some(find_member(snapshot, &arg)?)
                }
                None => None,
            };
            show_tasks(snapshot, &TaskQuery { status, assignee }, now, tz, out)
        }
        Command::Calendar { month } => {
            let cursor = match month {
                Some((year, month)) => MonthCursor::new(year, month)
                    .ok_or_else(|| CommandError::InvalidInput(format!("invalid month {}-{}", year, month)))?,
                None => MonthCursor::current(now, tz),
            };
            show_calendar(board.snapshot(), cursor, now, tz, out)
        }
        Command::Settings => show_settings(board.snapshot(), board.last_saved()?, tz, out),
        Command::Status { status } => {
            require(board.snapshot(), DashboardAction::UpdateOwnStatus)?;
            let member_id = acting_member(board.snapshot())?;
            let outcome = board.dispatch_at(Mutation::UpdateMemberStatus { member_id, status }, now);
            report(out, outcome, format_args!("Status set to {}", status.display_name()), "member")
        }
        Command::Progress { task, progress } => {
            let task_id = own_task(board.snapshot(), &task, DashboardAction::UpdateTaskProgress)?;
            let outcome = board.dispatch_at(Mutation::UpdateTaskProgress { task_id, progress }, now);
            report_progress(board.snapshot(), out, outcome, task_id)
        }
        Command::Adjust { task, delta } => {
            let task_id = own_task(board.snapshot(), &task, DashboardAction::UpdateTaskProgress)?;
            let outcome = board.dispatch_at(Mutation::AdjustTaskProgress { task_id, delta }, now);
            report_progress(board.snapshot(), out, outcome, task_id)
        }
        Command::Complete { task } => {
            let task_id = own_task(board.snapshot(), &task, DashboardAction::CompleteTasks)?;
            let outcome = board.dispatch_at(Mutation::MarkTaskComplete(task_id), now);
            report_progress(board.snapshot(), out, outcome, task_id)
        }
        Command::AddTask {
            title,
            assignee,
            due,
            description,
        } => {
            require(board.snapshot(), DashboardAction::AssignTasks)?;
            let assigned_to = find_member(board.snapshot(), &assignee)?;
            let mut new_task = NewTask::new(&title, assigned_to, due)
                .ok_or_else(|| CommandError::InvalidInput("task title cannot be blank".to_string()))?;
            if let Some(description) = description {
                new_task = new_task.with_description(description);
            }

            let task_id = board.add_task(new_task, now);
            let name = assignee_name(&board.snapshot().members, assigned_to);
            writeln!(out, "Added task {} for {}", short_id(task_id), name)?;
            Ok(())
        }
        Command::DeleteTask { task } => {
            require(board.snapshot(), DashboardAction::DeleteTasks)?;
            let task_id = find_task(board.snapshot(), &task)?;
            let outcome = board.dispatch_at(Mutation::DeleteTask(task_id), now);
            report(out, outcome, format_args!("Deleted task {}", short_id(task_id)), "task")
        }
        Command::AddMember { name, job_title } => {
            require(board.snapshot(), DashboardAction::AddMembers)?;
            let new_member = NewMember::invite(&name, &job_title, now).ok_or_else(|| {
                CommandError::InvalidInput("name and job title are required".to_string())
            })?;
            let email = new_member.email.clone();
            let member_id = board.add_member(new_member);
            writeln!(out, "Invited {} <{}> as {}", name.trim(), email, member_id)?;
            Ok(())
        }
        Command::TasksCount { member, change } => {
            require(board.snapshot(), DashboardAction::AssignTasks)?;
            let member_id = find_member(board.snapshot(), &member)?;
            let outcome = board.dispatch_at(
                Mutation::UpdateTasksCount {
                    member_id,
                    change: change.into(),
                },
                now,
            );
            let count = board.snapshot().member(member_id).map_or(0, |m| m.tasks_count);
            report(out, outcome, format_args!("Task count is now {}", count), "member")
        }
        Command::Role { role } => {
            require(board.snapshot(), DashboardAction::SwitchRole)?;
            let role = role.resolve(board.snapshot().role.current_role);
            board.dispatch_at(Mutation::SwitchRole(role), now);
            writeln!(out, "Now acting as {}", role)?;
            Ok(())
        }
        Command::User { name } => {
            require(board.snapshot(), DashboardAction::EditProfile)?;
            let name = name.trim();
            if name.is_empty() {
                return Err(CommandError::InvalidInput("name cannot be blank".to_string()));
            }
            board.dispatch_at(Mutation::SetUser(name.to_string()), now);
            writeln!(out, "Current user is {}", name)?;
            if let MemberMatch::None = resolve_current_member(&board.snapshot().members, name) {
                writeln!(out, "Note: no team member has that name, so the member views will be empty")?;
            }
            Ok(())
        }
        Command::Theme { theme } => {
            require(board.snapshot(), DashboardAction::ChangeTheme)?;
            let theme = theme.resolve(board.snapshot().theme);
            board.dispatch_at(Mutation::SetTheme(theme), now);
            writeln!(out, "Theme set to {}", theme)?;
            Ok(())
        }
        Command::Export { output } => {
            require(board.snapshot(), DashboardAction::ExportData)?;
            let document = board.export(now);
            let path = output.unwrap_or_else(|| export_file_name(now).into());
            std::fs::write(&path, document.to_json_pretty()?)?;
            info!(path = %path.display(), "Exported team data");
            writeln!(
                out,
                "Exported {} members and {} tasks to {}",
                document.members.len(),
                document.tasks.len(),
                path.display()
            )?;
            Ok(())
        }
        Command::Reset => {
            board.reset(now)?;
            writeln!(out, "Saved data cleared; starting over with the sample team")?;
            Ok(())
        }
    }
}

fn require(snapshot: &Snapshot, action: DashboardAction) -> CommandResult {
    let role = snapshot.role.current_role;
    if PermissionMatrix::can_perform(role, action) {
        Ok(())
    } else {
        Err(CommandError::NotPermitted { role, action })
    }
}

/// The member the current user name resolves to
fn acting_member(snapshot: &Snapshot) -> Result<MemberId, CommandError> {
    let user = &snapshot.role.current_user;
    let found = resolve_current_member(&snapshot.members, user);
    if let MemberMatch::Ambiguous { matches, .. } = found {
        warn!(user = %user, matches, "Several members share the current user's name, using the first");
    }
    found
        .member()
        .map(|m| m.id)
        .ok_or_else(|| CommandError::UnknownMember(user.clone()))
}

/// A member id, or a member name (first match)
fn find_member(snapshot: &Snapshot, arg: &str) -> Result<MemberId, CommandError> {
    if let Ok(id) = arg.parse::<MemberId>() {
        return Ok(id);
    }
    let found = resolve_current_member(&snapshot.members, arg);
    if let MemberMatch::Ambiguous { matches, .. } = found {
        warn!(name = %arg, matches, "Several members share this name, using the first");
    }
    found
        .member()
        .map(|m| m.id)
        .ok_or_else(|| CommandError::UnknownMember(arg.to_string()))
}

/// A full task id, or an unambiguous prefix of one
fn find_task(snapshot: &Snapshot, arg: &str) -> Result<TaskId, CommandError> {
    if let Ok(id) = arg.parse::<TaskId>() {
        return Ok(id);
    }
    let prefix = arg.to_lowercase();
    let matches: Vec<TaskId> = snapshot
        .tasks
        .iter()
        .map(|t| t.id)
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CommandError::UnknownTask(arg.to_string())),
        _ => Err(CommandError::AmbiguousTask {
            prefix: arg.to_string(),
            matches: matches.len(),
        }),
    }
}

/// Find a task the acting member may work on; members only touch their own
fn own_task(snapshot: &Snapshot, arg: &str, action: DashboardAction) -> Result<TaskId, CommandError> {
    require(snapshot, action)?;
    let task_id = find_task(snapshot, arg)?;
    let member_id = acting_member(snapshot)?;
    match snapshot.task(task_id) {
        Some(task) if task.assigned_to != member_id => Err(CommandError::NotPermitted {
            role: snapshot.role.current_role,
            action,
        }),
        _ => Ok(task_id),
    }
}

fn report<W: Write>(out: &mut W, outcome: Outcome, applied: std::fmt::Arguments<'_>, kind: &str) -> CommandResult {
    match outcome {
        Outcome::Applied => writeln!(out, "{}", applied)?,
        Outcome::NotFound => writeln!(out, "No such {}; nothing changed", kind)?,
    }
    Ok(())
}

fn report_progress<W: Write>(snapshot: &Snapshot, out: &mut W, outcome: Outcome, task_id: TaskId) -> CommandResult {
    match (outcome, snapshot.task(task_id)) {
        (Outcome::Applied, Some(task)) => {
            writeln!(out, "{}: {}% {}", task.title, task.progress, progress_bar(task.progress))?;
            if task.completed {
                writeln!(out, "Completed")?;
            }
        }
        _ => writeln!(out, "No such task; nothing changed")?,
    }
    Ok(())
}

fn short_id(id: TaskId) -> String {
    id.to_string().chars().take(SHORT_ID_LEN).collect()
}

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress / 10);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(10 - filled))
}

fn member_line(member: &Member, now: DateTime<Utc>) -> String {
    let recent = if member.is_recently_active(now) { " *" } else { "" };
    format!(
        "{:<16} {:<12} {:>2} tasks  {}{}",
        member.name,
        member.status.display_name(),
        member.tasks_count,
        member.job_title,
        recent
    )
}

fn task_line<Tz>(snapshot: &Snapshot, task: &Task, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{}  {:<32} {:>3}% {:<11} due {}  {}",
        short_id(task.id),
        task.title,
        task.progress,
        task.badge(now).display_name(),
        task.due_date.with_timezone(tz).format("%Y-%m-%d %H:%M"),
        assignee_name(&snapshot.members, task.assigned_to)
    )
}

/// Round half up before display; `{:.0}` alone rounds 62.5 down to 62
fn percent(value: f64) -> f64 {
    value.round()
}

fn show_dashboard<Tz, W>(snapshot: &Snapshot, now: DateTime<Utc>, tz: &Tz, out: &mut W) -> CommandResult
where
    Tz: TimeZone,
    Tz::Offset: Display,
    W: Write,
{
    match snapshot.role.current_role {
        UserRole::Lead => {
            let dashboard = lead_dashboard(snapshot, now);
            writeln!(out, "Team overview ({} members)", dashboard.status_counts.total())?;
            for (status, count) in dashboard.status_counts.iter() {
                let share = percent(dashboard.status_counts.share(status) * 100.0);
                writeln!(out, "  {:<12} {:>2}  {:>3.0}%", status.display_name(), count, share)?;
            }
            writeln!(
                out,
                "Tasks: {} total, {} completed, {} overdue, {:.0}% average progress",
                dashboard.tasks.total,
                dashboard.tasks.completed,
                dashboard.tasks.overdue,
                percent(dashboard.tasks.average_progress)
            )?;
            writeln!(out)?;
            for member in dashboard.members {
                writeln!(out, "{}", member_line(member, now))?;
            }
        }
        UserRole::Member => {
            let dashboard = member_dashboard(snapshot, now);
            let Some(member) = dashboard.member() else {
                writeln!(out, "No team member is named '{}'", snapshot.role.current_user)?;
                return Ok(());
            };
            if dashboard.current.is_ambiguous() {
                warn!(user = %member.name, "Several members share the current user's name, using the first");
            }
            writeln!(out, "{} ({})", member.name, member.job_title)?;
            writeln!(out, "Status: {}", member.status.display_name())?;
            if let Some(last) = dashboard.last_activity() {
                writeln!(out, "Last activity: {}", last.with_timezone(tz).format("%Y-%m-%d %H:%M"))?;
            }
            writeln!(
                out,
                "Tasks: {}/{} completed, {:.0}% average progress, {} due soon",
                dashboard.aggregates.completed,
                dashboard.aggregates.total,
                percent(dashboard.aggregates.average_progress),
                dashboard.due_soon
            )?;
            writeln!(out)?;
            for task in dashboard.tasks {
                writeln!(out, "{}", task_line(snapshot, task, now, tz))?;
            }
        }
    }
    Ok(())
}

fn show_members<W: Write>(snapshot: &Snapshot, now: DateTime<Utc>, out: &mut W) -> CommandResult {
    let view = snapshot.member_view;
    let members = member_list(&snapshot.members, view);
    writeln!(
        out,
        "{} of {} members (status: {}, sorted by {})",
        members.len(),
        snapshot.members.len(),
        view.status_filter,
        view.sort_by
    )?;
    for member in members {
        writeln!(out, "{}", member_line(member, now))?;
    }
    Ok(())
}

fn show_tasks<Tz, W>(snapshot: &Snapshot, query: &TaskQuery, now: DateTime<Utc>, tz: &Tz, out: &mut W) -> CommandResult
where
    Tz: TimeZone,
    Tz::Offset: Display,
    W: Write,
{
    if snapshot.role.current_role == UserRole::Member
        && resolve_current_member(&snapshot.members, &snapshot.role.current_user).member().is_none()
    {
        writeln!(out, "No team member is named '{}'", snapshot.role.current_user)?;
        return Ok(());
    }

    let tasks = filter_tasks(snapshot, query, now);
    let aggregates = aggregate_tasks(tasks.iter().copied(), now);
    writeln!(
        out,
        "{} tasks ({}), {} completed, {:.0}% average progress",
        aggregates.total, query.status, aggregates.completed, percent(aggregates.average_progress)
    )?;
    for task in tasks {
        writeln!(out, "{}", task_line(snapshot, task, now, tz))?;
    }
    Ok(())
}

fn show_calendar<Tz, W>(
    snapshot: &Snapshot,
    month: MonthCursor,
    now: DateTime<Utc>,
    tz: &Tz,
    out: &mut W,
) -> CommandResult
where
    Tz: TimeZone,
    Tz::Offset: Display,
    W: Write,
{
    let overview = calendar_overview(snapshot, month, now, tz);
    writeln!(
        out,
        "{}  (prev {}-{:02}, next {}-{:02})",
        overview.month.first_day().format("%B %Y"),
        month.previous().year(),
        month.previous().month(),
        month.next().year(),
        month.next().month()
    )?;
    for day in overview.days.iter().filter(|d| !d.tasks.is_empty()) {
        for task in &day.tasks {
            writeln!(
                out,
                "  {}  {} ({})",
                day.date.format("%a %d"),
                task.title,
                assignee_name(&snapshot.members, task.assigned_to)
            )?;
        }
    }

    writeln!(out, "\nUpcoming (next 7 days)")?;
    if overview.upcoming.is_empty() {
        writeln!(out, "  none")?;
    }
    for task in &overview.upcoming {
        writeln!(out, "  {}", task_line(snapshot, task, now, tz))?;
    }

    writeln!(out, "\nOverdue")?;
    if overview.overdue.is_empty() {
        writeln!(out, "  none")?;
    }
    for task in &overview.overdue {
        writeln!(out, "  {}", task_line(snapshot, task, now, tz))?;
    }

    writeln!(out, "\nActive members: {}", overview.active_members)?;
    Ok(())
}

fn show_settings<Tz, W>(snapshot: &Snapshot, last_saved: Option<DateTime<Utc>>, tz: &Tz, out: &mut W) -> CommandResult
where
    Tz: TimeZone,
    Tz::Offset: Display,
    W: Write,
{
    let summary = settings_summary(snapshot);
    writeln!(out, "User:    {}", snapshot.role.current_user)?;
    writeln!(out, "Role:    {}", snapshot.role.current_role)?;
    writeln!(out, "Theme:   {}", snapshot.theme)?;
    writeln!(
        out,
        "Members: {} ({} active)",
        summary.total_members, summary.active_members
    )?;
    writeln!(
        out,
        "Tasks:   {} ({} completed)",
        summary.total_tasks, summary.completed_tasks
    )?;
    match last_saved {
        Some(at) => writeln!(out, "Saved:   {}", at.with_timezone(tz).format("%Y-%m-%d %H:%M"))?,
        None => writeln!(out, "Saved:   not on disk")?,
    }
    Ok(())
}
