//! Command line arguments

use std::path::PathBuf;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use pulse_core::views::TaskStatusFilter;
use pulse_core::{CountChange, MemberStatus, SortBy, StatusFilter, Theme, UserRole};

#[derive(Parser, Debug)]
#[command(version, about = "Team status and task dashboard")]
pub struct Cli {
    /// Path to config file (default: `<config dir>/pulse/config.toml`)
    #[arg(short, long, env = "PULSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite file holding the dashboard snapshot
    #[arg(short, long, env = "PULSE_DATA")]
    pub data: Option<PathBuf>,

    /// Keep everything in memory; nothing is saved
    #[arg(long, conflicts_with = "data")]
    pub in_memory: bool,

    /// Log filter, e.g. `debug` or `pulse_core=trace`
    #[arg(long, env = "PULSE_LOG")]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Dashboard for the acting role
    Dashboard,

    /// Team member list; filter and sort choices are remembered
    Members {
        #[arg(long)]
        status: Option<StatusFilter>,
        #[arg(long)]
        sort: Option<SortBy>,
    },

    /// Task list for the acting role
    Tasks {
        #[arg(long, default_value = "all")]
        status: TaskStatusFilter,
        /// Member name or id (lead only)
        #[arg(long)]
        assignee: Option<String>,
    },

    /// Month grid with upcoming and overdue tasks
    Calendar {
        /// Month to show as YYYY-MM (default: current month)
        #[arg(long, value_parser = parse_month)]
        month: Option<(i32, u32)>,
    },

    /// Profile, appearance and data summary
    Settings,

    /// Set your own working status
    Status { status: MemberStatus },

    /// Set a task's progress (0-100)
    Progress {
        task: String,
        #[arg(allow_hyphen_values = true)]
        progress: i32,
    },

    /// Nudge a task's progress, e.g. `+10` or `-10`
    Adjust {
        task: String,
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },

    /// Mark a task complete
    Complete { task: String },

    /// Assign a new task
    AddTask {
        #[arg(long)]
        title: String,
        /// Member name or id
        #[arg(long)]
        assignee: String,
        /// YYYY-MM-DD, YYYY-MM-DDTHH:MM, or RFC 3339
        #[arg(long, value_parser = parse_due)]
        due: DateTime<Utc>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a task
    DeleteTask { task: String },

    /// Invite a member
    AddMember { name: String, job_title: String },

    /// Adjust a member's stored task count
    TasksCount {
        member: String,
        #[arg(value_enum)]
        change: CountArg,
    },

    /// Switch the acting role
    Role {
        #[arg(value_enum, default_value = "toggle")]
        role: RoleArg,
    },

    /// Set the acting user's display name
    User { name: String },

    /// Change the theme
    Theme {
        #[arg(value_enum, default_value = "next")]
        theme: ThemeArg,
    },

    /// Write members and tasks to a JSON file
    Export {
        /// Output path (default: `team-pulse-data-<date>.json`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Forget saved data and start over from the sample team
    Reset,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountArg {
    Inc,
    Dec,
}

impl From<CountArg> for CountChange {
    fn from(arg: CountArg) -> Self {
        match arg {
            CountArg::Inc => CountChange::Increment,
            CountArg::Dec => CountChange::Decrement,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleArg {
    Lead,
    Member,
    Toggle,
}

impl RoleArg {
    pub fn resolve(self, current: UserRole) -> UserRole {
        match self {
            RoleArg::Lead => UserRole::Lead,
            RoleArg::Member => UserRole::Member,
            RoleArg::Toggle => current.toggled(),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Light,
    Dark,
    System,
    Next,
}

impl ThemeArg {
    pub fn resolve(self, current: Theme) -> Theme {
        match self {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::System => Theme::System,
            ThemeArg::Next => current.next(),
        }
    }
}

fn parse_month(s: &str) -> Result<(i32, u32), String> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM, got '{}'", s))?;
    Ok((date.year(), date.month()))
}

/// A bare date means midnight UTC of that day
fn parse_due(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(dt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| format!("invalid due date '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-03"), Ok((2024, 3)));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("march").is_err());
    }

    #[test]
    fn test_parse_due() {
        let midnight = Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap();
        assert_eq!(parse_due("2024-03-12"), Ok(midnight));
        assert_eq!(
            parse_due("2024-03-12T17:30"),
            Ok(Utc.with_ymd_and_hms(2024, 3, 12, 17, 30, 0).unwrap())
        );
        assert_eq!(
            parse_due("2024-03-12T17:30:00+02:00"),
            Ok(Utc.with_ymd_and_hms(2024, 3, 12, 15, 30, 0).unwrap())
        );
        assert!(parse_due("next tuesday").is_err());
    }

    #[test]
    fn test_parse_commands() {
        let cli = Cli::parse_from(["pulse", "adjust", "abc", "-10"]);
        assert_eq!(cli.command, Command::Adjust { task: "abc".into(), delta: -10 });

        let cli = Cli::parse_from(["pulse", "members", "--status", "break", "--sort", "tasks"]);
        assert_eq!(
            cli.command,
            Command::Members {
                status: Some(StatusFilter::Only(MemberStatus::Break)),
                sort: Some(SortBy::Tasks),
            }
        );

        let cli = Cli::parse_from(["pulse", "role"]);
        assert_eq!(cli.command, Command::Role { role: RoleArg::Toggle });
    }

    #[test]
    fn test_role_and_theme_args() {
        assert_eq!(RoleArg::Toggle.resolve(UserRole::Member), UserRole::Lead);
        assert_eq!(RoleArg::Member.resolve(UserRole::Member), UserRole::Member);
        assert_eq!(ThemeArg::Next.resolve(Theme::System), Theme::Light);
        assert_eq!(ThemeArg::Dark.resolve(Theme::Light), Theme::Dark);
    }
}
