//! Permission system for dashboard actions
//!
//! The store applies any mutation it is given; the presentation layer asks
//! the matrix which controls to offer for the acting role.

use crate::models::UserRole;

/// Actions offered on the dashboard screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    // Team management
    ViewTeamOverview,
    AddMembers,

    // Task assignment
    AssignTasks,
    DeleteTasks,
    FilterByAssignee,

    // Own work
    UpdateOwnStatus,
    UpdateTaskProgress,
    CompleteTasks,

    // Settings
    SwitchRole,
    EditProfile,
    ChangeTheme,
    ExportData,
}

impl DashboardAction {
    /// Lowercase phrase for messages, e.g. "assign tasks"
    pub fn description(&self) -> &'static str {
        match self {
            DashboardAction::ViewTeamOverview => "view the team overview",
            DashboardAction::AddMembers => "add members",
            DashboardAction::AssignTasks => "assign tasks",
            DashboardAction::DeleteTasks => "delete tasks",
            DashboardAction::FilterByAssignee => "filter tasks by assignee",
            DashboardAction::UpdateOwnStatus => "update their own status",
            DashboardAction::UpdateTaskProgress => "update task progress",
            DashboardAction::CompleteTasks => "complete tasks",
            DashboardAction::SwitchRole => "switch role",
            DashboardAction::EditProfile => "edit the profile",
            DashboardAction::ChangeTheme => "change the theme",
            DashboardAction::ExportData => "export data",
        }
    }
}

/// Permission matrix for user roles
pub struct PermissionMatrix;

impl PermissionMatrix {
    /// Check if a role has permission to perform an action
    pub fn can_perform(role: UserRole, action: DashboardAction) -> bool {
        match action {
            // Lead only
            DashboardAction::ViewTeamOverview
            | DashboardAction::AddMembers
            | DashboardAction::AssignTasks
            | DashboardAction::DeleteTasks
            | DashboardAction::FilterByAssignee => role == UserRole::Lead,

            // Member only
            DashboardAction::UpdateOwnStatus
            | DashboardAction::UpdateTaskProgress
            | DashboardAction::CompleteTasks => role == UserRole::Member,

            // Everyone
            DashboardAction::SwitchRole
            | DashboardAction::EditProfile
            | DashboardAction::ChangeTheme
            | DashboardAction::ExportData => true,
        }
    }
}
