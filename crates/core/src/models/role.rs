//! Acting role, current user, and theme

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Display name of the acting user in a fresh workspace
pub const DEFAULT_USER: &str = "John Doe";

/// The viewpoint the dashboard is used from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Lead,
    #[default]
    Member,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Lead => "lead",
            UserRole::Member => "member",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Lead => "Team Lead",
            UserRole::Member => "Team Member",
        }
    }

    /// The other role, used by the header's quick switch
    pub fn toggled(&self) -> Self {
        match self {
            UserRole::Lead => UserRole::Member,
            UserRole::Member => UserRole::Lead,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lead" => Ok(UserRole::Lead),
            "member" => Ok(UserRole::Member),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Who is using the dashboard and in which role.
///
/// `current_user` is a display name, matched against member names to find
/// the acting member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleState {
    pub current_role: UserRole,
    pub current_user: String,
}

impl Default for RoleState {
    fn default() -> Self {
        Self {
            current_role: UserRole::default(),
            current_user: DEFAULT_USER.to_string(),
        }
    }
}

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    /// Next theme in the toggle cycle: light, dark, system
    pub fn next(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}
