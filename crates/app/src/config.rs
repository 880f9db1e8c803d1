//! Configuration for the pulse driver
//!
//! Priority (highest first): CLI flags, `config.toml` in the project config
//! directory, compiled defaults. A missing default config file is not an
//! error; an explicit `--config` path that cannot be read is.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use pulse_core::UserRole;
use serde::Deserialize;

use crate::cli::Cli;

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "pulse.db";
const DEFAULT_LOG_FILTER: &str = "info";

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("could not determine the pulse data directory")]
    NoProjectDirs,
}

/// On-disk config file; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    data_path: Option<PathBuf>,
    log_filter: Option<String>,
    session: SessionConfig,
}

/// `[session]` section, applied only when starting from seed data
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub role: Option<UserRole>,
    pub user: Option<String>,
}

/// Where the snapshot lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    File(PathBuf),
    /// Nothing is written to disk
    Memory,
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub data: DataLocation,
    pub log_filter: String,
    pub session: SessionConfig,
}

impl Config {
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("dev", "pulse", "pulse");
        let file = match cli.config.as_deref() {
            Some(path) => read_config_file(path)?,
            None => match &dirs {
                Some(dirs) => read_optional_config_file(&dirs.config_dir().join(CONFIG_FILE))?,
                None => ConfigFile::default(),
            },
        };

        let default_db = dirs.map(|d| d.data_dir().join(DATABASE_FILE));
        Self::resolve(cli, file, default_db)
    }

    fn resolve(cli: &Cli, file: ConfigFile, default_db: Option<PathBuf>) -> Result<Self, ConfigError> {
        let data = if cli.in_memory {
            DataLocation::Memory
        } else {
            let path = cli
                .data
                .clone()
                .or(file.data_path)
                .or(default_db)
                .ok_or(ConfigError::NoProjectDirs)?;
            DataLocation::File(path)
        };

        Ok(Self {
            data,
            log_filter: cli
                .log_filter
                .clone()
                .or(file.log_filter)
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            session: file.session,
        })
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&contents)?)
}

fn read_optional_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(source) => Err(ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("pulse").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_full_file() {
        let file: ConfigFile = toml::from_str(
            r#"
data_path = "/var/lib/pulse/pulse.db"
log_filter = "pulse_core=debug"

[session]
role = "lead"
user = "Sarah Wilson"
"#,
        )
        .unwrap();

        let config = Config::resolve(&cli(&["settings"]), file, None).unwrap();
        assert_eq!(config.data, DataLocation::File("/var/lib/pulse/pulse.db".into()));
        assert_eq!(config.log_filter, "pulse_core=debug");
        assert_eq!(config.session.role, Some(UserRole::Lead));
        assert_eq!(config.session.user.as_deref(), Some("Sarah Wilson"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file: ConfigFile = toml::from_str("").unwrap();
        let config = Config::resolve(&cli(&["settings"]), file, Some("/tmp/pulse.db".into())).unwrap();

        assert_eq!(config.data, DataLocation::File("/tmp/pulse.db".into()));
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file: ConfigFile = toml::from_str(
            r#"
data_path = "/from/file.db"
log_filter = "warn"
"#,
        )
        .unwrap();
        let args = cli(&["--data", "/from/cli.db", "--log-filter", "debug", "settings"]);

        let config = Config::resolve(&args, file, None).unwrap();
        assert_eq!(config.data, DataLocation::File("/from/cli.db".into()));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_in_memory_flag() {
        let config = Config::resolve(&cli(&["--in-memory", "settings"]), ConfigFile::default(), None).unwrap();
        assert_eq!(config.data, DataLocation::Memory);
    }

    #[test]
    fn test_no_data_location() {
        let result = Config::resolve(&cli(&["settings"]), ConfigFile::default(), None);
        assert!(matches!(result, Err(ConfigError::NoProjectDirs)));
    }

    #[test]
    fn test_invalid_role_rejected() {
        let result: Result<ConfigFile, _> = toml::from_str("[session]\nrole = \"admin\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = read_config_file(Path::new("/nonexistent/pulse/config.toml"));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn test_default_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = read_optional_config_file(&dir.path().join(CONFIG_FILE)).unwrap();
        assert!(file.data_path.is_none());
    }
}
