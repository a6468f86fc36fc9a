//! Server configuration.
//!
//! Loaded from `exam-schedule.toml` (or the file named by
//! `EXAM_SCHEDULE_CONFIG`), then overridden by `HOST` and `PORT`:
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [scheduling]
//! offset_convention = "iana"
//!
//! [[sessions]]
//! token = "dev-admin-token"
//! user_id = "admin-1"
//! role = "admin"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{OffsetConvention, SastClock};
use crate::services::Role;

pub const DEFAULT_CONFIG_FILE: &str = "exam-schedule.toml";
pub const CONFIG_PATH_ENV: &str = "EXAM_SCHEDULE_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub scheduling: SchedulingSettings,
    #[serde(default)]
    pub sessions: Vec<SessionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingSettings {
    #[serde(default)]
    pub offset_convention: OffsetConvention,
}

/// A pre-issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub token: String,
    pub user_id: String,
    pub role: Role,
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load from `EXAM_SCHEDULE_CONFIG` or `exam-schedule.toml`, then apply
    /// environment overrides.
    ///
    /// A missing default file yields defaults. A missing file named by
    /// `EXAM_SCHEDULE_CONFIG` is an error.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(PathBuf::from(path))?,
            Err(_) => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// `HOST` and `PORT` take precedence over the file. An unparsable `PORT`
    /// is ignored with a warning.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(port = %port, "Ignoring invalid PORT"),
            }
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn clock(&self) -> SastClock {
        SastClock::new(self.scheduling.offset_convention)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.clock().convention(), OffsetConvention::Iana);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
port = 9090

[scheduling]
offset_convention = "legacy-inverted"

[[sessions]]
token = "t-1"
user_id = "admin-1"
role = "admin"

[[sessions]]
token = "t-2"
user_id = "s-7"
role = "student"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(
            config.scheduling.offset_convention,
            OffsetConvention::LegacyInverted
        );
        assert_eq!(config.sessions.len(), 2);
        assert_eq!(config.sessions[1].role, Role::Student);
    }

    #[test]
    fn test_unknown_role_fails() {
        let err = toml::from_str::<AppConfig>(
            r#"
[[sessions]]
token = "t"
user_id = "u"
role = "lecturer"
"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::from_file(dir.path().join("absent.toml")).is_err());
    }
}
