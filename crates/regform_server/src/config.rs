//! Environment-driven process configuration.

use std::{net::SocketAddr, path::PathBuf};

use anyhow::{bail, Context, Result};
use regform_core::db::{open_db, open_db_in_memory, DbResult};
use rusqlite::Connection;

const IN_MEMORY_MARKER: &str = ":memory:";

/// Where the registration table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    InMemory,
    File(PathBuf),
}

impl DatabaseLocation {
    fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            bail!("REGFORM_DATABASE_PATH cannot be empty");
        }
        if trimmed == IN_MEMORY_MARKER {
            return Ok(Self::InMemory);
        }
        Ok(Self::File(PathBuf::from(trimmed)))
    }

    /// Opens and migrates the configured database.
    pub fn open(&self) -> DbResult<Connection> {
        match self {
            Self::InMemory => open_db_in_memory(),
            Self::File(path) => open_db(path),
        }
    }
}

impl std::fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InMemory => f.write_str(IN_MEMORY_MARKER),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database: DatabaseLocation,
    pub log_level: String,
    /// Absolute directory for rolling log files; stderr when `None`.
    pub log_dir: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env_string =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_addr = env_string("REGFORM_BIND_ADDR", "127.0.0.1:8080")
            .parse::<SocketAddr>()
            .context("REGFORM_BIND_ADDR must be a valid host:port")?;

        let database = DatabaseLocation::parse(&env_string(
            "REGFORM_DATABASE_PATH",
            "regform.sqlite3",
        ))?;

        let log_level = env_string("REGFORM_LOG_LEVEL", regform_core::default_log_level());
        let log_dir = lookup("REGFORM_LOG_DIR").filter(|value| !value.trim().is_empty());

        Ok(Self {
            bind_addr,
            database,
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DatabaseLocation};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(
            config.database,
            DatabaseLocation::File(PathBuf::from("regform.sqlite3"))
        );
        assert_eq!(config.log_level, regform_core::default_log_level());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn memory_marker_selects_in_memory_database() {
        let config = config_from(&[
            ("REGFORM_DATABASE_PATH", ":memory:"),
            ("REGFORM_LOG_DIR", "  "),
        ])
        .unwrap();

        assert_eq!(config.database, DatabaseLocation::InMemory);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let err = config_from(&[("REGFORM_BIND_ADDR", "nowhere")]).unwrap_err();
        assert!(err.to_string().contains("REGFORM_BIND_ADDR"));
    }
}
