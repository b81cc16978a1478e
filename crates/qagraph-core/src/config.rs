//! Configuration management for qagraph tools.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`QAGRAPH__` prefix, `__` separator)
//! 2. Config file (`qagraph.toml` or any format `config` understands)
//! 3. Defaults
//!
//! Each tool reads its own section (`[neo4j]`, `[ingest]`) with
//! [`load_section`].

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::QaGraphError;

/// Environment variable prefix for all settings.
pub const ENV_PREFIX: &str = "QAGRAPH";

/// Default config file prefix (resolved to `qagraph.toml`, `qagraph.yaml`, ...).
pub const DEFAULT_FILE_PREFIX: &str = "qagraph";

/// Connection settings for the Neo4j store.
///
/// Loaded from the `[neo4j]` section or `QAGRAPH__NEO4J__*` variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Neo4jSettings {
    /// Bolt URI, scheme included (e.g. `bolt://localhost:7687`).
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    /// No default credential ships with the tool.
    #[serde(default)]
    pub password: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> u32 {
    1
}

fn default_fetch_size() -> usize {
    200
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: String::new(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

impl Neo4jSettings {
    /// Reject settings that can never produce a working connection.
    pub fn validate(&self) -> Result<(), QaGraphError> {
        if self.uri.trim().is_empty() {
            return Err(QaGraphError::Config("neo4j.uri must not be empty".into()));
        }
        if !self.uri.contains("://") {
            return Err(QaGraphError::Config(format!(
                "neo4j.uri must include a scheme (e.g. bolt://): {}",
                self.uri
            )));
        }
        if self.max_connections == 0 {
            return Err(QaGraphError::Config(
                "neo4j.max_connections must be at least 1".into(),
            ));
        }
        if self.password.is_empty() {
            tracing::warn!("neo4j.password is empty; set QAGRAPH__NEO4J__PASSWORD");
        }
        Ok(())
    }
}

/// Load one section of the layered configuration.
///
/// A missing section yields `T::default()`; a present but malformed one is an
/// error. Environment values stay strings until deserialization, so numeric
/// fields still parse while text such as a password is taken verbatim.
pub fn load_section<T>(file_prefix: &str, section: &str) -> Result<T, QaGraphError>
where
    T: DeserializeOwned + Default,
{
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    match cfg.get::<T>(section) {
        Ok(value) => Ok(value),
        Err(config::ConfigError::NotFound(_)) => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_neo4j_settings() {
        let settings = Neo4jSettings::default();
        assert_eq!(settings.uri, "bolt://localhost:7687");
        assert_eq!(settings.user, "neo4j");
        assert!(settings.password.is_empty());
        assert_eq!(settings.max_connections, 1);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_uri() {
        let settings = Neo4jSettings {
            uri: "localhost:7687".into(),
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(QaGraphError::Config(_))));

        let settings = Neo4jSettings {
            uri: "  ".into(),
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(QaGraphError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_connections() {
        let settings = Neo4jSettings {
            max_connections: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_section_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.toml"),
            "[neo4j]\nuri = \"neo4j://graph.internal:7687\"\nuser = \"ingest\"\npassword = \"s3cret\"\n",
        )
        .unwrap();
        let prefix = dir.path().join("settings");

        let settings: Neo4jSettings = load_section(prefix.to_str().unwrap(), "neo4j").unwrap();
        assert_eq!(settings.uri, "neo4j://graph.internal:7687");
        assert_eq!(settings.user, "ingest");
        assert_eq!(settings.password, "s3cret");
        // Unset keys fall back to serde defaults.
        assert_eq!(settings.fetch_size, 200);
    }

    #[test]
    fn test_missing_file_and_section_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("absent");

        let settings: Neo4jSettings = load_section(prefix.to_str().unwrap(), "neo4j").unwrap();
        assert_eq!(settings, Neo4jSettings::default());
    }

    #[test]
    fn test_malformed_section_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("bad.toml"),
            "[neo4j]\nmax_connections = \"many\"\n",
        )
        .unwrap();
        let prefix = dir.path().join("bad");

        let result: Result<Neo4jSettings, _> = load_section(prefix.to_str().unwrap(), "neo4j");
        assert!(matches!(result, Err(QaGraphError::Settings(_))));
    }

    #[test]
    fn test_env_password_kept_verbatim() {
        // Own section name so no other test sees these variables.
        std::env::set_var("QAGRAPH__NEO4J_ENV__PASSWORD", "007123");
        std::env::set_var("QAGRAPH__NEO4J_ENV__FETCH_SIZE", "50");
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("absent");

        let settings: Neo4jSettings = load_section(prefix.to_str().unwrap(), "neo4j_env").unwrap();
        assert_eq!(settings.password, "007123");
        assert_eq!(settings.fetch_size, 50);
    }
}
