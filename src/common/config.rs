//! Configuration file handling
//!
//! The config file is YAML. Database credentials and the engine URL can be
//! overridden from the environment after the file is parsed.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Database connection settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// GraphQL engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Database connection settings
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DatabaseConfig {
    /// Database kind; only "postgres" is supported
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub dbname: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub sslmode: String,
}

/// Settings for the GraphQL-to-SQL engine endpoint
#[derive(Debug, Deserialize, Default, Clone)]
pub struct EngineConfig {
    /// GraphQL endpoint that compiles and executes queries
    #[serde(default)]
    pub url: String,

    /// Extra HTTP headers sent with every request (e.g. role or auth headers)
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

const SUPPORTED_DATABASES: &[&str] = &["postgres", "postgresql"];

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: format!("could not read config file: {}", e),
        })?;

        let mut config = Self::parse(&content).map_err(|e| match e {
            Error::Config(message) => Error::ConfigParse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        config.apply_env_overrides(|key| std::env::var(key).ok());

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from YAML text without touching the environment
    pub fn parse(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Override fields from environment-style variables
    ///
    /// Empty values never override. A `DB_PORT` that is not a valid port is ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let db = &mut self.database;
        if let Some(v) = get("DB_HOST") {
            db.host = v;
        }
        if let Some(v) = get("DB_NAME") {
            db.dbname = v;
        }
        if let Some(v) = get("DB_USER") {
            db.user = v;
        }
        if let Some(v) = get("DB_PASSWORD") {
            db.password = v;
        }
        if let Some(v) = get("DB_SSLMODE") {
            db.sslmode = v;
        }
        if let Some(port) = get("DB_PORT").and_then(|v| v.trim().parse::<u16>().ok()) {
            db.port = port;
        }
        if let Some(v) = get("GQL_ENGINE_URL") {
            self.engine.url = v;
        }
    }

    /// Check that every field needed to connect is present
    pub fn validate(&self) -> Result<()> {
        let db = &self.database;
        if !db.kind.is_empty() && !SUPPORTED_DATABASES.contains(&db.kind.as_str()) {
            return Err(Error::ConfigInvalid(format!(
                "unsupported database type '{}' (supported: postgres)",
                db.kind
            )));
        }
        if db.host.is_empty() {
            return Err(Error::ConfigInvalid("database host is required".to_string()));
        }
        if db.port == 0 {
            return Err(Error::ConfigInvalid("database port is required".to_string()));
        }
        if db.dbname.is_empty() {
            return Err(Error::ConfigInvalid("database name is required".to_string()));
        }
        if db.user.is_empty() {
            return Err(Error::ConfigInvalid("database user is required".to_string()));
        }
        if self.engine.url.is_empty() {
            return Err(Error::ConfigInvalid("engine url is required".to_string()));
        }
        Ok(())
    }
}
