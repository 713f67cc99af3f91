//! Error types for gql-validate
//!
//! Everything in here is a setup-class failure: it stops a command before any
//! query runs. Per-query failures never surface as an `Error`; they are recorded
//! as messages on that query's outcome instead.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Exit status for a run where every validation passed
pub const EXIT_OK: i32 = 0;

/// Exit status for a run where at least one validation failed
pub const EXIT_VALIDATION_FAILED: i32 = 1;

/// Exit status for a failure that happened before any query ran
pub const EXIT_SETUP_FAILED: i32 = 2;

/// Main error type for gql-validate
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file '{path}': {message}")]
    ConfigParse { path: String, message: String },

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    // === Database Errors ===
    #[error("Failed to connect to database: {0}")]
    DatabaseConnect(#[source] sqlx::Error),

    #[error("Database query failed: {0}")]
    Database(#[from] sqlx::Error),

    // === Engine Errors ===
    #[error("Failed to create engine client: {0}")]
    EngineInit(String),

    #[error("{0}")]
    Engine(String),

    // === Input Errors ===
    #[error("Query file not found: {0}")]
    QueryFileNotFound(String),

    #[error("Queries directory not found: {0}")]
    QueriesDirNotFound(String),

    #[error("Failed to scan directory '{path}': {error}")]
    Scan { path: String, error: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("Failed to write {path}: {error}")]
    FileWrite { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a file read error for a path
    pub fn file_read(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a file write error for a path
    pub fn file_write(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::FileWrite {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Process exit status for this error
    ///
    /// All errors are setup failures and share one code, distinct from
    /// [`EXIT_VALIDATION_FAILED`].
    pub fn exit_code(&self) -> i32 {
        EXIT_SETUP_FAILED
    }
}
