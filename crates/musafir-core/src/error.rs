//! Core error types for musafir-core.
//!
//! Every failure the library can report is a variant of one of the enums
//! below. All of them are recoverable: a rejected call never leaves the
//! progression state partially mutated.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for musafir-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Catalog lookup errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Rejected progression operations
    #[error("Progression error: {0}")]
    Progression(#[from] ProgressionError),

    /// Persistence errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Catalog lookup errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No task matches the given key
    #[error("No task with id '{0}'")]
    NotFound(String),

    /// String does not name a task category
    #[error("Unknown task category '{0}'")]
    UnknownCategory(String),
}

/// Errors returned by the progression engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressionError {
    /// Reflection text was empty or whitespace-only
    #[error("Reflection text must not be empty")]
    EmptyReflection,

    /// The referenced task is not part of the catalog
    #[error("Unknown task: {task_id}")]
    UnknownTask { task_id: String },

    /// A state rebuilt from parts violates an invariant
    #[error("Invalid progression state: {0}")]
    InvalidState(String),
}

/// Persistence errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Stored data could not be turned back into a valid state
    #[error("Stored progress is corrupt: {0}")]
    Corrupt(String),

    /// Could not resolve the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not name a configuration value
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::QueryFailed(err.to_string())
    }
}

impl From<CatalogError> for ProgressionError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(task_id) => ProgressionError::UnknownTask { task_id },
            CatalogError::UnknownCategory(name) => {
                ProgressionError::InvalidState(format!("unknown task category '{name}'"))
            }
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
