//! Error types for the TPG loader
//!
//! Errors are scoped by the narrowest level at which they are handled:
//! row-level errors are logged and skipped, file-level errors tag the
//! archived file, group-level errors abort the group, and configuration
//! errors abort the run before any group starts.

use thiserror::Error;

/// Result type alias for loader operations
pub type Result<T> = std::result::Result<T, LoadError>;

/// Error type for loader operations
#[derive(Error, Debug)]
pub enum LoadError {
    /// Column-spec string does not parse; fatal to the group
    #[error("Malformed column spec '{0}': expected 'name:type:uniqueFlag'")]
    MalformedSchema(String),

    /// Token count does not match the declared column count; row-level
    #[error("Row has {actual} fields but the schema declares {expected} columns")]
    RowShapeMismatch { expected: usize, actual: usize },

    /// Table name has no entry in the table registry; fatal to the group
    #[error("No table registry entry for '{0}'. Add it to the tables file.")]
    MetadataLookup(String),

    /// Database connection could not be established; fatal to the group
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration value is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read or deserialized
    #[error("Failed to load configuration file: {0}")]
    ConfigFile(#[from] config::ConfigError),

    /// File system operation failed
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// Statement rejected by the database; row-level
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LoadError {
    /// Create a malformed schema error
    pub fn malformed_schema(spec: impl Into<String>) -> Self {
        Self::MalformedSchema(spec.into())
    }

    /// Create a metadata lookup error
    pub fn metadata_lookup(table: impl Into<String>) -> Self {
        Self::MetadataLookup(table.into())
    }

    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
