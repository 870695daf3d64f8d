use std::fmt;

/// Error types for schema migration operations
#[derive(Debug)]
pub enum MigrationError {
    /// Database statement or connection failure
    Database(String),

    /// Table or column name is not a plain SQL identifier
    InvalidIdentifier(String),

    /// Sample record has no fields to derive a definition from
    EmptySample { table: String },

    /// Serialization error while hashing the definition
    Serialization(String),
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationError::Database(msg) => {
                write!(f, "Database error: {}", msg)
            }
            MigrationError::InvalidIdentifier(name) => {
                write!(f, "Invalid SQL identifier: '{}'", name)
            }
            MigrationError::EmptySample { table } => {
                write!(f, "Sample for table '{}' has no fields", table)
            }
            MigrationError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for MigrationError {}

impl From<sqlx::Error> for MigrationError {
    fn from(err: sqlx::Error) -> Self {
        MigrationError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for MigrationError {
    fn from(err: serde_json::Error) -> Self {
        MigrationError::Serialization(err.to_string())
    }
}

/// Result type for migration operations
pub type MigrationResult<T> = Result<T, MigrationError>;
