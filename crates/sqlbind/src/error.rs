//! Error types for sqlbind

use thiserror::Error;

/// Result type alias for sqlbind operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for query building and execution
#[derive(Debug, Error)]
pub enum DbError {
    /// Malformed caller arguments (blank table name, empty column list,
    /// empty IN list, non-positive batch size, ...). Raised before any SQL
    /// is built or executed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transaction misuse, or statement bookkeeping requested before any
    /// statement has run.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The executor reported a failed prepare/execute. Carries the
    /// offending SQL text.
    #[error("Executing query '{sql}' was not successful: {message}")]
    Execution { sql: String, message: String },

    /// Internal invariant violation. Indicates a bug in the compiler, not
    /// bad input; never retried.
    #[error("Logic error: {0}")]
    Logic(String),
}

impl DbError {
    /// Create an invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an invalid-state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Create an execution error for a specific statement
    pub fn execution(sql: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            sql: sql.into(),
            message: message.into(),
        }
    }

    /// Create a logic error
    pub fn logic(message: impl Into<String>) -> Self {
        Self::Logic(message.into())
    }

    /// Check if this is an invalid-input error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Check if this is an invalid-state error
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }

    /// Check if this is an execution error
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }
}
