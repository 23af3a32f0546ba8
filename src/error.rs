//! Custom error types for budget-goals
//!
//! Every command in the engine returns `GoalResult`. None of these errors are
//! fatal: a rejected command leaves the collection exactly as it was.

use thiserror::Error;

/// The main error type for budget-goals operations
#[derive(Error, Debug)]
pub enum GoalError {
    /// Rejected user input: empty title, bad amount, unknown category,
    /// invalid session save
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl GoalError {
    /// Create a "not found" error for goals
    pub fn goal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Goal",
            identifier: identifier.into(),
        }
    }

    /// Shorthand for an `InvalidInput` error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an input validation error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<std::io::Error> for GoalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GoalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for budget-goals operations
pub type GoalResult<T> = Result<T, GoalError>;
