//! Error types for tasktrack
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Why a login attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    UnknownUser,
    WrongPassword,
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthFailure::UnknownUser => write!(f, "user does not exist"),
            AuthFailure::WrongPassword => write!(f, "wrong password"),
        }
    }
}

/// All error types that can occur in tasktrack
#[derive(Debug, Error)]
pub enum TaskTrackError {
    /// A stored line has the wrong shape or an unparseable date
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// Rejected user input (empty fields, mismatched confirmation, delimiter in value)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Username already registered
    #[error("Username already exists: {0}")]
    DuplicateUser(String),

    /// Attempt to edit a task that is already completed (0-based index)
    #[error("Task #{} has already been completed and cannot be edited", .0 + 1)]
    ImmutableRecord(usize),

    /// Login refused
    #[error("Authentication failed: {0}")]
    Authentication(AuthFailure),

    /// The session's role does not allow the operation
    #[error("Access denied: {0}")]
    PermissionDenied(String),

    /// No task at the given 0-based index
    #[error("Task not found: #{}", .0 + 1)]
    TaskNotFound(usize),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TaskTrackError {
    /// Build a malformed-record error for a line that has not been numbered yet.
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        TaskTrackError::MalformedRecord {
            line: 0,
            reason: reason.into(),
        }
    }

    /// Attach a 1-based line number to a malformed-record error.
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            TaskTrackError::MalformedRecord { reason, .. } => TaskTrackError::MalformedRecord { line, reason },
            other => other,
        }
    }
}

/// Result type alias for tasktrack operations
pub type Result<T> = std::result::Result<T, TaskTrackError>;
