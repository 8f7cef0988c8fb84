//! Error types for task domain validation, transitions, and parsing.

use super::{IdentifierKind, TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or transitioning domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The requested status change is not in the lifecycle table.
    #[error("task {task_id} cannot transition from {from} to {to}")]
    InvalidTransition {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Status at the time of the request.
        from: TaskStatus,
        /// Status the caller asked for.
        to: TaskStatus,
    },

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The task name is longer than storage allows.
    #[error("task name must be at most {max} characters, got {actual}")]
    TaskNameTooLong {
        /// Longest accepted name, in characters.
        max: usize,
        /// Length of the rejected name, in characters.
        actual: usize,
    },

    /// The task type names no known classification.
    #[error("invalid task type '{0}', expected urgent, normal, or low")]
    InvalidTaskType(String),

    /// An identifier was blank.
    #[error("{kind} identifier is required")]
    EmptyIdentifier {
        /// Which identifier was missing.
        kind: IdentifierKind,
    },

    /// An identifier could not be parsed.
    #[error("invalid {kind} identifier '{value}'")]
    InvalidIdentifier {
        /// Which identifier was malformed.
        kind: IdentifierKind,
        /// Raw value supplied by the caller.
        value: String,
    },

    /// The email address is malformed.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The email address is longer than storage allows.
    #[error("email address must be at most {max} characters, got {actual}")]
    EmailTooLong {
        /// Longest accepted address, in characters.
        max: usize,
        /// Length of the rejected address, in characters.
        actual: usize,
    },

    /// The user name is empty after trimming.
    #[error("user name must not be empty")]
    EmptyUserName,

    /// The user name is longer than storage allows.
    #[error("user name must be at most {max} characters, got {actual}")]
    UserNameTooLong {
        /// Longest accepted name, in characters.
        max: usize,
        /// Length of the rejected name, in characters.
        actual: usize,
    },
}

impl TaskDomainError {
    /// Returns `true` when the error reports a rejected status transition.
    #[must_use]
    pub const fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task type: {0}")]
pub struct ParseTaskTypeError(pub String);
