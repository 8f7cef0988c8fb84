//! Service-level errors shared by the task services.

use crate::task::{
    domain::{TaskDomainError, TaskId, UserId},
    ports::{TaskRepositoryError, UserRepositoryError},
};
use thiserror::Error;

/// Coarse classification of a [`TaskServiceError`] for callers that map
/// outcomes onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskErrorKind {
    /// A referenced task or user does not exist.
    NotFound,
    /// The lifecycle table rejected the requested status change.
    InvalidTransition,
    /// Input was malformed.
    Validation,
    /// The write kept losing to concurrent writers, or a record already
    /// exists.
    Conflict,
    /// Storage failed.
    Persistence,
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation or a lifecycle transition failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// User repository operation failed.
    #[error(transparent)]
    UserRepository(#[from] UserRepositoryError),
    /// No active task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// No user exists with the given identifier.
    #[error("user {0} not found")]
    UserNotFound(UserId),
    /// Every attempt at a conditional write lost to a concurrent writer.
    #[error("task {0} is being modified concurrently; giving up")]
    Contended(TaskId),
}

impl TaskServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        match self {
            Self::Domain(TaskDomainError::InvalidTransition { .. }) => {
                TaskErrorKind::InvalidTransition
            }
            Self::Domain(_) => TaskErrorKind::Validation,
            Self::TaskNotFound(_)
            | Self::UserNotFound(_)
            | Self::Repository(TaskRepositoryError::NotFound(_)) => TaskErrorKind::NotFound,
            Self::Contended(_)
            | Self::Repository(
                TaskRepositoryError::RevisionConflict { .. } | TaskRepositoryError::DuplicateTask(_),
            )
            | Self::UserRepository(
                UserRepositoryError::DuplicateUser(_) | UserRepositoryError::DuplicateEmail(_),
            ) => TaskErrorKind::Conflict,
            Self::Repository(TaskRepositoryError::Persistence(_))
            | Self::UserRepository(UserRepositoryError::Persistence(_)) => {
                TaskErrorKind::Persistence
            }
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;
