//! Domain model for task assignment and lifecycle management.
//!
//! Tasks move through the status table in [`lifecycle`]; every other module
//! changes a task's status only by calling [`apply`]. Infrastructure concerns
//! stay outside this boundary.

mod error;
mod ids;
pub mod lifecycle;
mod status;
mod task;
mod user;

pub use error::{ParseTaskStatusError, ParseTaskTypeError, TaskDomainError};
pub use ids::{IdentifierKind, Revision, TaskId, UserId};
pub use lifecycle::{TaskEvent, apply};
pub use status::{TaskStatus, TaskType};
pub use task::{MAX_TASK_NAME_CHARS, PersistedTaskData, Task, TaskDraft, TaskEdit};
pub use user::{
    MAX_EMAIL_CHARS, MAX_USER_NAME_CHARS, PersistedUserData, User, UserEmail, UserFlags,
    UserTaskStats,
};
