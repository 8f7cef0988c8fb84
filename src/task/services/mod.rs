//! Application services for task assignment and lifecycle orchestration.
//!
//! Every service that changes a task's status goes through the same
//! read-validate-write loop: load the task, run it through
//! [`crate::task::domain::apply`], and persist it with a conditional update
//! that fails if another writer moved the task on first.

mod assignment;
mod catalogue;
mod completion;
mod error;
mod expiration;
mod query;
mod transition;
mod users;

pub use assignment::AssignmentService;
pub use catalogue::{CreateTaskRequest, TaskCatalogueService, UpdateTaskRequest};
pub use completion::CompletionService;
pub use error::{TaskErrorKind, TaskServiceError, TaskServiceResult};
pub use expiration::{ExpirationSweeper, SweepReport};
pub use query::{TaskFilterRequest, TaskQueryService};
pub use transition::MAX_TRANSITION_ATTEMPTS;
pub use users::{RegisterUserRequest, UserDirectoryService};
