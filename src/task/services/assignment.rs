//! Assignment of unassigned tasks to users.

use super::{
    TaskServiceError, TaskServiceResult,
    transition::{load_active_task, transition_from},
};
use crate::task::{
    domain::{Task, TaskEvent, TaskId, UserId},
    ports::{TaskRepository, UserRepository},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Binds unassigned tasks to existing users.
///
/// Reassignment is not supported: a task that has left `unassigned` is
/// rejected with an invalid-transition error.
#[derive(Clone)]
pub struct AssignmentService<R, U, C>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<R, U, C> AssignmentService<R, U, C>
where
    R: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new assignment service.
    #[must_use]
    pub const fn new(tasks: Arc<R>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            users,
            clock,
        }
    }

    /// Assigns the task identified by `task_id` to the user identified by
    /// `user_id`, moving it from `unassigned` to `pending`.
    ///
    /// The assignee and status are written together in one conditional
    /// update.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed identifiers,
    /// [`TaskServiceError::TaskNotFound`] or [`TaskServiceError::UserNotFound`]
    /// for missing entities, and an invalid-transition error when the task is
    /// no longer `unassigned`.
    pub async fn assign(&self, task_id: &str, user_id: &str) -> TaskServiceResult<Task> {
        let parsed_task_id = TaskId::parse(task_id)?;
        let parsed_user_id = UserId::parse(user_id)?;

        let task = load_active_task(&*self.tasks, parsed_task_id).await?;
        let user = self
            .users
            .find_by_id(parsed_user_id)
            .await?
            .ok_or(TaskServiceError::UserNotFound(parsed_user_id))?;

        let event = TaskEvent::Assign {
            assignee: user.id(),
            at: self.clock.utc(),
        };
        let assigned = transition_from(&*self.tasks, task, event).await?;
        info!(task_id = %assigned.id(), user_id = %user.id(), "task assigned");
        Ok(assigned)
    }
}
