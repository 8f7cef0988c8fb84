//! Completion of assigned tasks.

use super::{TaskServiceResult, transition::transition_task};
use crate::task::{
    domain::{Task, TaskEvent, TaskId},
    ports::TaskRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Moves `pending` or `in_progress` tasks to `completed`.
#[derive(Clone)]
pub struct CompletionService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> CompletionService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new completion service.
    #[must_use]
    pub const fn new(tasks: Arc<R>, clock: Arc<C>) -> Self {
        Self { tasks, clock }
    }

    /// Completes the task, stamping `completed_at` with the current time.
    ///
    /// Completion is not idempotent: a second call on a completed task is
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed identifier,
    /// [`super::TaskServiceError::TaskNotFound`] for a missing task, and an
    /// invalid-transition error when the task is `unassigned`, `completed`,
    /// or `failed`.
    pub async fn complete(&self, task_id: &str) -> TaskServiceResult<Task> {
        let parsed_task_id = TaskId::parse(task_id)?;
        let event = TaskEvent::Complete {
            at: self.clock.utc(),
        };
        let completed = transition_task(&*self.tasks, parsed_task_id, event).await?;
        info!(task_id = %completed.id(), "task completed");
        Ok(completed)
    }
}
