//! Read-validate-write loop shared by every status-changing service.

use super::{TaskServiceError, TaskServiceResult};
use crate::task::{
    domain::{Task, TaskEvent, TaskId, apply},
    ports::{TaskRepository, TaskRepositoryError},
};
use tracing::debug;

/// Conditional writes attempted before a transition gives up.
pub const MAX_TRANSITION_ATTEMPTS: usize = 3;

/// Loads a task that exists and has not been soft-deleted.
pub(super) async fn load_active_task<R>(repository: &R, task_id: TaskId) -> TaskServiceResult<Task>
where
    R: TaskRepository + ?Sized,
{
    repository
        .find_by_id(task_id)
        .await?
        .filter(|task| !task.is_deleted())
        .ok_or(TaskServiceError::TaskNotFound(task_id))
}

/// Applies `event` to a freshly loaded task and persists it.
pub(super) async fn transition_task<R>(
    repository: &R,
    task_id: TaskId,
    event: TaskEvent,
) -> TaskServiceResult<Task>
where
    R: TaskRepository + ?Sized,
{
    let snapshot = load_active_task(repository, task_id).await?;
    transition_from(repository, snapshot, event).await
}

/// Applies `event` starting from `snapshot` and persists it with a
/// conditional write.
///
/// When another writer moves the task on first, the task is re-read and the
/// event re-applied, so a status that is no longer legal surfaces as
/// [`crate::task::domain::TaskDomainError::InvalidTransition`] instead of
/// overwriting the winner.
pub(super) async fn transition_from<R>(
    repository: &R,
    snapshot: Task,
    event: TaskEvent,
) -> TaskServiceResult<Task>
where
    R: TaskRepository + ?Sized,
{
    let task_id = snapshot.id();
    let mut current = snapshot;
    for attempt in 1..=MAX_TRANSITION_ATTEMPTS {
        let from = current.status();
        let next = apply(current, event)?;
        match repository.update(&next).await {
            Ok(stored) => {
                debug!(%task_id, %from, to = %stored.status(), "task transitioned");
                return Ok(stored);
            }
            Err(TaskRepositoryError::RevisionConflict {
                expected, actual, ..
            }) => {
                debug!(%task_id, attempt, %expected, %actual, "revision conflict, re-reading task");
                current = load_active_task(repository, task_id).await?;
            }
            Err(TaskRepositoryError::NotFound(missing)) => {
                return Err(TaskServiceError::TaskNotFound(missing));
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(TaskServiceError::Contended(task_id))
}
