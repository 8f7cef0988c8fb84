//! Task creation, retrieval, editing, progress signalling, and soft
//! deletion.

use super::{
    TaskServiceError, TaskServiceResult,
    transition::{MAX_TRANSITION_ATTEMPTS, load_active_task, transition_task},
};
use crate::task::{
    domain::{Task, TaskDomainError, TaskDraft, TaskEdit, TaskEvent, TaskId, TaskType},
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    name: String,
    description: String,
    task_type: Option<String>,
    deadline: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            task_type: None,
            deadline: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the type by name, matched case-insensitively.
    #[must_use]
    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Request payload for editing a task's descriptive fields. Unset fields
/// are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    name: Option<String>,
    description: Option<String>,
    task_type: Option<String>,
}

impl UpdateTaskRequest {
    /// Creates a request that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the type by name, matched case-insensitively.
    #[must_use]
    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }

    fn into_edit(self) -> Result<TaskEdit, TaskDomainError> {
        let mut edit = TaskEdit::new();
        if let Some(name) = self.name {
            edit = edit.with_name(name)?;
        }
        if let Some(description) = self.description {
            edit = edit.with_description(description);
        }
        if let Some(raw_type) = self.task_type {
            edit = edit.with_task_type(parse_task_type(raw_type)?);
        }
        Ok(edit)
    }
}

fn parse_task_type(raw: String) -> Result<TaskType, TaskDomainError> {
    TaskType::try_from(raw.as_str()).map_err(|_| TaskDomainError::InvalidTaskType(raw))
}

/// Creates, fetches, edits, starts, and soft-deletes tasks.
#[derive(Clone)]
pub struct TaskCatalogueService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskCatalogueService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new catalogue service.
    #[must_use]
    pub const fn new(tasks: Arc<R>, clock: Arc<C>) -> Self {
        Self { tasks, clock }
    }

    /// Creates an unassigned task.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name or unknown type, and
    /// [`TaskServiceError::Repository`] when persistence fails.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let mut draft = TaskDraft::new(request.name)?.with_description(request.description);
        if let Some(raw_type) = request.task_type {
            draft = draft.with_task_type(parse_task_type(raw_type)?);
        }
        if let Some(deadline) = request.deadline {
            draft = draft.with_deadline(deadline);
        }

        let task = Task::new(draft, &*self.clock);
        self.tasks.store(&task).await?;
        info!(task_id = %task.id(), task_type = %task.task_type(), "task created");
        Ok(task)
    }

    /// Fetches an active task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] for missing or deleted
    /// tasks.
    pub async fn get(&self, task_id: &str) -> TaskServiceResult<Task> {
        let parsed_task_id = TaskId::parse(task_id)?;
        load_active_task(&*self.tasks, parsed_task_id).await
    }

    /// Edits the name, description or type of an active task. Status,
    /// assignee and deadline are never touched.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank or overlong name or an unknown
    /// type, and [`TaskServiceError::TaskNotFound`] for missing or deleted
    /// tasks.
    pub async fn update(
        &self,
        task_id: &str,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let parsed_task_id = TaskId::parse(task_id)?;
        let edit = request.into_edit()?;
        let updated = self
            .rewrite_active(parsed_task_id, |task, clock| {
                task.apply_edit(edit.clone(), clock);
            })
            .await?;
        info!(task_id = %updated.id(), "task updated");
        Ok(updated)
    }

    /// Records that work started, moving a `pending` task to `in_progress`.
    ///
    /// # Errors
    ///
    /// Returns an invalid-transition error unless the task is `pending`.
    pub async fn start(&self, task_id: &str) -> TaskServiceResult<Task> {
        let parsed_task_id = TaskId::parse(task_id)?;
        let event = TaskEvent::Start {
            at: self.clock.utc(),
        };
        transition_task(&*self.tasks, parsed_task_id, event).await
    }

    /// Soft-deletes a task. Its status and history are kept.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] when the task is missing or
    /// already deleted.
    pub async fn delete(&self, task_id: &str) -> TaskServiceResult<Task> {
        let parsed_task_id = TaskId::parse(task_id)?;
        let deleted = self
            .rewrite_active(parsed_task_id, |task, clock| task.mark_deleted(clock))
            .await?;
        info!(task_id = %deleted.id(), "task deleted");
        Ok(deleted)
    }

    /// Loads an active task, applies `change` and writes it back with a
    /// conditional update, re-reading on revision conflicts.
    async fn rewrite_active<F>(&self, task_id: TaskId, mut change: F) -> TaskServiceResult<Task>
    where
        F: FnMut(&mut Task, &C) + Send,
    {
        for attempt in 1..=MAX_TRANSITION_ATTEMPTS {
            let mut task = load_active_task(&*self.tasks, task_id).await?;
            change(&mut task, &*self.clock);
            match self.tasks.update(&task).await {
                Ok(stored) => return Ok(stored),
                Err(TaskRepositoryError::RevisionConflict { .. }) => {
                    debug!(%task_id, attempt, "revision conflict while rewriting task");
                }
                Err(TaskRepositoryError::NotFound(missing)) => {
                    return Err(TaskServiceError::TaskNotFound(missing));
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(TaskServiceError::Contended(task_id))
    }
}
