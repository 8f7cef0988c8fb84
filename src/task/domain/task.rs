//! Task aggregate root.

use super::{Revision, TaskDomainError, TaskId, TaskStatus, TaskType, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Longest task name accepted, in characters. Matches `tasks.name`.
pub const MAX_TASK_NAME_CHARS: usize = 255;

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    name: String,
    description: String,
    task_type: TaskType,
    deadline: Option<DateTime<Utc>>,
}

impl TaskDraft {
    /// Creates a draft with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskName`] when the trimmed name is
    /// empty and [`TaskDomainError::TaskNameTooLong`] when it exceeds
    /// [`MAX_TASK_NAME_CHARS`].
    pub fn new(name: impl Into<String>) -> Result<Self, TaskDomainError> {
        Ok(Self {
            name: validated_task_name(&name.into())?,
            description: String::new(),
            task_type: TaskType::default(),
            deadline: None,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the priority classification.
    #[must_use]
    pub const fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Validated changes to a task's descriptive fields.
///
/// Status, assignee and deadline are not editable; they change only through
/// the lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    name: Option<String>,
    description: Option<String>,
    task_type: Option<TaskType>,
}

impl TaskEdit {
    /// Creates an edit that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the name.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`TaskDraft::new`].
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, TaskDomainError> {
        self.name = Some(validated_task_name(&name.into())?);
        Ok(self)
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the priority classification.
    #[must_use]
    pub const fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = Some(task_type);
        self
    }
}

fn validated_task_name(raw: &str) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTaskName);
    }
    let actual = trimmed.chars().count();
    if actual > MAX_TASK_NAME_CHARS {
        return Err(TaskDomainError::TaskNameTooLong {
            max: MAX_TASK_NAME_CHARS,
            actual,
        });
    }
    Ok(trimmed.to_owned())
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: String,
    description: String,
    assigned_to: Option<UserId>,
    status: TaskStatus,
    task_type: TaskType,
    deadline: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    deleted: bool,
    revision: Revision,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted assignee, if any.
    pub assigned_to: Option<UserId>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted priority classification.
    pub task_type: TaskType,
    /// Persisted deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted soft-delete flag.
    pub deleted: bool,
    /// Persisted concurrency revision.
    pub revision: Revision,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new unassigned task from a validated draft.
    #[must_use]
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            name: draft.name,
            description: draft.description,
            assigned_to: None,
            status: TaskStatus::Unassigned,
            task_type: draft.task_type,
            deadline: draft.deadline,
            completed_at: None,
            deleted: false,
            revision: Revision::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            assigned_to: data.assigned_to,
            status: data.status,
            task_type: data.task_type,
            deadline: data.deadline,
            completed_at: data.completed_at,
            deleted: data.deleted,
            revision: data.revision,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority classification.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns `true` once the task has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Returns the concurrency revision this value was read at.
    #[must_use]
    pub const fn revision(&self) -> Revision {
        self.revision
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the expiration sweep should fail this task at
    /// `now`.
    #[must_use]
    pub fn is_expirable_at(&self, now: DateTime<Utc>) -> bool {
        !self.deleted
            && self.completed_at.is_none()
            && TaskStatus::EXPIRABLE.contains(&self.status)
            && self.deadline.is_some_and(|deadline| deadline < now)
    }

    /// Marks the task as soft-deleted.
    pub fn mark_deleted(&mut self, clock: &impl Clock) {
        self.deleted = true;
        self.touch(clock.utc());
    }

    /// Applies descriptive edits. Fields the edit leaves unset keep their
    /// values.
    pub fn apply_edit(&mut self, edit: TaskEdit, clock: &impl Clock) {
        if let Some(name) = edit.name {
            self.name = name;
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        if let Some(task_type) = edit.task_type {
            self.task_type = task_type;
        }
        self.touch(clock.utc());
    }

    /// Returns this task as a store writes it: one revision ahead.
    #[must_use]
    pub fn into_next_revision(mut self) -> Self {
        self.revision = self.revision.next();
        self
    }

    pub(super) const fn bind_assignee(&mut self, assignee: UserId) {
        self.assigned_to = Some(assignee);
    }

    pub(super) const fn stamp_completed(&mut self, at: DateTime<Utc>) {
        self.completed_at = Some(at);
    }

    pub(super) fn enter_status(&mut self, status: TaskStatus, at: DateTime<Utc>) {
        self.status = status;
        self.touch(at);
    }

    /// Moves `updated_at` forward, never backwards.
    fn touch(&mut self, at: DateTime<Utc>) {
        if at > self.updated_at {
            self.updated_at = at;
        }
    }
}
