//! Repository port for task persistence, filtered lookup, and conditional
//! updates.

use crate::task::domain::{Revision, Task, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Field a task listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskOrderField {
    /// Creation timestamp.
    #[default]
    CreatedAt,
    /// Deadline. Tasks without one sort last ascending and first descending.
    Deadline,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Ordering for task listings. Ties break on the task identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TaskOrder {
    /// Field to sort by.
    pub field: TaskOrderField,
    /// Sort direction.
    pub direction: SortDirection,
}

impl TaskOrder {
    /// Creates an ordering.
    #[must_use]
    pub const fn new(field: TaskOrderField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Compares two tasks under this ordering.
    #[must_use]
    pub fn compare(self, left: &Task, right: &Task) -> Ordering {
        let primary = match self.field {
            TaskOrderField::CreatedAt => left.created_at().cmp(&right.created_at()),
            TaskOrderField::Deadline => compare_deadlines(left.deadline(), right.deadline()),
        };
        let ordering = primary.then_with(|| left.id().cmp(&right.id()));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Ascending deadline comparison with missing deadlines last.
fn compare_deadlines(left: Option<DateTime<Utc>>, right: Option<DateTime<Utc>>) -> Ordering {
    match (left, right) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter and ordering for listing active (non-deleted) tasks.
///
/// Filter values are matched exactly and case-insensitively against the
/// canonical storage text of the status, assignee identifier, and type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    status: Option<String>,
    assigned_to: Option<String>,
    task_type: Option<String>,
    order: TaskOrder,
}

impl TaskQuery {
    /// Creates a query matching every active task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to the given status text.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into().to_lowercase());
        self
    }

    /// Restricts results to tasks assigned to the given identifier text.
    #[must_use]
    pub fn with_assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into().to_lowercase());
        self
    }

    /// Restricts results to the given type text.
    #[must_use]
    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into().to_lowercase());
        self
    }

    /// Sets the result ordering.
    #[must_use]
    pub const fn with_order(mut self, order: TaskOrder) -> Self {
        self.order = order;
        self
    }

    /// Returns the lowercased status filter.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns the lowercased assignee filter.
    #[must_use]
    pub fn assigned_to(&self) -> Option<&str> {
        self.assigned_to.as_deref()
    }

    /// Returns the lowercased type filter.
    #[must_use]
    pub fn task_type(&self) -> Option<&str> {
        self.task_type.as_deref()
    }

    /// Returns the result ordering.
    #[must_use]
    pub const fn order(&self) -> TaskOrder {
        self.order
    }

    /// Returns `true` when `task` is active and satisfies every filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if task.is_deleted() {
            return false;
        }
        let status_matches = self
            .status()
            .is_none_or(|status| status == task.status().as_str());
        let type_matches = self
            .task_type()
            .is_none_or(|task_type| task_type == task.task_type().as_str());
        let assignee_matches = self.assigned_to().is_none_or(|assignee| {
            task.assigned_to()
                .is_some_and(|user_id| user_id.to_string() == assignee)
        });
        status_matches && type_matches && assignee_matches
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists `task` only if the stored revision still equals
    /// `task.revision()`. The check and the write are atomic with respect to
    /// other writers of the same task.
    ///
    /// Returns the task as stored, one revision ahead.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::RevisionConflict`] when another writer got
    /// there first.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier, including soft-deleted tasks.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns active tasks matching `query`, in the query's order.
    async fn find_many(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns active tasks the expiration sweep should fail at `now`:
    /// deadline before `now`, an expirable status, and no completion stamp.
    async fn find_expirable(&self, now: DateTime<Utc>) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored revision moved on since the task was read.
    #[error("task {task_id} was modified concurrently (expected revision {expected}, found {actual})")]
    RevisionConflict {
        /// Task being written.
        task_id: TaskId,
        /// Revision the writer read.
        expected: Revision,
        /// Revision currently stored.
        actual: Revision,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
