//! Read-only task listings and per-user statistics.

use super::{TaskServiceError, TaskServiceResult};
use crate::task::{
    domain::{Task, UserId, UserTaskStats},
    ports::{TaskOrder, TaskQuery, TaskRepository, UserRepository},
};
use std::sync::Arc;

/// Optional filters for task listings, as supplied by callers.
///
/// Each value is matched exactly and case-insensitively. Values that name no
/// known status, type, or user match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilterRequest {
    status: Option<String>,
    assigned_to: Option<String>,
    task_type: Option<String>,
}

impl TaskFilterRequest {
    /// Creates a filter that matches every active task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Filters by assignee identifier.
    #[must_use]
    pub fn with_assigned_to(mut self, assigned_to: impl Into<String>) -> Self {
        self.assigned_to = Some(assigned_to.into());
        self
    }

    /// Filters by type.
    #[must_use]
    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }

    fn into_query(self, order: TaskOrder) -> TaskQuery {
        let mut query = TaskQuery::new().with_order(order);
        if let Some(status) = self.status {
            query = query.with_status(status);
        }
        if let Some(assigned_to) = self.assigned_to {
            query = query.with_assigned_to(assigned_to);
        }
        if let Some(task_type) = self.task_type {
            query = query.with_task_type(task_type);
        }
        query
    }
}

/// Filtered task views and derived user statistics.
#[derive(Clone)]
pub struct TaskQueryService<R, U>
where
    R: TaskRepository,
    U: UserRepository,
{
    tasks: Arc<R>,
    users: Arc<U>,
}

impl<R, U> TaskQueryService<R, U>
where
    R: TaskRepository,
    U: UserRepository,
{
    /// Creates a new query service.
    #[must_use]
    pub const fn new(tasks: Arc<R>, users: Arc<U>) -> Self {
        Self { tasks, users }
    }

    /// Lists active tasks matching `filter` in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] when the lookup fails.
    pub async fn list_tasks(
        &self,
        filter: TaskFilterRequest,
        order: TaskOrder,
    ) -> TaskServiceResult<Vec<Task>> {
        let query = filter.into_query(order);
        Ok(self.tasks.find_many(&query).await?)
    }

    /// Computes task statistics for one user from current store state.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed identifier and
    /// [`TaskServiceError::UserNotFound`] for an unknown user.
    pub async fn user_stats(&self, user_id: &str) -> TaskServiceResult<UserTaskStats> {
        let parsed_user_id = UserId::parse(user_id)?;
        self.users
            .find_by_id(parsed_user_id)
            .await?
            .ok_or(TaskServiceError::UserNotFound(parsed_user_id))?;

        let query = TaskQuery::new().with_assigned_to(parsed_user_id.to_string());
        let assigned = self.tasks.find_many(&query).await?;
        Ok(UserTaskStats::tally(&assigned))
    }
}
