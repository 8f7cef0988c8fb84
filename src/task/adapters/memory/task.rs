//! In-memory task repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Conditional updates compare and write under a single write guard, so
/// concurrent writers of one task serialize.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, HashMap<TaskId, Task>>> {
        self.tasks.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, HashMap<TaskId, Task>>> {
        self.tasks.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut tasks = self.write()?;
        if tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task> {
        let mut tasks = self.write()?;
        let stored = tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if stored.revision() != task.revision() {
            return Err(TaskRepositoryError::RevisionConflict {
                task_id: task.id(),
                expected: task.revision(),
                actual: stored.revision(),
            });
        }
        let next = task.clone().into_next_revision();
        *stored = next.clone();
        Ok(next)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn find_many(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let mut found: Vec<Task> = self
            .read()?
            .values()
            .filter(|task| query.matches(task))
            .cloned()
            .collect();
        let order = query.order();
        found.sort_by(|left, right| order.compare(left, right));
        Ok(found)
    }

    async fn find_expirable(&self, now: DateTime<Utc>) -> TaskRepositoryResult<Vec<Task>> {
        let mut found: Vec<Task> = self
            .read()?
            .values()
            .filter(|task| task.is_expirable_at(now))
            .cloned()
            .collect();
        found.sort_by_key(|task| (task.deadline(), task.id()));
        Ok(found)
    }
}
