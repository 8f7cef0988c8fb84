//! `PostgreSQL` repository implementation for task storage.

use super::{
    conversion::{
        revision_from_column, revision_to_column, row_to_task, to_changeset, to_new_task_row,
    },
    models::TaskRow,
    schema::tasks,
};
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::{
        SortDirection, TaskOrderField, TaskQuery, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// Conditional updates are a single `UPDATE ... WHERE id = $1 AND revision =
/// $2`, so the row lock taken by the statement serializes writers of one
/// task.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_task_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task> {
        let task_id = task.id();
        let expected = task.revision();
        let expected_column = revision_to_column(expected)?;
        let next = task.clone().into_next_revision();
        let changes = to_changeset(&next)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::revision.eq(expected_column)),
            )
            .set(&changes)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;

            if affected == 1 {
                return Ok(next);
            }

            let stored_revision = tasks::table
                .filter(tasks::id.eq(task_id.into_inner()))
                .select(tasks::revision)
                .first::<i64>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            match stored_revision {
                None => Err(TaskRepositoryError::NotFound(task_id)),
                Some(actual) => Err(TaskRepositoryError::RevisionConflict {
                    task_id,
                    expected,
                    actual: revision_from_column(actual)?,
                }),
            }
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_many(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>> {
        let assignee = match query.assigned_to() {
            None => None,
            Some(text) => match canonical_uuid(text) {
                Some(uuid) => Some(uuid),
                // No stored identifier renders as this text.
                None => return Ok(Vec::new()),
            },
        };
        let status = query.status().map(str::to_owned);
        let task_type = query.task_type().map(str::to_owned);
        let order = query.order();

        self.run_blocking(move |connection| {
            let mut statement = tasks::table
                .filter(tasks::deleted.eq(false))
                .select(TaskRow::as_select())
                .into_boxed();
            if let Some(status_text) = status {
                statement = statement.filter(tasks::status.eq(status_text));
            }
            if let Some(type_text) = task_type {
                statement = statement.filter(tasks::task_type.eq(type_text));
            }
            if let Some(user_uuid) = assignee {
                statement = statement.filter(tasks::assigned_to.eq(user_uuid));
            }
            statement = match (order.field, order.direction) {
                (TaskOrderField::CreatedAt, SortDirection::Ascending) => {
                    statement.order((tasks::created_at.asc(), tasks::id.asc()))
                }
                (TaskOrderField::CreatedAt, SortDirection::Descending) => {
                    statement.order((tasks::created_at.desc(), tasks::id.desc()))
                }
                (TaskOrderField::Deadline, SortDirection::Ascending) => {
                    statement.order((tasks::deadline.asc(), tasks::id.asc()))
                }
                (TaskOrderField::Deadline, SortDirection::Descending) => {
                    statement.order((tasks::deadline.desc(), tasks::id.desc()))
                }
            };

            let rows = statement
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_expirable(&self, now: DateTime<Utc>) -> TaskRepositoryResult<Vec<Task>> {
        let expirable: Vec<&'static str> = TaskStatus::EXPIRABLE
            .iter()
            .map(|status| status.as_str())
            .collect();

        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::deleted.eq(false))
                .filter(tasks::deadline.lt(now))
                .filter(tasks::status.eq_any(expirable))
                .filter(tasks::completed_at.is_null())
                .order((tasks::deadline.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

/// Parses `text` as a UUID only when it is already in the lowercase
/// hyphenated form `PostgreSQL` renders, keeping the filter an exact text
/// match.
fn canonical_uuid(text: &str) -> Option<Uuid> {
    Uuid::parse_str(text)
        .ok()
        .filter(|uuid| uuid.hyphenated().to_string() == text)
}
