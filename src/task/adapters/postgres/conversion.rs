//! Conversions between domain aggregates and Diesel rows.

use super::models::{NewTaskRow, NewUserRow, TaskChangeset, TaskRow, UserRow};
use crate::task::{
    domain::{
        PersistedTaskData, PersistedUserData, Revision, Task, TaskId, TaskStatus, TaskType, User,
        UserEmail, UserFlags, UserId,
    },
    ports::{TaskRepositoryError, TaskRepositoryResult, UserRepositoryError, UserRepositoryResult},
};

pub(super) fn revision_to_column(revision: Revision) -> TaskRepositoryResult<i64> {
    i64::try_from(revision.value()).map_err(TaskRepositoryError::persistence)
}

pub(super) fn revision_from_column(value: i64) -> TaskRepositoryResult<Revision> {
    u64::try_from(value)
        .map(Revision::new)
        .map_err(TaskRepositoryError::persistence)
}

pub(super) fn to_new_task_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        name: task.name().to_owned(),
        description: task.description().to_owned(),
        assigned_to: task.assigned_to().map(UserId::into_inner),
        status: task.status().as_str().to_owned(),
        task_type: task.task_type().as_str().to_owned(),
        deadline: task.deadline(),
        completed_at: task.completed_at(),
        deleted: task.is_deleted(),
        revision: revision_to_column(task.revision())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

/// Builds the changeset for a task that is already one revision ahead.
pub(super) fn to_changeset(next: &Task) -> TaskRepositoryResult<TaskChangeset> {
    Ok(TaskChangeset {
        name: next.name().to_owned(),
        description: next.description().to_owned(),
        task_type: next.task_type().as_str().to_owned(),
        assigned_to: next.assigned_to().map(UserId::into_inner),
        status: next.status().as_str().to_owned(),
        completed_at: next.completed_at(),
        deleted: next.is_deleted(),
        revision: revision_to_column(next.revision())?,
        updated_at: next.updated_at(),
    })
}

pub(super) fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        name,
        description,
        assigned_to,
        status: persisted_status,
        task_type: persisted_type,
        deadline,
        completed_at,
        deleted,
        revision,
        created_at,
        updated_at,
    } = row;

    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let task_type =
        TaskType::try_from(persisted_type.as_str()).map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        name,
        description,
        assigned_to: assigned_to.map(UserId::from_uuid),
        status,
        task_type,
        deadline,
        completed_at,
        deleted,
        revision: revision_from_column(revision)?,
        created_at,
        updated_at,
    }))
}

pub(super) fn to_new_user_row(user: &User) -> NewUserRow {
    let flags = user.flags();
    NewUserRow {
        id: user.id().into_inner(),
        email: user.email().as_str().to_owned(),
        name: user.name().to_owned(),
        is_admin: flags.is_admin,
        is_staff: flags.is_staff,
        is_superuser: flags.is_superuser,
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    }
}

pub(super) fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let email = UserEmail::new(row.email).map_err(UserRepositoryError::persistence)?;
    Ok(User::from_persisted(PersistedUserData {
        id: UserId::from_uuid(row.id),
        email,
        name: row.name,
        flags: UserFlags {
            is_admin: row.is_admin,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
