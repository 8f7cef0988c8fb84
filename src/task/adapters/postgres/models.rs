//! Diesel row models for task and user persistence.

use super::schema::{tasks, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// External task identifier.
    pub id: uuid::Uuid,
    /// Task name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Assignee, if any.
    pub assigned_to: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Priority classification.
    pub task_type: String,
    /// Deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
    /// Completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Concurrency revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// External task identifier.
    pub id: uuid::Uuid,
    /// Task name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Assignee, if any.
    pub assigned_to: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Priority classification.
    pub task_type: String,
    /// Deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
    /// Completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Concurrency revision.
    pub revision: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Mutable columns written by a conditional update.
///
/// `treat_none_as_null` keeps a cleared assignee or completion stamp from
/// being skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Priority classification.
    pub task_type: String,
    /// Assignee, if any.
    pub assigned_to: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Revision written by this update.
    pub revision: i64,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// External user identifier.
    pub id: uuid::Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Administrator flag.
    pub is_admin: bool,
    /// Staff flag.
    pub is_staff: bool,
    /// Superuser flag.
    pub is_superuser: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// External user identifier.
    pub id: uuid::Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Administrator flag.
    pub is_admin: bool,
    /// Staff flag.
    pub is_staff: bool,
    /// Superuser flag.
    pub is_superuser: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
