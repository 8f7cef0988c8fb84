//! Users that tasks are assigned to, and their derived task statistics.

use super::{Task, TaskDomainError, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest email address accepted, in characters. Matches `users.email`.
pub const MAX_EMAIL_CHARS: usize = 254;

/// Longest user name accepted, in characters. Matches `users.name`.
pub const MAX_USER_NAME_CHARS: usize = 255;

/// Normalized, lowercase email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserEmail(String);

impl UserEmail {
    /// Creates a validated email address.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidEmail`] unless the value holds
    /// exactly one `@` with non-empty local and domain parts and no
    /// whitespace, and [`TaskDomainError::EmailTooLong`] beyond
    /// [`MAX_EMAIL_CHARS`].
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_lowercase();
        let actual = normalized.chars().count();
        if actual > MAX_EMAIL_CHARS {
            return Err(TaskDomainError::EmailTooLong {
                max: MAX_EMAIL_CHARS,
                actual,
            });
        }
        let mut parts = normalized.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        let is_valid = !local.is_empty()
            && !domain.is_empty()
            && parts.next().is_none()
            && !normalized.chars().any(char::is_whitespace);
        if !is_valid {
            return Err(TaskDomainError::InvalidEmail(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authorization flags stored with a user. The task engine ignores them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFlags {
    /// Application administrator.
    pub is_admin: bool,
    /// Staff member.
    pub is_staff: bool,
    /// Superuser.
    pub is_superuser: bool,
}

/// A user tasks can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: UserEmail,
    name: String,
    flags: UserFlags,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted identifier.
    pub id: UserId,
    /// Persisted email address.
    pub email: UserEmail,
    /// Persisted display name.
    pub name: String,
    /// Persisted authorization flags.
    pub flags: UserFlags,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyUserName`] when the trimmed name is
    /// empty and [`TaskDomainError::UserNameTooLong`] beyond
    /// [`MAX_USER_NAME_CHARS`].
    pub fn new(
        email: UserEmail,
        name: impl Into<String>,
        flags: UserFlags,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyUserName);
        }
        let actual = trimmed.chars().count();
        if actual > MAX_USER_NAME_CHARS {
            return Err(TaskDomainError::UserNameTooLong {
                max: MAX_USER_NAME_CHARS,
                actual,
            });
        }
        let timestamp = clock.utc();
        Ok(Self {
            id: UserId::new(),
            email,
            name: trimmed.to_owned(),
            flags,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            email: data.email,
            name: data.name,
            flags: data.flags,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the email address.
    #[must_use]
    pub const fn email(&self) -> &UserEmail {
        &self.email
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the authorization flags.
    #[must_use]
    pub const fn flags(&self) -> UserFlags {
        self.flags
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Task counts derived for one user at read time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UserTaskStats {
    /// Tasks currently assigned to the user, in any status.
    pub assigned: u64,
    /// Assigned tasks in `completed`.
    pub completed: u64,
    /// Assigned tasks in `in_progress`.
    pub in_progress: u64,
    /// Assigned tasks in `failed`.
    pub failed: u64,
    /// `completed / assigned * 100`, or `0` with nothing assigned.
    pub completion_percentage: f64,
}

impl UserTaskStats {
    /// Tallies statistics over the tasks assigned to one user.
    #[must_use]
    pub fn tally<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut stats = Self::default();
        for task in tasks {
            stats.assigned += 1;
            match task.status() {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Failed => stats.failed += 1,
                TaskStatus::Unassigned | TaskStatus::Pending => {}
            }
        }
        stats.completion_percentage = completion_percentage(stats.completed, stats.assigned);
        stats
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "percentage is reported as a float; task counts stay far below 2^52"
)]
fn completion_percentage(completed: u64, assigned: u64) -> f64 {
    if assigned == 0 {
        return 0.0;
    }
    (completed as f64 / assigned as f64) * 100.0
}
