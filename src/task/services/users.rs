//! Registration, lookup and listing of the users tasks are assigned to.

use super::{TaskServiceError, TaskServiceResult};
use crate::task::{
    domain::{User, UserEmail, UserFlags, UserId},
    ports::UserRepository,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Request payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    email: String,
    name: String,
    flags: UserFlags,
}

impl RegisterUserRequest {
    /// Creates a request for a regular user.
    #[must_use]
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            flags: UserFlags::default(),
        }
    }

    /// Sets the authorization flags.
    #[must_use]
    pub const fn with_flags(mut self, flags: UserFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Stores and fetches users.
#[derive(Clone)]
pub struct UserDirectoryService<U, C>
where
    U: UserRepository,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    clock: Arc<C>,
}

impl<U, C> UserDirectoryService<U, C>
where
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new user directory service.
    #[must_use]
    pub const fn new(users: Arc<U>, clock: Arc<C>) -> Self {
        Self { users, clock }
    }

    /// Registers a user.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed email or empty name, and
    /// [`TaskServiceError::UserRepository`] when the email is taken or
    /// persistence fails.
    pub async fn register_user(&self, request: RegisterUserRequest) -> TaskServiceResult<User> {
        let email = UserEmail::new(request.email)?;
        let user = User::new(email, request.name, request.flags, &*self.clock)?;
        self.users.store(&user).await?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    /// Fetches a user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::UserNotFound`] for an unknown user.
    pub async fn get_user(&self, user_id: &str) -> TaskServiceResult<User> {
        let parsed_user_id = UserId::parse(user_id)?;
        self.users
            .find_by_id(parsed_user_id)
            .await?
            .ok_or(TaskServiceError::UserNotFound(parsed_user_id))
    }

    /// Lists every user, ordered by email address.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::UserRepository`] when persistence fails.
    pub async fn list_users(&self) -> TaskServiceResult<Vec<User>> {
        Ok(self.users.find_all().await?)
    }
}
