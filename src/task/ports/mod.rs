//! Port contracts for task assignment and lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod repository;
pub mod user_repository;

pub use repository::{
    SortDirection, TaskOrder, TaskOrderField, TaskQuery, TaskRepository, TaskRepositoryError,
    TaskRepositoryResult,
};
pub use user_repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
