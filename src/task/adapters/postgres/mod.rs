//! `PostgreSQL` adapters for task and user persistence.

mod conversion;
mod models;
mod repository;
mod schema;
mod user_repository;

pub use repository::{PostgresTaskRepository, TaskPgPool};
pub use user_repository::PostgresUserRepository;
