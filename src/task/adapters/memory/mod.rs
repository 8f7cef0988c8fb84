//! In-memory adapters for tests and single-process deployments.

mod task;
mod user;

pub use task::InMemoryTaskRepository;
pub use user::InMemoryUserRepository;
