//! Shared test helpers for in-memory integration tests.

use chrono::{DateTime, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::Arc;
use task_assigner::task::{
    adapters::{
        clock::FixedClock,
        memory::{InMemoryTaskRepository, InMemoryUserRepository},
    },
    domain::{Task, User},
    services::{
        AssignmentService, CompletionService, CreateTaskRequest, ExpirationSweeper,
        RegisterUserRequest, TaskCatalogueService, TaskQueryService, UserDirectoryService,
    },
};

/// Assignment service over the in-memory stores.
pub type Assignments = AssignmentService<InMemoryTaskRepository, InMemoryUserRepository, FixedClock>;

/// Every service wired to the same in-memory stores and clock.
pub struct TaskSystem {
    pub tasks: Arc<InMemoryTaskRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub clock: Arc<FixedClock>,
    pub assignments: Assignments,
    pub completions: CompletionService<InMemoryTaskRepository, FixedClock>,
    pub catalogue: TaskCatalogueService<InMemoryTaskRepository, FixedClock>,
    pub directory: UserDirectoryService<InMemoryUserRepository, FixedClock>,
    pub queries: TaskQueryService<InMemoryTaskRepository, InMemoryUserRepository>,
    pub sweeper: ExpirationSweeper<InMemoryTaskRepository>,
}

impl TaskSystem {
    /// Wires the services around fresh stores with the clock at `start`.
    #[must_use]
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let clock = Arc::new(FixedClock::new(start));
        Self {
            assignments: AssignmentService::new(
                Arc::clone(&tasks),
                Arc::clone(&users),
                Arc::clone(&clock),
            ),
            completions: CompletionService::new(Arc::clone(&tasks), Arc::clone(&clock)),
            catalogue: TaskCatalogueService::new(Arc::clone(&tasks), Arc::clone(&clock)),
            directory: UserDirectoryService::new(Arc::clone(&users), Arc::clone(&clock)),
            queries: TaskQueryService::new(Arc::clone(&tasks), Arc::clone(&users)),
            sweeper: ExpirationSweeper::new(Arc::clone(&tasks)),
            tasks,
            users,
            clock,
        }
    }

    /// Current clock time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// Creates a task through the catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if creation fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> Result<Task, eyre::Report> {
        Ok(self.catalogue.create(request).await?)
    }

    /// Registers a user with a generated name.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails.
    pub async fn register(&self, email: &str) -> Result<User, eyre::Report> {
        Ok(self
            .directory
            .register_user(RegisterUserRequest::new(email, "Integration User"))
            .await?)
    }
}

/// Start time shared by integration tests.
#[must_use]
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 8, 30, 0)
        .single()
        .unwrap_or_default()
}

/// Provides a freshly wired system.
#[fixture]
pub fn system() -> TaskSystem {
    TaskSystem::starting_at(start_time())
}
