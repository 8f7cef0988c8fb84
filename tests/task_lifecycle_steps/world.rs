//! Shared world state for task lifecycle BDD scenarios.

use chrono::{DateTime, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::collections::HashMap;
use std::sync::Arc;
use task_assigner::task::{
    adapters::{
        clock::FixedClock,
        memory::{InMemoryTaskRepository, InMemoryUserRepository},
    },
    domain::{Task, User},
    services::{
        AssignmentService, CompletionService, ExpirationSweeper, SweepReport,
        TaskCatalogueService, TaskServiceError, UserDirectoryService,
    },
};

/// Scenario world for task lifecycle behaviour tests.
pub struct TaskLifecycleWorld {
    pub clock: Arc<FixedClock>,
    pub catalogue: TaskCatalogueService<InMemoryTaskRepository, FixedClock>,
    pub directory: UserDirectoryService<InMemoryUserRepository, FixedClock>,
    pub assignments: AssignmentService<InMemoryTaskRepository, InMemoryUserRepository, FixedClock>,
    pub completions: CompletionService<InMemoryTaskRepository, FixedClock>,
    pub sweeper: ExpirationSweeper<InMemoryTaskRepository>,
    pub users_by_email: HashMap<String, User>,
    pub current_task: Option<Task>,
    pub last_result: Option<Result<Task, TaskServiceError>>,
    pub last_report: Option<SweepReport>,
}

impl TaskLifecycleWorld {
    /// Creates a world with empty stores and a clock at a fixed instant.
    #[must_use]
    pub fn new() -> Self {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let clock = Arc::new(FixedClock::new(scenario_start()));

        Self {
            catalogue: TaskCatalogueService::new(Arc::clone(&tasks), Arc::clone(&clock)),
            directory: UserDirectoryService::new(Arc::clone(&users), Arc::clone(&clock)),
            assignments: AssignmentService::new(
                Arc::clone(&tasks),
                Arc::clone(&users),
                Arc::clone(&clock),
            ),
            completions: CompletionService::new(Arc::clone(&tasks), Arc::clone(&clock)),
            sweeper: ExpirationSweeper::new(tasks),
            clock,
            users_by_email: HashMap::new(),
            current_task: None,
            last_result: None,
            last_report: None,
        }
    }

    /// Current scenario time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// Identifier of the task under test.
    ///
    /// # Errors
    ///
    /// Returns an error if no task was created yet.
    pub fn current_task_id(&self) -> Result<String, eyre::Report> {
        self.current_task
            .as_ref()
            .map(|task| task.id().to_string())
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Registered user with `email`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario never registered the user.
    pub fn user(&self, email: &str) -> Result<&User, eyre::Report> {
        self.users_by_email
            .get(email)
            .ok_or_else(|| eyre::eyre!("user {email} was not registered in this scenario"))
    }
}

impl Default for TaskLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

fn scenario_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskLifecycleWorld {
    TaskLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
