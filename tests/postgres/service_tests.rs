//! Services running on the `PostgreSQL` adapters.

use super::helpers::{BoxError, PostgresContext, setup_context};
use chrono::{Duration, SubsecRound, Utc};
use std::sync::Arc;
use task_assigner::task::{
    adapters::{
        clock::FixedClock,
        postgres::{PostgresTaskRepository, PostgresUserRepository},
    },
    domain::{MAX_TASK_NAME_CHARS, TaskStatus, TaskType},
    services::{
        AssignmentService, CompletionService, CreateTaskRequest, ExpirationSweeper,
        RegisterUserRequest, TaskCatalogueService, TaskErrorKind, UpdateTaskRequest,
        UserDirectoryService,
    },
};

struct Services {
    clock: Arc<FixedClock>,
    catalogue: TaskCatalogueService<PostgresTaskRepository, FixedClock>,
    directory: UserDirectoryService<PostgresUserRepository, FixedClock>,
    assignments: AssignmentService<PostgresTaskRepository, PostgresUserRepository, FixedClock>,
    completions: CompletionService<PostgresTaskRepository, FixedClock>,
    sweeper: ExpirationSweeper<PostgresTaskRepository>,
}

fn services(context: &PostgresContext) -> Services {
    let clock = Arc::new(FixedClock::new(Utc::now().trunc_subsecs(6)));
    Services {
        catalogue: TaskCatalogueService::new(Arc::clone(&context.tasks), Arc::clone(&clock)),
        directory: UserDirectoryService::new(Arc::clone(&context.users), Arc::clone(&clock)),
        assignments: AssignmentService::new(
            Arc::clone(&context.tasks),
            Arc::clone(&context.users),
            Arc::clone(&clock),
        ),
        completions: CompletionService::new(Arc::clone(&context.tasks), Arc::clone(&clock)),
        sweeper: ExpirationSweeper::new(Arc::clone(&context.tasks)),
        clock,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_sweep_fails_overdue_assigned_task_once() -> Result<(), BoxError> {
    let Some(context) = setup_context()? else {
        return Ok(());
    };
    let system = services(&context);
    let user = system
        .directory
        .register_user(RegisterUserRequest::new("pg-sweep@example.com", "Sweep"))
        .await?;
    let task = system
        .catalogue
        .create(
            CreateTaskRequest::new("Overdue in postgres")
                .with_deadline(mockable::Clock::utc(system.clock.as_ref()) + Duration::minutes(5)),
        )
        .await?;
    let task_id = task.id().to_string();
    system
        .assignments
        .assign(&task_id, &user.id().to_string())
        .await?;
    system.clock.advance(Duration::minutes(6));
    let now = mockable::Clock::utc(system.clock.as_ref());

    let first = system.sweeper.sweep(now).await?;
    let second = system.sweeper.sweep(now).await?;
    let completion = system.completions.complete(&task_id).await;
    let stored = system.catalogue.get(&task_id).await?;

    assert_eq!(first.expired, 1);
    assert_eq!(second.selected, 0);
    assert!(completion.is_err_and(|err| err.kind() == TaskErrorKind::InvalidTransition));
    assert_eq!(stored.status(), TaskStatus::Failed);
    assert_eq!(stored.assigned_to(), Some(user.id()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_concurrent_assignments_have_one_winner() -> Result<(), BoxError> {
    let Some(context) = setup_context()? else {
        return Ok(());
    };
    let system = Arc::new(services(&context));
    let task = system
        .catalogue
        .create(CreateTaskRequest::new("Contested in postgres"))
        .await?;
    let mut handles = Vec::new();
    for index in 0..4 {
        let user = system
            .directory
            .register_user(RegisterUserRequest::new(
                format!("pg-race{index}@example.com"),
                "Racer",
            ))
            .await?;
        let racing = Arc::clone(&system);
        let task_id = task.id().to_string();
        handles.push(tokio::spawn(async move {
            racing
                .assignments
                .assign(&task_id, &user.id().to_string())
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => winners += 1,
            Err(err) => assert_eq!(err.kind(), TaskErrorKind::InvalidTransition),
        }
    }

    assert_eq!(winners, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_names_at_the_column_limit_are_stored_and_longer_ones_rejected()
-> Result<(), BoxError> {
    let Some(context) = setup_context()? else {
        return Ok(());
    };
    let system = services(&context);
    let longest = "\u{e9}".repeat(MAX_TASK_NAME_CHARS);

    let stored = system
        .catalogue
        .create(CreateTaskRequest::new(longest.clone()))
        .await?;
    let overlong = system
        .catalogue
        .create(CreateTaskRequest::new(format!("{longest}x")))
        .await;

    assert_eq!(system.catalogue.get(&stored.id().to_string()).await?.name(), longest);
    assert!(overlong.is_err_and(|err| err.kind() == TaskErrorKind::Validation));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn postgres_update_edits_details_through_a_conditional_write() -> Result<(), BoxError> {
    let Some(context) = setup_context()? else {
        return Ok(());
    };
    let system = services(&context);
    let task = system
        .catalogue
        .create(CreateTaskRequest::new("Inventory"))
        .await?;

    let updated = system
        .catalogue
        .update(
            &task.id().to_string(),
            UpdateTaskRequest::new()
                .with_description("Count the back room")
                .with_task_type("urgent"),
        )
        .await?;
    let loaded = system.catalogue.get(&task.id().to_string()).await?;

    assert_eq!(updated.revision(), task.revision().next());
    assert_eq!(loaded.description(), "Count the back room");
    assert_eq!(loaded.task_type(), TaskType::Urgent);
    assert_eq!(loaded.status(), TaskStatus::Unassigned);
    assert_eq!(loaded.name(), "Inventory");
    Ok(())
}
