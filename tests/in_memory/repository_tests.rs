//! Repository contract tests for the in-memory adapters.

use super::helpers::{TaskSystem, system};
use chrono::Duration;
use rstest::rstest;
use task_assigner::task::{
    domain::{Revision, Task, TaskDraft, TaskEvent, TaskStatus, User, UserEmail, UserFlags, apply},
    ports::{TaskQuery, TaskRepository, TaskRepositoryError, UserRepository, UserRepositoryError},
};

fn draft(name: &str) -> Result<TaskDraft, eyre::Report> {
    Ok(TaskDraft::new(name)?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_rejects_duplicate_identifiers(system: TaskSystem) -> Result<(), eyre::Report> {
    let task = Task::new(draft("Duplicate")?, system.clock.as_ref());
    system.tasks.store(&task).await?;

    let result = system.tasks.store(&task).await;

    eyre::ensure!(
        matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()),
        "expected duplicate task error, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_bumps_revision_and_rejects_stale_writers(
    system: TaskSystem,
) -> Result<(), eyre::Report> {
    let task = Task::new(draft("Versioned")?, system.clock.as_ref());
    system.tasks.store(&task).await?;
    let expired = apply(task.clone(), TaskEvent::Expire { at: system.now() })?;

    let stored = system.tasks.update(&expired).await?;
    let stale = system.tasks.update(&expired).await;

    eyre::ensure!(stored.revision() == Revision::new(1), "revision not bumped");
    eyre::ensure!(
        matches!(
            stale,
            Err(TaskRepositoryError::RevisionConflict { expected, actual, .. })
                if expected == Revision::INITIAL && actual == Revision::new(1)
        ),
        "expected revision conflict, got {stale:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_unknown_task_is_not_found(system: TaskSystem) -> Result<(), eyre::Report> {
    let task = Task::new(draft("Ghost")?, system.clock.as_ref());

    let result = system.tasks.update(&task).await;

    eyre::ensure!(
        matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == task.id()),
        "expected not found, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_by_id_still_returns_deleted_tasks(system: TaskSystem) -> Result<(), eyre::Report> {
    let mut task = Task::new(draft("Soft deleted")?, system.clock.as_ref());
    system.tasks.store(&task).await?;
    task.mark_deleted(system.clock.as_ref());
    system.tasks.update(&task).await?;

    let found = system
        .tasks
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("deleted task should still be readable"))?;
    let listed = system.tasks.find_many(&TaskQuery::new()).await?;

    eyre::ensure!(found.is_deleted(), "task should be flagged deleted");
    eyre::ensure!(listed.is_empty(), "deleted tasks must not be listed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_expirable_orders_by_deadline(system: TaskSystem) -> Result<(), eyre::Report> {
    let now = system.now();
    let later = Task::new(
        draft("Later")?.with_deadline(now - Duration::minutes(5)),
        system.clock.as_ref(),
    );
    let earlier = Task::new(
        draft("Earlier")?.with_deadline(now - Duration::minutes(50)),
        system.clock.as_ref(),
    );
    let future = Task::new(
        draft("Future")?.with_deadline(now + Duration::minutes(5)),
        system.clock.as_ref(),
    );
    for task in [&later, &earlier, &future] {
        system.tasks.store(task).await?;
    }

    let expirable = system.tasks.find_expirable(now).await?;
    let ids: Vec<_> = expirable.iter().map(Task::id).collect();

    eyre::ensure!(
        ids == vec![earlier.id(), later.id()],
        "unexpected selection {ids:?}"
    );
    eyre::ensure!(
        expirable
            .iter()
            .all(|task| task.status() == TaskStatus::Unassigned),
        "selection should not change statuses"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn user_store_rejects_duplicate_email(system: TaskSystem) -> Result<(), eyre::Report> {
    let first = User::new(
        UserEmail::new("lee@example.com")?,
        "Lee",
        UserFlags::default(),
        system.clock.as_ref(),
    )?;
    let second = User::new(
        UserEmail::new("LEE@example.com")?,
        "Lee Two",
        UserFlags::default(),
        system.clock.as_ref(),
    )?;
    system.users.store(&first).await?;

    let duplicate_email = system.users.store(&second).await;
    let duplicate_id = system.users.store(&first).await;

    eyre::ensure!(
        matches!(duplicate_email, Err(UserRepositoryError::DuplicateEmail(_))),
        "expected duplicate email, got {duplicate_email:?}"
    );
    eyre::ensure!(
        matches!(duplicate_id, Err(UserRepositoryError::DuplicateUser(id)) if id == first.id()),
        "expected duplicate user, got {duplicate_id:?}"
    );
    eyre::ensure!(
        system.users.find_by_id(second.id()).await?.is_none(),
        "rejected user must not be stored"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn user_listing_is_ordered_by_email(system: TaskSystem) -> Result<(), eyre::Report> {
    for (email, name) in [("omar@example.com", "Omar"), ("bea@example.com", "Bea")] {
        let user = User::new(
            UserEmail::new(email)?,
            name,
            UserFlags::default(),
            system.clock.as_ref(),
        )?;
        system.users.store(&user).await?;
    }

    let names: Vec<String> = system
        .users
        .find_all()
        .await?
        .iter()
        .map(|user| user.name().to_owned())
        .collect();

    eyre::ensure!(names == ["Bea", "Omar"], "unexpected order {names:?}");
    Ok(())
}
