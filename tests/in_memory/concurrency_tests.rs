//! Competing writers on a single task.

use super::helpers::{TaskSystem, system};
use chrono::Duration;
use rstest::rstest;
use std::sync::Arc;
use task_assigner::task::{
    domain::TaskStatus,
    services::{CreateTaskRequest, TaskErrorKind},
};

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_assignments_have_exactly_one_winner(
    system: TaskSystem,
) -> Result<(), eyre::Report> {
    let shared = Arc::new(system);
    let task = shared
        .create_task(CreateTaskRequest::new("Contested"))
        .await?;
    let mut contenders = Vec::new();
    for index in 0..8 {
        contenders.push(shared.register(&format!("user{index}@example.com")).await?);
    }

    let mut handles = Vec::new();
    for user in &contenders {
        let racing = Arc::clone(&shared);
        let task_id = task.id().to_string();
        let user_id = user.id().to_string();
        handles.push(tokio::spawn(async move {
            racing.assignments.assign(&task_id, &user_id).await
        }));
    }
    let mut winners = Vec::new();
    for handle in handles {
        match handle.await? {
            Ok(assigned) => winners.push(assigned),
            Err(err) => {
                eyre::ensure!(
                    err.kind() == TaskErrorKind::InvalidTransition,
                    "losers should see an invalid transition, got {err}"
                );
            }
        }
    }

    eyre::ensure!(winners.len() == 1, "expected one winner, got {}", winners.len());
    let stored = shared.catalogue.get(&task.id().to_string()).await?;
    let winner = winners
        .first()
        .ok_or_else(|| eyre::eyre!("missing winner"))?;
    eyre::ensure!(stored.status() == TaskStatus::Pending, "task not pending");
    eyre::ensure!(
        stored.assigned_to() == winner.assigned_to(),
        "stored assignee differs from the winner"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_sweeps_expire_each_task_once(system: TaskSystem) -> Result<(), eyre::Report> {
    let shared = Arc::new(system);
    for index in 0..10 {
        shared
            .create_task(
                CreateTaskRequest::new(format!("Overdue {index}"))
                    .with_deadline(shared.now() + Duration::minutes(index)),
            )
            .await?;
    }
    shared.clock.advance(Duration::hours(1));
    let now = shared.now();

    let first = tokio::spawn({
        let racing = Arc::clone(&shared);
        async move { racing.sweeper.sweep(now).await }
    });
    let second = tokio::spawn({
        let racing = Arc::clone(&shared);
        async move { racing.sweeper.sweep(now).await }
    });
    let first_report = first.await??;
    let second_report = second.await??;

    eyre::ensure!(
        first_report.expired + second_report.expired == 10,
        "each task should expire exactly once: {first_report:?} / {second_report:?}"
    );
    eyre::ensure!(
        first_report.failed == 0 && second_report.failed == 0,
        "no writes should fail"
    );
    Ok(())
}
