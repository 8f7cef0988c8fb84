//! When steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use chrono::Duration;
use eyre::WrapErr;
use rstest_bdd_macros::when;
use task_assigner::task::{domain::Task, services::TaskServiceError};

fn record(world: &mut TaskLifecycleWorld, result: Result<Task, TaskServiceError>) {
    if let Ok(ref updated) = result {
        world.current_task = Some(updated.clone());
    }
    world.last_result = Some(result);
}

#[when(r#"the task is assigned to "{email}""#)]
fn assign_task(world: &mut TaskLifecycleWorld, email: String) -> Result<(), eyre::Report> {
    let task_id = world.current_task_id()?;
    let user_id = world.user(&email)?.id().to_string();
    let result = run_async(world.assignments.assign(&task_id, &user_id));
    record(world, result);
    Ok(())
}

#[when("the task is completed")]
fn complete_task(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.current_task_id()?;
    let result = run_async(world.completions.complete(&task_id));
    record(world, result);
    Ok(())
}

#[when("{minutes:i64} minutes pass")]
fn minutes_pass(world: &mut TaskLifecycleWorld, minutes: i64) {
    world.clock.advance(Duration::minutes(minutes));
}

#[when("the expiration sweep runs")]
fn sweep_runs(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let report = run_async(world.sweeper.sweep(world.now())).wrap_err("run expiration sweep")?;
    world.last_report = Some(report);
    Ok(())
}
