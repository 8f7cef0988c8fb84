//! Expiration sweep that fails tasks past their deadline.

use super::{TaskServiceError, TaskServiceResult, transition::transition_from};
use crate::task::{
    domain::{Task, TaskEvent},
    ports::TaskRepository,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome counts of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Tasks returned by the selection query.
    pub selected: usize,
    /// Tasks actually moved to `failed`.
    pub expired: usize,
    /// Tasks that left the eligible set before their write.
    pub skipped: usize,
    /// Tasks whose write failed.
    pub failed: usize,
}

enum ExpiryOutcome {
    Expired,
    Skipped,
    Failed,
}

/// Fails overdue tasks through the lifecycle state machine.
///
/// Selection and writes are two phases: every selected task is written with
/// a conditional update and re-validated when a concurrent writer got there
/// first. No lock is held across tasks.
#[derive(Clone)]
pub struct ExpirationSweeper<R>
where
    R: TaskRepository,
{
    tasks: Arc<R>,
}

impl<R> ExpirationSweeper<R>
where
    R: TaskRepository,
{
    /// Creates a new sweeper.
    #[must_use]
    pub const fn new(tasks: Arc<R>) -> Self {
        Self { tasks }
    }

    /// Fails every task whose deadline is before `now` and that has not
    /// reached a terminal status.
    ///
    /// A failure on one task is logged and counted; the sweep continues with
    /// the remaining tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Repository`] only when the selection query
    /// itself fails.
    pub async fn sweep(&self, now: DateTime<Utc>) -> TaskServiceResult<SweepReport> {
        let candidates = self.tasks.find_expirable(now).await?;
        let mut report = SweepReport {
            selected: candidates.len(),
            ..SweepReport::default()
        };

        for candidate in candidates {
            match self.expire(candidate, now).await {
                ExpiryOutcome::Expired => report.expired += 1,
                ExpiryOutcome::Skipped => report.skipped += 1,
                ExpiryOutcome::Failed => report.failed += 1,
            }
        }

        info!(
            selected = report.selected,
            expired = report.expired,
            skipped = report.skipped,
            failed = report.failed,
            "expiration sweep finished"
        );
        Ok(report)
    }

    async fn expire(&self, candidate: Task, now: DateTime<Utc>) -> ExpiryOutcome {
        let task_id = candidate.id();
        if !candidate.is_expirable_at(now) {
            return ExpiryOutcome::Skipped;
        }
        match transition_from(&*self.tasks, candidate, TaskEvent::Expire { at: now }).await {
            Ok(_) => ExpiryOutcome::Expired,
            Err(TaskServiceError::Domain(err)) if err.is_invalid_transition() => {
                debug!(%task_id, error = %err, "task left the expirable set before expiry");
                ExpiryOutcome::Skipped
            }
            Err(TaskServiceError::TaskNotFound(_)) => {
                debug!(%task_id, "task disappeared before expiry");
                ExpiryOutcome::Skipped
            }
            Err(err) => {
                warn!(%task_id, error = %err, "failed to expire task");
                ExpiryOutcome::Failed
            }
        }
    }
}
