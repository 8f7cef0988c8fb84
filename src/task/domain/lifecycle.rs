//! Task lifecycle state machine.
//!
//! [`apply`] is the only place where a task's status changes. Services read
//! a task, pass it through [`apply`] together with a [`TaskEvent`], and
//! persist the result with a conditional write.
//!
//! | From | Event | To |
//! |---|---|---|
//! | `unassigned` | [`TaskEvent::Assign`] | `pending` |
//! | `pending` | [`TaskEvent::Start`] | `in_progress` |
//! | `pending`, `in_progress` | [`TaskEvent::Complete`] | `completed` |
//! | `unassigned`, `pending`, `in_progress` | [`TaskEvent::Expire`] | `failed` |

use super::{Task, TaskDomainError, TaskStatus, UserId};
use chrono::{DateTime, Utc};

/// Lifecycle event applied to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    /// Bind the task to a user.
    Assign {
        /// User receiving the task.
        assignee: UserId,
        /// When the assignment happened.
        at: DateTime<Utc>,
    },
    /// The assignee started working on the task.
    Start {
        /// When work started.
        at: DateTime<Utc>,
    },
    /// The task was completed.
    Complete {
        /// Completion time, stored as `completed_at`.
        at: DateTime<Utc>,
    },
    /// The task's deadline passed.
    Expire {
        /// Sweep time.
        at: DateTime<Utc>,
    },
}

impl TaskEvent {
    /// Returns the status this event moves a task into.
    #[must_use]
    pub const fn target_status(self) -> TaskStatus {
        match self {
            Self::Assign { .. } => TaskStatus::Pending,
            Self::Start { .. } => TaskStatus::InProgress,
            Self::Complete { .. } => TaskStatus::Completed,
            Self::Expire { .. } => TaskStatus::Failed,
        }
    }

    /// Returns the time the event occurred.
    #[must_use]
    pub const fn occurred_at(self) -> DateTime<Utc> {
        match self {
            Self::Assign { at, .. }
            | Self::Start { at }
            | Self::Complete { at }
            | Self::Expire { at } => at,
        }
    }
}

/// Applies `event` to `task`, returning the transitioned task.
///
/// The result depends only on the task value and the event. Nothing is
/// persisted; the revision is left untouched for the store's conditional
/// write.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidTransition`] carrying the current and
/// requested status when the transition is not in the lifecycle table.
pub fn apply(mut task: Task, event: TaskEvent) -> Result<Task, TaskDomainError> {
    let from = task.status();
    let to = event.target_status();
    if !from.can_transition_to(to) {
        return Err(TaskDomainError::InvalidTransition {
            task_id: task.id(),
            from,
            to,
        });
    }

    match event {
        TaskEvent::Assign { assignee, .. } => task.bind_assignee(assignee),
        TaskEvent::Complete { at } => task.stamp_completed(at),
        TaskEvent::Start { .. } | TaskEvent::Expire { .. } => {}
    }
    task.enter_status(to, event.occurred_at());
    Ok(task)
}
