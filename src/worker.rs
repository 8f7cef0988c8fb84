//! Periodic driver for the expiration sweep.
//!
//! The worker owns an [`ExpirationSweeper`] and runs it on a fixed interval
//! until told to stop. Each tick sweeps against the injected clock's current
//! UTC time; a failed sweep is logged and the next tick proceeds normally.

use crate::task::{
    ports::TaskRepository,
    services::{ExpirationSweeper, SweepReport, TaskServiceResult},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Runs the expiration sweep on a fixed interval.
pub struct SweepWorker<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    sweeper: ExpirationSweeper<R>,
    clock: Arc<C>,
    interval: Duration,
}

impl<R, C> SweepWorker<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a worker that sweeps every `interval`.
    #[must_use]
    pub const fn new(sweeper: ExpirationSweeper<R>, clock: Arc<C>, interval: Duration) -> Self {
        Self {
            sweeper,
            clock,
            interval,
        }
    }

    /// Runs a single sweep at the clock's current time.
    ///
    /// # Errors
    ///
    /// Returns the sweeper's error when the selection query fails.
    pub async fn tick(&self) -> TaskServiceResult<SweepReport> {
        self.sweeper.sweep(self.clock.utc()).await
    }

    /// Sweeps on every interval until `shutdown` carries `true` or its
    /// sender is dropped. The first sweep runs immediately.
    ///
    /// Returns the number of sweeps attempted.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0_u64;
        info!(interval_secs = self.interval.as_secs(), "sweep worker started");

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    ticks += 1;
                    if let Err(err) = self.tick().await {
                        error!(error = %err, "expiration sweep failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!(ticks, "sweep worker stopped");
        ticks
    }
}
