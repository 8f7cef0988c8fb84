//! Runs the task expiration sweep against `PostgreSQL` on a fixed interval.
//!
//! Usage:
//!
//! ```text
//! task_sweeper [config-path]
//! ```
//!
//! Without a path, settings come from `TASK_ASSIGNER_SWEEP_INTERVAL_SECS`,
//! `TASK_ASSIGNER_LOG_LEVEL` and `DATABASE_URL`. With a path, the file must
//! hold a JSON [`SweeperConfig`] document. `DATABASE_URL` still applies when
//! the document leaves `database_url` out:
//!
//! ```json
//! {
//!   "interval_secs": 30,
//!   "log_level": "task_assigner=debug,info",
//!   "database_url": "postgres://tasks@localhost/tasks"
//! }
//! ```
//!
//! The worker stops after the current sweep when the process receives
//! Ctrl-C.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use mockable::DefaultClock;
use std::sync::Arc;
use task_assigner::config::{ConfigError, SweeperConfig};
use task_assigner::task::{adapters::postgres::PostgresTaskRepository, services::ExpirationSweeper};
use task_assigner::telemetry::{TelemetryError, init_tracing};
use task_assigner::worker::SweepWorker;
use thiserror::Error;
use tokio::runtime::Builder;
use tokio::sync::watch;
use tracing::{info, warn};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that stop the sweeper before or while it runs.
#[derive(Debug, Error)]
enum SweeperError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("failed to read sweeper config: {0}")]
    ConfigRead(#[source] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
}

fn main() -> Result<(), BoxError> {
    run().map_err(Into::into)
}

fn run() -> Result<(), SweeperError> {
    let config = load_config(std::env::args().skip(1))?;
    init_tracing(config.log_level())?;

    let database_url = config
        .database_url()
        .ok_or(ConfigError::MissingDatabaseUrl)?;
    let pool = Pool::builder().build(ConnectionManager::<PgConnection>::new(database_url))?;
    let repository = Arc::new(PostgresTaskRepository::new(pool));
    let worker = SweepWorker::new(
        ExpirationSweeper::new(repository),
        Arc::new(DefaultClock),
        config.interval(),
    );

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(SweeperError::RuntimeInit)?;

    runtime.block_on(async move {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "failed to listen for Ctrl-C; stopping sweeper");
            }
            if shutdown_tx.send(true).is_err() {
                warn!("sweep worker stopped before shutdown was signalled");
            }
        });
        let ticks = worker.run(shutdown_rx).await;
        info!(ticks, "task sweeper exiting");
    });
    Ok(())
}

fn load_config(mut args: impl Iterator<Item = String>) -> Result<SweeperConfig, SweeperError> {
    let path = args.next();
    if let Some(extra) = args.next() {
        return Err(SweeperError::InvalidArgs(format!(
            "unexpected argument '{extra}'; expected at most one config path"
        )));
    }
    let Some(config_path) = path else {
        return Ok(SweeperConfig::from_env()?);
    };
    let document = std::fs::read_to_string(&config_path).map_err(SweeperError::ConfigRead)?;
    Ok(SweeperConfig::from_json(&document)?.with_env_fallback(|key| std::env::var(key).ok()))
}
