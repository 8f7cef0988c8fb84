//! Task Assigner: task assignment and deadline enforcement.
//!
//! This crate assigns units of work to users, tracks each task through its
//! lifecycle, and fails tasks that miss their deadline with a periodic
//! expiration sweep.
//!
//! # Architecture
//!
//! Task Assigner follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, clock)
//!
//! # Modules
//!
//! - [`task`]: Lifecycle state machine, assignment, completion, expiry, and
//!   queries
//! - [`worker`]: Periodic driver for the expiration sweep
//! - [`config`]: Sweeper configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod task;
pub mod telemetry;
pub mod worker;
