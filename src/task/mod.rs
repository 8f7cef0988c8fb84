//! Task assignment and lifecycle management.
//!
//! Tasks are created unassigned, bound to a user, optionally started, and
//! finish either completed or failed by the expiration sweep once their
//! deadline passes. The module follows hexagonal architecture:
//!
//! - Domain types and the lifecycle state machine in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
