//! Adapter implementations for task ports.

pub mod clock;
pub mod memory;
pub mod postgres;
