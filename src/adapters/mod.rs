//! Outbound adapters.

pub mod clock;
pub mod dispatcher;
pub mod memory;
pub mod postgres;
pub mod telemetry;
