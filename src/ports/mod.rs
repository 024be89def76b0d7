//! These traits define what the application needs from the outside world,
//! and what the outside world may ask from the application.

pub mod clock;
pub mod dispatcher;
pub mod inbound;
pub mod store;
pub mod telemetry;

pub use clock::*;
pub use dispatcher::*;
pub use inbound::*;
pub use store::*;
pub use telemetry::*;
