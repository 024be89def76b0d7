//! Application services implementing business logic.

pub mod create_account;
pub mod error;
pub mod queries;

pub use create_account::*;
pub use queries::*;
