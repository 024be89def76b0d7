//! HTTP routes.
pub mod accounts;
pub mod status;
