//! Clock and identifier ports.

use chrono::{DateTime, Utc};

use crate::account::AccountId;

/// Port for getting the current time.
pub trait Clock: Send + Sync {
    /// Current instant, in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Port generating collision-free account identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> AccountId;
}
