//! Interface for observability.

/// Port for telemetry/observability operations.
pub trait TelemetryPort: Send + Sync {
    /// Record a new account creation.
    fn record_account_created(&self, account_id: &str);

    /// Record a creation the store did not acknowledge.
    fn record_create_failed(&self, account_id: &str, reason: &str);

    /// Record a request rejected by validation.
    fn record_validation_failed(&self, failures: usize);
}
