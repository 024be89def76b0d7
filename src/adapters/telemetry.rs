//! Telemetry adapters - Observability implementations.

use crate::ports::TelemetryPort;

/// Tracing-based telemetry adapter, also feeding `metrics` counters.
#[derive(Debug, Default)]
pub struct TracingTelemetry;

impl TracingTelemetry {
    /// Create a new [`TracingTelemetry`].
    pub fn new() -> Self {
        Self
    }
}

impl TelemetryPort for TracingTelemetry {
    fn record_account_created(&self, account_id: &str) {
        tracing::info!(account_id, "account created");
        metrics::counter!("accounts_created_total").increment(1);
    }

    fn record_create_failed(&self, account_id: &str, reason: &str) {
        tracing::error!(account_id, reason, "account creation failed");
        metrics::counter!("accounts_create_failures_total").increment(1);
    }

    fn record_validation_failed(&self, failures: usize) {
        tracing::debug!(failures, "account request failed validation");
        metrics::counter!("accounts_validation_failures_total").increment(1);
    }
}
