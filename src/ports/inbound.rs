//! Inbound ports, implemented by the use cases and driven by the router.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::account::{AccountViewModel, CreateAccountRequest};
use crate::usecases::error::Result;

/// Inbound port for account creation.
#[async_trait]
pub trait CreateAccount: Send + Sync {
    /// Create a new account and return its view model.
    ///
    /// Cancelling `cancel` aborts pending I/O. A document written before
    /// cancellation is kept.
    async fn execute(
        &self,
        request: CreateAccountRequest,
        cancel: CancellationToken,
    ) -> Result<AccountViewModel>;
}
