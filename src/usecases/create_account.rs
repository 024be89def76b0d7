//! Account creation use case implementation.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use tokio_util::sync::CancellationToken;

use crate::account::{
    ACCOUNTS_COLLECTION, AccountDocument, AccountViewModel, CreateAccountRequest,
    CreateAccountValidator, field_errors,
};
use crate::config::Workflow;
use crate::ports::{
    AccountQuery, Clock, CreateAccount, DocumentStore, IdGenerator, QueryDispatcher, StoreError,
    TelemetryPort,
};
use crate::usecases::error::{ApplicationError, Result};

/// Entity name reported when a creation fails.
pub const ACCOUNT_DOCUMENT: &str = "AccountDocument";

/// Account creation use case service.
pub struct CreateAccountUseCase {
    store: Arc<dyn DocumentStore>,
    dispatcher: Arc<dyn QueryDispatcher>,
    validator: CreateAccountValidator,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    telemetry: Arc<dyn TelemetryPort>,
    options: Workflow,
}

impl CreateAccountUseCase {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        dispatcher: Arc<dyn QueryDispatcher>,
        validator: CreateAccountValidator,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        telemetry: Arc<dyn TelemetryPort>,
        options: Workflow,
    ) -> Self {
        Self {
            store,
            dispatcher,
            validator,
            ids,
            clock,
            telemetry,
            options,
        }
    }

    fn create_failed(
        &self,
        document: &AccountDocument,
        status: Option<StatusCode>,
        source: Option<StoreError>,
    ) -> ApplicationError {
        let id = document.id.to_string();
        let reason = match (&status, &source) {
            (Some(status), _) => status.to_string(),
            (None, Some(err)) => err.to_string(),
            (None, None) => "unknown".to_owned(),
        };
        self.telemetry.record_create_failed(&id, &reason);

        ApplicationError::CreateFailed {
            entity: ACCOUNT_DOCUMENT,
            id,
            status,
            source,
        }
    }

    /// Read-side refresh after a write. Never fails the request.
    async fn list_accounts(&self, cancel: &CancellationToken) {
        let query = AccountQuery::list(None, None);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = self.dispatcher.send(query) => result,
        };

        if let Err(err) = result {
            tracing::warn!(error = %err, "list accounts query failed after creation");
        }
    }
}

#[async_trait]
impl CreateAccount for CreateAccountUseCase {
    async fn execute(
        &self,
        request: CreateAccountRequest,
        cancel: CancellationToken,
    ) -> Result<AccountViewModel> {
        let id = self.ids.generate();

        if let Err(errors) = self.validator.validate(&request).into_result() {
            self.telemetry
                .record_validation_failed(field_errors(&errors).len());

            if self.options.enforce_validation {
                return Err(errors.into());
            }
            tracing::warn!(account_id = %id, error = %errors, "invalid request accepted, enforcement disabled");
        }

        let document = AccountDocument::new(id, request.name, self.clock.now());
        let payload = serde_json::to_value(&document)
            .map_err(|err| self.create_failed(&document, None, Some(err.into())))?;

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ApplicationError::Cancelled),
            response = self.store.create_document(ACCOUNTS_COLLECTION, payload) => response,
        };

        let response = match response {
            Ok(response) if response.is_ok() => response,
            Ok(response) => {
                return Err(self.create_failed(&document, Some(response.status), None));
            },
            Err(err) => return Err(self.create_failed(&document, None, Some(err))),
        };
        tracing::debug!(account_id = %id, status = %response.status, "document created");

        self.telemetry.record_account_created(&id.to_string());

        if self.options.list_after_create {
            self.list_accounts(&cancel).await;
        }

        if cancel.is_cancelled() {
            tracing::warn!(account_id = %id, "request cancelled after the account was persisted");
            return Err(ApplicationError::Cancelled);
        }

        Ok(AccountViewModel::new(document.into()))
    }
}
