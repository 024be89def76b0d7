//! Read-side query handlers.

use std::sync::Arc;

use axum::http::StatusCode;

use crate::account::{ACCOUNTS_COLLECTION, Account, AccountDocument, AccountId};
use crate::ports::{DocumentCatalog, DocumentStore, StoreError};
use crate::usecases::error::{ApplicationError, Result};

const ACCOUNT: &str = "Account";

/// Lists accounts, newest first.
pub struct ListAccountsHandler {
    catalog: Arc<dyn DocumentCatalog>,
}

impl ListAccountsHandler {
    pub fn new(catalog: Arc<dyn DocumentCatalog>) -> Self {
        Self { catalog }
    }

    pub async fn handle(&self, limit: usize, offset: usize) -> Result<Vec<Account>> {
        let documents = self
            .catalog
            .list_documents(ACCOUNTS_COLLECTION, limit, offset)
            .await?;

        documents
            .into_iter()
            .map(|document| {
                serde_json::from_value::<AccountDocument>(document)
                    .map(Account::from)
                    .map_err(|err| ApplicationError::from(StoreError::from(err)))
            })
            .collect()
    }
}

/// Reads one account back from the document store.
pub struct GetAccountHandler {
    store: Arc<dyn DocumentStore>,
}

impl GetAccountHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, id: &AccountId) -> Result<Account> {
        let response = self
            .store
            .read_document(ACCOUNTS_COLLECTION, &id.to_string())
            .await?;

        match response.status {
            StatusCode::OK => {
                let document = serde_json::from_value::<AccountDocument>(response.body)
                    .map_err(StoreError::from)?;
                Ok(document.into())
            },
            StatusCode::NOT_FOUND => Err(ApplicationError::not_found(ACCOUNT, id)),
            status => Err(StoreError::Unavailable(format!(
                "unexpected status {status} reading account {id}"
            ))
            .into()),
        }
    }
}
