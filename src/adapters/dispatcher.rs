//! In-process query dispatcher.

use async_trait::async_trait;

use crate::ports::{AccountQuery, QueryDispatcher, QueryResponse};
use crate::usecases::error::Result;
use crate::usecases::{GetAccountHandler, ListAccountsHandler};

/// Routes each [`AccountQuery`] to its read-side handler, in the calling task.
pub struct InProcessDispatcher {
    list: ListAccountsHandler,
    get: GetAccountHandler,
}

impl InProcessDispatcher {
    pub fn new(list: ListAccountsHandler, get: GetAccountHandler) -> Self {
        Self { list, get }
    }
}

#[async_trait]
impl QueryDispatcher for InProcessDispatcher {
    async fn send(&self, query: AccountQuery) -> Result<QueryResponse> {
        tracing::trace!(?query, "dispatching query");

        match query {
            AccountQuery::List { limit, offset } => self
                .list
                .handle(limit, offset)
                .await
                .map(QueryResponse::Accounts),
            AccountQuery::Get { id } => self.get.handle(&id).await.map(QueryResponse::Account),
        }
    }
}
