//! Read-side query dispatch port.

use async_trait::async_trait;

use crate::account::{Account, AccountId};
use crate::usecases::error::Result;

/// Queries served by the read side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountQuery {
    /// Accounts, newest first.
    List { limit: usize, offset: usize },
    /// A single account by id.
    Get { id: AccountId },
}

impl AccountQuery {
    pub const DEFAULT_LIMIT: usize = 50;
    pub const MAX_LIMIT: usize = 500;

    /// List query with bounded pagination.
    pub fn list(limit: Option<usize>, offset: Option<usize>) -> Self {
        Self::List {
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            offset: offset.unwrap_or(0),
        }
    }
}

/// Result of an [`AccountQuery`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResponse {
    Accounts(Vec<Account>),
    Account(Account),
}

/// Port sending queries to decoupled read-side handlers.
#[async_trait]
pub trait QueryDispatcher: Send + Sync {
    async fn send(&self, query: AccountQuery) -> Result<QueryResponse>;
}
