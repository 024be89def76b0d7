//! Application-level errors.

use axum::http::StatusCode;
use validator::ValidationErrors;

use crate::ports::StoreError;

pub type Result<T> = std::result::Result<T, ApplicationError>;

/// Errors that can occur in the application layer.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("request failed validation")]
    ValidationFailed(#[from] ValidationErrors),

    #[error("failed to create {entity} `{id}`")]
    CreateFailed {
        entity: &'static str,
        id: String,
        /// Status answered by the store, if it answered at all.
        status: Option<StatusCode>,
        #[source]
        source: Option<StoreError>,
    },

    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApplicationError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
