//! Document store ports.

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;

/// Errors raised when the store cannot be reached or cannot answer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document could not be encoded or decoded: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database request failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// HTTP-style answer of the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl DocumentResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// Response without payload.
    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: Value::Null,
        }
    }

    /// Whether the store acknowledged the operation.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }
}

/// Port for the schemaless document store.
///
/// Documents are addressed by collection and by their `id` field.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create `document` inside `collection`.
    ///
    /// Answers `200 OK` on success, `409 Conflict` if the id already exists
    /// and `400 Bad Request` if the document has no string `id`.
    async fn create_document(
        &self,
        collection: &str,
        document: Value,
    ) -> Result<DocumentResponse, StoreError>;

    /// Read the document `id` from `collection`.
    ///
    /// Answers `200 OK` with the document as body, or `404 Not Found`.
    async fn read_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<DocumentResponse, StoreError>;
}

/// Read-side port listing documents of a collection, newest first.
#[async_trait]
pub trait DocumentCatalog: Send + Sync {
    async fn list_documents(
        &self,
        collection: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Value>, StoreError>;
}

/// Extract the string `id` of a raw document.
pub fn document_id(document: &Value) -> Option<&str> {
    document
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}
