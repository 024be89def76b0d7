//! PostgreSQL implementation of the document store.
//!
//! Documents live in a single JSONB table keyed by `(collection, id)` and
//! listed in insertion order, newest first.

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::types::Json;

use crate::ports::{DocumentCatalog, DocumentResponse, DocumentStore, StoreError, document_id};

/// PostgreSQL document store.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a new [`PgDocumentStore`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn create_document(
        &self,
        collection: &str,
        document: Value,
    ) -> Result<DocumentResponse, StoreError> {
        let Some(id) = document_id(&document) else {
            return Ok(DocumentResponse::new(
                StatusCode::BAD_REQUEST,
                json!({ "message": "document must carry a string `id`" }),
            ));
        };

        let result = sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO NOTHING
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&document))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(DocumentResponse::status(StatusCode::CONFLICT));
        }

        Ok(DocumentResponse::new(StatusCode::OK, document))
    }

    async fn read_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<DocumentResponse, StoreError> {
        let body = sqlx::query_scalar::<_, Json<Value>>(
            r#"SELECT body FROM documents WHERE collection = $1 AND id = $2"#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match body {
            Some(Json(body)) => DocumentResponse::new(StatusCode::OK, body),
            None => DocumentResponse::status(StatusCode::NOT_FOUND),
        })
    }
}

#[async_trait]
impl DocumentCatalog for PgDocumentStore {
    async fn list_documents(
        &self,
        collection: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Value>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let rows = sqlx::query_scalar::<_, Json<Value>>(
            r#"
            SELECT body FROM documents
            WHERE collection = $1
            ORDER BY seq DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(collection)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|Json(body)| body).collect())
    }
}
