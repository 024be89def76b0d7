//! In-memory document store, used for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{Value, json};
use tokio::sync::RwLock;

use crate::ports::{DocumentCatalog, DocumentResponse, DocumentStore, StoreError, document_id};

#[derive(Debug, Default)]
struct Collection {
    /// Insertion order.
    ids: Vec<String>,
    documents: HashMap<String, Value>,
}

/// Process-local [`DocumentStore`]. Content is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents across every collection.
    pub async fn len(&self) -> usize {
        self.collections
            .read()
            .await
            .values()
            .map(|collection| collection.ids.len())
            .sum()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create_document(
        &self,
        collection: &str,
        document: Value,
    ) -> Result<DocumentResponse, StoreError> {
        let Some(id) = document_id(&document).map(str::to_owned) else {
            return Ok(DocumentResponse::new(
                StatusCode::BAD_REQUEST,
                json!({ "message": "document must carry a string `id`" }),
            ));
        };

        let mut collections = self.collections.write().await;
        let collection = collections.entry(collection.to_owned()).or_default();
        if collection.documents.contains_key(&id) {
            return Ok(DocumentResponse::status(StatusCode::CONFLICT));
        }

        collection.ids.push(id.clone());
        collection.documents.insert(id, document.clone());

        Ok(DocumentResponse::new(StatusCode::OK, document))
    }

    async fn read_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<DocumentResponse, StoreError> {
        let collections = self.collections.read().await;

        Ok(
            match collections
                .get(collection)
                .and_then(|collection| collection.documents.get(id))
            {
                Some(document) => DocumentResponse::new(StatusCode::OK, document.clone()),
                None => DocumentResponse::status(StatusCode::NOT_FOUND),
            },
        )
    }
}

#[async_trait]
impl DocumentCatalog for MemoryDocumentStore {
    async fn list_documents(
        &self,
        collection: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        let Some(collection) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(collection
            .ids
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .filter_map(|id| collection.documents.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_read() {
        let store = MemoryDocumentStore::new();
        let document = json!({ "id": "a", "name": "Acme" });

        let created = store.create_document("accounts", document.clone()).await.unwrap();
        assert_eq!(created.status, StatusCode::OK);

        let read = store.read_document("accounts", "a").await.unwrap();
        assert_eq!(read.status, StatusCode::OK);
        assert_eq!(read.body, document);

        let other = store.read_document("others", "a").await.unwrap();
        assert_eq!(other.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_id_conflicts() {
        let store = MemoryDocumentStore::new();

        store.create_document("accounts", json!({ "id": "a" })).await.unwrap();
        let second = store
            .create_document("accounts", json!({ "id": "a", "name": "other" }))
            .await
            .unwrap();

        assert_eq!(second.status, StatusCode::CONFLICT);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_document_without_id() {
        let store = MemoryDocumentStore::new();

        for document in [json!({ "name": "Acme" }), json!({ "id": "" }), json!({ "id": 3 })] {
            let response = store.create_document("accounts", document).await.unwrap();
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
        }
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryDocumentStore::new();
        for id in ["a", "b", "c"] {
            store.create_document("accounts", json!({ "id": id })).await.unwrap();
        }

        let ids: Vec<Value> = store
            .list_documents("accounts", 2, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|document| document["id"].clone())
            .collect();

        assert_eq!(ids, [json!("c"), json!("b")]);
        assert!(store.list_documents("empty", 10, 0).await.unwrap().is_empty());
    }
}
