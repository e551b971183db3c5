//! In-memory fallback store.
//!
//! # Responsibilities
//! - Stand in for the document database when it is unreachable
//! - Generate monotonically increasing string ids
//! - Preserve insertion order for list()
//!
//! # Design Decisions
//! - Ids come from an atomic counter; the runtime is multi-threaded,
//!   so generation must be atomic
//! - Contents are lost on process restart; read-after-write holds only
//!   within one process

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{BackendKind, DocumentStore, StorageError};

/// Process-local ordered document collection.
pub struct MemoryStore {
    /// Documents in insertion order, keyed by generated id.
    docs: RwLock<Vec<(String, Value)>>,
    /// Next id to hand out.
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn generate_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, mut doc: Value) -> Result<String, StorageError> {
        let id = self.generate_id();
        let obj = doc.as_object_mut().ok_or(StorageError::MalformedDocument)?;
        obj.insert("id".into(), Value::String(id.clone()));
        self.docs.write().await.push((id.clone(), doc));
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Value>, StorageError> {
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|(k, _)| k == id).map(|(_, v)| v.clone()))
    }

    async fn list(&self) -> Result<Vec<Value>, StorageError> {
        let docs = self.docs.read().await;
        Ok(docs.iter().map(|(_, v)| v.clone()).collect())
    }

    async fn update(&self, id: &str, changes: Value) -> Result<Option<Value>, StorageError> {
        let fields = match changes {
            Value::Object(map) => map,
            _ => return Err(StorageError::MalformedDocument),
        };

        let mut docs = self.docs.write().await;
        let Some((_, doc)) = docs.iter_mut().find(|(k, _)| k == id) else {
            return Ok(None);
        };
        let obj = doc.as_object_mut().ok_or(StorageError::MalformedDocument)?;
        for (key, value) in fields {
            obj.insert(key, value);
        }
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|(k, _)| k != id);
        Ok(docs.len() < before)
    }

    async fn find_by_field(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StorageError> {
        let docs = self.docs.read().await;
        Ok(docs
            .iter()
            .find(|(_, doc)| doc.get(field).and_then(Value::as_str) == Some(value))
            .map(|(_, doc)| doc.clone()))
    }

    async fn count(&self) -> Result<u64, StorageError> {
        Ok(self.docs.read().await.len() as u64)
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn ids_are_monotonic_strings() {
        let store = MemoryStore::new();
        let a = store.insert(json!({"name": "first"})).await.unwrap();
        let b = store.insert(json!({"name": "second"})).await.unwrap();
        assert_eq!(a, "1");
        assert_eq!(b, "2");
    }

    #[tokio::test]
    async fn insert_stamps_id_into_document() {
        let store = MemoryStore::new();
        let id = store.insert(json!({"name": "widget"})).await.unwrap();
        let doc = store.get(&id).await.unwrap().unwrap();
        assert_eq!(doc["id"], id);
        assert_eq!(doc["name"], "widget");
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let store = MemoryStore::new();
        let id = store
            .insert(json!({"name": "widget", "price": 9.5, "stock": 3}))
            .await
            .unwrap();

        let updated = store
            .update(&id, json!({"price": 12.0}))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated["price"], 12.0);
        assert_eq!(updated["name"], "widget");
        assert_eq!(updated["stock"], 3);
    }

    #[tokio::test]
    async fn update_missing_id_returns_none() {
        let store = MemoryStore::new();
        let result = store.update("999", json!({"price": 1.0})).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn second_delete_reports_nothing_removed() {
        let store = MemoryStore::new();
        let id = store.insert(json!({"name": "gone"})).await.unwrap();
        assert!(store.delete(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            store.insert(json!({"name": name})).await.unwrap();
        }
        let all = store.list().await.unwrap();
        let names: Vec<_> = all.iter().map(|d| d["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn find_by_field_matches_exactly() {
        let store = MemoryStore::new();
        store
            .insert(json!({"email": "a@example.com"}))
            .await
            .unwrap();
        let found = store
            .find_by_field("email", "a@example.com")
            .await
            .unwrap();
        assert!(found.is_some());
        assert!(store
            .find_by_field("email", "b@example.com")
            .await
            .unwrap()
            .is_none());
    }
}
