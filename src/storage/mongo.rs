//! MongoDB-backed store.
//!
//! # Responsibilities
//! - CRUD against one collection
//! - Translate between JSON documents and BSON
//! - Map `_id` ObjectIds to the `id` hex string the services expose
//!
//! # Design Decisions
//! - A malformed ObjectId in a path parameter is indistinguishable from
//!   a missing document: reads return `None`, deletes return false
//! - `update` uses `$set` so only supplied top-level fields overwrite

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::{Client, Collection};
use serde_json::Value;

use async_trait::async_trait;

use super::{BackendKind, DocumentStore, StorageError};

/// Store backed by a single MongoDB collection.
pub struct MongoStore {
    collection: Collection<Document>,
}

impl MongoStore {
    /// Connect and verify the server answers a ping.
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
    ) -> Result<Self, StorageError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }).await?;
        Ok(Self {
            collection: db.collection(collection),
        })
    }

    fn to_bson_document(value: &Value) -> Result<Document, StorageError> {
        Ok(mongodb::bson::to_document(value)?)
    }

    /// Convert a stored BSON document into the JSON shape handlers see:
    /// `_id` is replaced by an `id` hex string.
    fn to_json(mut doc: Document) -> Value {
        let id = match doc.remove("_id") {
            Some(Bson::ObjectId(oid)) => Some(oid.to_hex()),
            Some(other) => Some(other.to_string()),
            None => None,
        };
        let mut value = Bson::Document(doc).into_relaxed_extjson();
        if let (Some(id), Some(obj)) = (id, value.as_object_mut()) {
            obj.insert("id".into(), Value::String(id));
        }
        value
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert(&self, doc: Value) -> Result<String, StorageError> {
        let bson_doc = Self::to_bson_document(&doc)?;
        let result = self.collection.insert_one(bson_doc).await?;
        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Value>, StorageError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let found = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(found.map(Self::to_json))
    }

    async fn list(&self) -> Result<Vec<Value>, StorageError> {
        let cursor = self.collection.find(doc! {}).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Self::to_json).collect())
    }

    async fn update(&self, id: &str, changes: Value) -> Result<Option<Value>, StorageError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let set = Self::to_bson_document(&changes)?;
        let result = self
            .collection
            .update_one(doc! { "_id": oid }, doc! { "$set": set })
            .await?;
        if result.matched_count == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(false);
        };
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn find_by_field(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Option<Value>, StorageError> {
        let mut filter = Document::new();
        filter.insert(field, value);
        let found = self.collection.find_one(filter).await?;
        Ok(found.map(Self::to_json))
    }

    async fn count(&self) -> Result<u64, StorageError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Mongo
    }
}
