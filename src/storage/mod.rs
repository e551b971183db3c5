//! Document storage subsystem.
//!
//! # Data Flow
//! ```text
//! Service startup:
//!     StorageConfig (env)
//!         → connect() attempts MongoDB with a short ping timeout
//!         → success: MongoStore   failure/unconfigured: MemoryStore
//!         → Arc<dyn DocumentStore> injected into every handler
//! ```
//!
//! # Design Decisions
//! - Backend is resolved exactly once at startup and injected; handlers
//!   never consult a global connection flag
//! - Both backends expose identical CRUD semantics; only id shape and
//!   durability differ (Mongo ObjectId hex vs. counter strings)
//! - Update is a partial merge: only supplied top-level fields overwrite

pub mod memory;
pub mod mongo;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::StorageConfig;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// How long the startup ping may take before falling back to memory.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("document encoding error: {0}")]
    Encoding(#[from] mongodb::bson::ser::Error),

    #[error("stored document is not a JSON object")]
    MalformedDocument,
}

/// Which backend a store resolved to at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Mongo,
    Memory,
}

impl BackendKind {
    /// Stable name reported by health endpoints.
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Mongo => "mongodb",
            BackendKind::Memory => "memory",
        }
    }
}

/// Uniform CRUD over one document collection.
///
/// Documents are JSON objects. The store owns id generation: `insert`
/// returns the new id, and every document read back carries it in an
/// `id` field.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new document, returning its generated id.
    async fn insert(&self, doc: Value) -> Result<String, StorageError>;

    /// Fetch one document by id. `None` if absent or the id is malformed.
    async fn get(&self, id: &str) -> Result<Option<Value>, StorageError>;

    /// All documents in insertion order. No pagination.
    async fn list(&self) -> Result<Vec<Value>, StorageError>;

    /// Merge the supplied top-level fields into an existing document.
    /// Returns the updated document, or `None` if the id is absent.
    async fn update(&self, id: &str, changes: Value) -> Result<Option<Value>, StorageError>;

    /// Remove one document. Returns whether anything was deleted.
    async fn delete(&self, id: &str) -> Result<bool, StorageError>;

    /// Find the first document whose `field` equals `value` exactly.
    async fn find_by_field(&self, field: &str, value: &str)
        -> Result<Option<Value>, StorageError>;

    /// Total number of documents.
    async fn count(&self) -> Result<u64, StorageError>;

    /// Which backend this store runs on.
    fn backend(&self) -> BackendKind;
}

/// Resolve the storage backend for one service.
///
/// Tries MongoDB when a connection string is configured and the server
/// answers a ping within [`CONNECT_TIMEOUT`]; otherwise hands back the
/// process-local in-memory store. The decision is final for the process
/// lifetime.
pub async fn connect(config: &StorageConfig, collection: &str) -> Arc<dyn DocumentStore> {
    let Some(uri) = &config.database_url else {
        tracing::warn!(
            collection = %collection,
            "DATABASE_URL not set, using in-memory storage (non-persistent)"
        );
        return Arc::new(MemoryStore::new());
    };

    match tokio::time::timeout(
        CONNECT_TIMEOUT,
        MongoStore::connect(uri, &config.database_name, collection),
    )
    .await
    {
        Ok(Ok(store)) => {
            tracing::info!(
                database = %config.database_name,
                collection = %collection,
                "Connected to MongoDB"
            );
            Arc::new(store)
        }
        Ok(Err(e)) => {
            tracing::warn!(
                error = %e,
                collection = %collection,
                "MongoDB unreachable, falling back to in-memory storage"
            );
            Arc::new(MemoryStore::new())
        }
        Err(_) => {
            tracing::warn!(
                collection = %collection,
                timeout_secs = CONNECT_TIMEOUT.as_secs(),
                "MongoDB ping timed out, falling back to in-memory storage"
            );
            Arc::new(MemoryStore::new())
        }
    }
}
