//! Domain services: one axum `Router` per entity type.
//!
//! # Data Flow
//! ```text
//! startup (per service binary):
//!     config from env → storage::connect() → Arc<dyn DocumentStore>
//!     → services::XXX::router(store) → axum::serve
//!
//! per request:
//!     typed payload extraction → validate() → DocumentStore call
//!     → Json response or ApiError
//! ```
//!
//! # Design Decisions
//! - Services never see the storage backend choice; it is injected
//! - Every service exposes GET /health reporting the live backend

pub mod auth;
pub mod orders;
pub mod products;

use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::storage::DocumentStore;

/// Decode a stored document into its typed entity. A failure here means
/// the collection holds a document this service did not write.
pub(crate) fn decode<T: DeserializeOwned>(doc: Value) -> Result<T, ApiError> {
    serde_json::from_value(doc).map_err(|e| ApiError::Internal(e.to_string()))
}

/// Health report returned by every service.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    /// "mongodb" or "memory".
    pub storage: &'static str,
    pub documents: u64,
}

/// Build the shared health response for a service.
pub async fn health_report(
    store: &dyn DocumentStore,
    service: &'static str,
) -> Result<Json<HealthReport>, ApiError> {
    let documents = store.count().await?;
    Ok(Json(HealthReport {
        status: "ok",
        service,
        storage: store.backend().as_str(),
        documents,
    }))
}
