//! Product service: CRUD over the product collection.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::domain::product::{CreateProduct, Product, UpdateProduct};
use crate::error::ApiError;
use crate::storage::DocumentStore;

#[derive(Clone)]
pub struct ProductState {
    store: Arc<dyn DocumentStore>,
}

/// Build the product service router.
pub fn router(store: Arc<dyn DocumentStore>) -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/health", get(health))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(ProductState { store })
}

async fn create_product(
    State(state): State<ProductState>,
    Json(payload): Json<CreateProduct>,
) -> Result<impl IntoResponse, ApiError> {
    let product = payload.validate()?;
    let doc = serde_json::to_value(&product)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let id = state.store.insert(doc).await?;

    tracing::info!(product_id = %id, name = %product.name, "Product created");

    let stored = state
        .store
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;
    Ok((StatusCode::CREATED, Json(super::decode::<Product>(stored)?)))
}

/// All products, no pagination.
async fn list_products(
    State(state): State<ProductState>,
) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

async fn get_product(
    State(state): State<ProductState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let doc = state
        .store
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;
    Ok(Json(super::decode(doc)?))
}

async fn update_product(
    State(state): State<ProductState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProduct>,
) -> Result<Json<Value>, ApiError> {
    let changes = payload.into_changes()?;
    let updated = state
        .store
        .update(&id, changes)
        .await?
        .ok_or(ApiError::NotFound("product"))?;

    tracing::info!(product_id = %id, "Product updated");
    Ok(Json(updated))
}

/// Delete is not idempotent: a second delete of the same id is a 404.
async fn delete_product(
    State(state): State<ProductState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete(&id).await? {
        return Err(ApiError::NotFound("product"));
    }
    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn health(
    State(state): State<ProductState>,
) -> Result<impl IntoResponse, ApiError> {
    super::health_report(state.store.as_ref(), "product").await
}
