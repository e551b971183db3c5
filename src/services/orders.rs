//! Order service: creation with a one-time total, and validated
//! status transitions.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::domain::order::{CreateOrder, Order, OrderStatus, UpdateStatus};
use crate::error::ApiError;
use crate::storage::DocumentStore;

#[derive(Clone)]
pub struct OrderState {
    store: Arc<dyn DocumentStore>,
}

/// Build the order service router.
pub fn router(store: Arc<dyn DocumentStore>) -> Router {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/health", get(health))
        .route("/{id}", get(get_order))
        .route("/{id}/status", patch(update_status))
        .with_state(OrderState { store })
}

async fn create_order(
    State(state): State<OrderState>,
    Json(payload): Json<CreateOrder>,
) -> Result<impl IntoResponse, ApiError> {
    let order = payload.validate()?;
    let doc = serde_json::to_value(&order)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let id = state.store.insert(doc).await?;

    tracing::info!(
        order_id = %id,
        user_email = %order.user_email,
        total = order.total,
        "Order created"
    );

    let stored = state
        .store
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound("order"))?;
    Ok((StatusCode::CREATED, Json(super::decode::<Order>(stored)?)))
}

async fn list_orders(State(state): State<OrderState>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

async fn get_order(
    State(state): State<OrderState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let doc = state
        .store
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound("order"))?;
    Ok(Json(super::decode(doc)?))
}

/// Move an order through its lifecycle. The current status is read
/// back from storage so an illegal jump is rejected with the pair of
/// states that made it illegal.
async fn update_status(
    State(state): State<OrderState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatus>,
) -> Result<Json<Value>, ApiError> {
    let requested = payload
        .status
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingFields(vec!["status"]))?;
    let next: OrderStatus = requested.parse()?;

    let doc = state
        .store
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound("order"))?;
    let current: OrderStatus = doc
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or(OrderStatus::Pending.as_str())
        .parse()
        .map_err(|_| ApiError::Internal("stored order carries an unknown status".into()))?;

    if !current.can_transition_to(next) {
        return Err(ApiError::InvalidTransition {
            from: current.to_string(),
            to: next.to_string(),
        });
    }

    let changes = json!({ "status": next, "updated_at": Utc::now() });
    let updated = state
        .store
        .update(&id, changes)
        .await?
        .ok_or(ApiError::NotFound("order"))?;

    tracing::info!(order_id = %id, from = %current, to = %next, "Order status changed");
    Ok(Json(updated))
}

async fn health(State(state): State<OrderState>) -> Result<impl IntoResponse, ApiError> {
    super::health_report(state.store.as_ref(), "order").await
}
