//! Auth service: registration, login, token issuance.
//!
//! # Design Decisions
//! - Passwords stored only as bcrypt hashes (DEFAULT_COST)
//! - Unknown email and wrong password both answer 401
//!   `invalid_credentials` so the two are indistinguishable to a caller
//! - Tokens are HS256 JWTs carrying the user id and email, 1 hour by
//!   default; no refresh, no revocation

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use crate::domain::user::{Claims, LoginRequest, LoginResponse, RegisterRequest, StoredUser};
use crate::error::ApiError;
use crate::storage::DocumentStore;

#[derive(Clone)]
pub struct AuthState {
    store: Arc<dyn DocumentStore>,
    jwt_secret: Arc<str>,
    token_ttl_secs: u64,
}

/// Build the auth service router.
pub fn router(store: Arc<dyn DocumentStore>, jwt_secret: &str, token_ttl_secs: u64) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/health", get(health))
        .with_state(AuthState {
            store,
            jwt_secret: Arc::from(jwt_secret),
            token_ttl_secs,
        })
}

async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (email, password) = payload.validate()?;

    if state.store.find_by_field("email", &email).await?.is_some() {
        return Err(ApiError::DuplicateEmail);
    }

    let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let doc = json!({
        "email": email,
        "password_hash": password_hash,
        "created_at": Utc::now(),
    });
    let id = state.store.insert(doc).await?;

    tracing::info!(user_id = %id, "User registered");
    Ok((StatusCode::CREATED, Json(json!({ "id": id, "email": email }))))
}

async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (email, password) = payload.validate()?;

    let doc = state
        .store
        .find_by_field("email", &email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;
    let user: StoredUser =
        serde_json::from_value(doc).map_err(|e| ApiError::Internal(e.to_string()))?;

    let verified = bcrypt::verify(&password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !verified {
        tracing::debug!(user_id = %user.id, "Password verification failed");
        return Err(ApiError::InvalidCredentials);
    }

    let token = issue_token(&user, &state.jwt_secret, state.token_ttl_secs)?;
    tracing::info!(user_id = %user.id, "Login succeeded");
    Ok(Json(LoginResponse {
        token,
        email: user.email,
    }))
}

fn issue_token(user: &StoredUser, secret: &str, ttl_secs: u64) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs as i64)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.to_string()))
}

async fn health(State(state): State<AuthState>) -> Result<impl IntoResponse, ApiError> {
    super::health_report(state.store.as_ref(), "auth").await
}
