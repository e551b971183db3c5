//! API error taxonomy shared by the domain services.
//!
//! # Responsibilities
//! - Map every failure to one HTTP status plus a machine-readable kind
//! - Keep internal detail out of responses (logged, not returned)
//!
//! # Design Decisions
//! - Clients discriminate on the `error` kind tag, never on message text
//! - Every handler returns `Result<_, ApiError>`; there is no global
//!   catch-all layer

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::storage::StorageError;

/// Error type carried by every domain-service handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Required fields absent from the request payload.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A supplied field failed validation.
    #[error("invalid field {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// Registration against an email that already exists.
    #[error("email is already registered")]
    DuplicateEmail,

    /// Login with an unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The addressed entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Unknown order status value.
    #[error("unknown order status: {0}")]
    InvalidStatus(String),

    /// Status value is known but the transition is not allowed.
    #[error("cannot transition order from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Storage backend failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Anything else that should surface as a 500.
    #[error("internal error")]
    Internal(String),
}

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable kind tag for programmatic discrimination.
    pub error: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl ApiError {
    /// Stable kind tag carried alongside the HTTP status.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MissingFields(_) => "missing_fields",
            ApiError::InvalidField { .. } => "invalid_field",
            ApiError::DuplicateEmail => "duplicate_email",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::NotFound(_) => "not_found",
            ApiError::InvalidStatus(_) => "invalid_status",
            ApiError::InvalidTransition { .. } => "invalid_transition",
            ApiError::Storage(_) => "storage",
            ApiError::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields(_)
            | ApiError::InvalidField { .. }
            | ApiError::InvalidStatus(_)
            | ApiError::InvalidTransition { .. }
            | ApiError::DuplicateEmail => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Internal detail stays in the logs.
        let message = match &self {
            ApiError::Storage(e) => {
                tracing::error!(error = %e, "Storage failure");
                "internal storage error".to_string()
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal error");
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: self.kind(),
            message,
        };
        (self.status(), Json(body)).into_response()
    }
}
