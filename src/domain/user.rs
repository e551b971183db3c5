//! User entity and auth wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl RegisterRequest {
    /// Check required fields, returning (email, password).
    pub fn validate(self) -> Result<(String, String), ApiError> {
        let mut missing = Vec::new();
        if self.email.as_deref().unwrap_or("").is_empty() {
            missing.push("email");
        }
        if self.password.as_deref().unwrap_or("").is_empty() {
            missing.push("password");
        }
        if !missing.is_empty() {
            return Err(ApiError::MissingFields(missing));
        }
        // Both checked non-empty above.
        Ok((self.email.unwrap_or_default(), self.password.unwrap_or_default()))
    }
}

/// Login payload. Same required fields as registration.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(self) -> Result<(String, String), ApiError> {
        RegisterRequest {
            email: self.email,
            password: self.password,
        }
        .validate()
    }
}

/// Successful login response.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
}

/// JWT claims: user id, email, and the standard expiry pair.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// A user document as read back from storage.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_reports_missing_fields_by_name() {
        let payload = RegisterRequest {
            email: None,
            password: Some("hunter2".into()),
        };
        let err = payload.validate().unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: email");
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let payload = RegisterRequest {
            email: Some(String::new()),
            password: None,
        };
        let err = payload.validate().unwrap_err();
        assert_eq!(err.kind(), "missing_fields");
        assert_eq!(err.to_string(), "missing required fields: email, password");
    }

    #[test]
    fn valid_payload_passes_through() {
        let payload = RegisterRequest {
            email: Some("a@example.com".into()),
            password: Some("hunter2".into()),
        };
        let (email, password) = payload.validate().unwrap();
        assert_eq!(email, "a@example.com");
        assert_eq!(password, "hunter2");
    }
}
