//! Custom error types for the profiles service

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;

/// Validation messages keyed by the offending field
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Custom error type for profile operations
#[derive(Error, Debug)]
pub enum ProfileError {
    /// One or more fields failed validation
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Email or username already taken. Holds the field name.
    #[error("A profile with this {0} already exists")]
    Uniqueness(String),

    /// Malformed request body
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Profile does not exist
    #[error("Not found")]
    NotFound,

    /// Password could not be hashed
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(DatabaseError),
}

impl ProfileError {
    /// Single-field validation failure
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ProfileError::Validation(FieldErrors::from([(
            field.to_string(),
            vec![message.into()],
        )]))
    }
}

impl From<DatabaseError> for ProfileError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation(field) => ProfileError::Uniqueness(field),
            other => ProfileError::Database(other),
        }
    }
}

impl From<FieldErrors> for ProfileError {
    fn from(errors: FieldErrors) -> Self {
        ProfileError::Validation(errors)
    }
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ProfileError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Validation failed", "fields": fields }),
            ),
            ProfileError::Uniqueness(field) => {
                let message = format!("User profile with this {} already exists.", field);
                let fields = FieldErrors::from([(field, vec![message])]);
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "Validation failed", "fields": fields }),
                )
            }
            ProfileError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ProfileError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "Not found" })),
            ProfileError::PasswordHash(e) => {
                tracing::error!("Password hashing failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
            ProfileError::Database(e) => {
                tracing::error!("Database failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for profile results
pub type ProfileResult<T> = Result<T, ProfileError>;
