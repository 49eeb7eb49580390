//! Custom error types for the orders service

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

/// Custom error type for the orders service
#[derive(Error, Debug)]
pub enum ApiError {
    /// One or more fields failed validation
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Malformed request body
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Referenced record does not exist
    #[error("Not found")]
    NotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Validation failed", "fields": fields }),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "Not found" })),
            ApiError::Database(DatabaseError::UniqueViolation(field)) => {
                let fields = FieldErrors::from([(
                    field,
                    vec!["A record with this value already exists.".to_string()],
                )]);
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "Validation failed", "fields": fields }),
                )
            }
            ApiError::Database(e) => {
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

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
