// Centralized error types and HTTP response conversion for resource
// operations. Every service failure carries a machine-distinguishable kind;
// the HTTP layer's only job is mapping kind to status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, warn};

/// Error type shared by the todo and category services
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request validation failed (400)
    #[error("Request validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Target entity does not exist (404)
    #[error("{resource} with id {id} not found")]
    NotFound { resource: String, id: i32 },

    /// Caller is authenticated but does not own the entity (403)
    #[error("Not authorized to access this resource")]
    NotOwner,

    /// Duplicate resource, e.g. a category name already used by the same
    /// owner (409)
    #[error("{0}")]
    Conflict(String),

    /// The authenticated principal has no backing user record. A stale
    /// token or a bug, not a client error (500).
    #[error("Authenticated user '{0}' has no backing record")]
    PrincipalNotFound(String),

    /// Database operation failed (500)
    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    /// Other internal failures (500)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Consistent JSON error body
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. "NOT_FOUND", "CONFLICT")
    pub error_code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(error_code: &str, message: String, details: Option<serde_json::Value>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message,
            details,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::NotOwner => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PrincipalNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        "VALIDATION_ERROR",
                        "Request validation failed".to_string(),
                        Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({}))),
                    ),
                )
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new(
                        "NOT_FOUND",
                        format!("{} with id {} not found", resource, id),
                        None,
                    ),
                )
            }
            ApiError::NotOwner => {
                warn!("Forbidden access attempt on another user's resource");
                (
                    StatusCode::FORBIDDEN,
                    ErrorResponse::new(
                        "FORBIDDEN",
                        "Not authorized to access this resource".to_string(),
                        None,
                    ),
                )
            }
            ApiError::Conflict(message) => {
                debug!("Conflict: {}", message);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new("CONFLICT", message.clone(), None),
                )
            }
            ApiError::PrincipalNotFound(username) => {
                // stale token or data inconsistency; full detail stays in logs
                error!("Authenticated principal '{}' has no backing user record", username);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "INTERNAL_ERROR",
                        "An internal server error occurred".to_string(),
                        None,
                    ),
                )
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {:?}", db_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "DATABASE_ERROR",
                        "A database error occurred".to_string(),
                        None,
                    ),
                )
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "INTERNAL_ERROR",
                        "An internal server error occurred".to_string(),
                        None,
                    ),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}
