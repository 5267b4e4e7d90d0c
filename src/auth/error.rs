// Authentication error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    ValidationError(String),
    InvalidCredentials,
    /// No token was supplied where one was expected
    EmptyToken,
    /// Token text could not be parsed as a JWT
    MalformedToken,
    /// Token parsed but its signature does not match the configured secret
    InvalidSignature,
    ExpiredToken,
    MissingToken,
    /// Token parsed and verified but its subject no longer resolves to a
    /// stored user, or no longer validates against the resolved record
    UnresolvedIdentity,
    UsernameTaken,
    EmailTaken,
    UserNotFound,
    DatabaseError(String),
    PasswordHashError,
    TokenGenerationError(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
            AuthError::EmptyToken => write!(f, "Empty token"),
            AuthError::MalformedToken => write!(f, "Malformed token"),
            AuthError::InvalidSignature => write!(f, "Invalid token signature"),
            AuthError::ExpiredToken => write!(f, "Token has expired"),
            AuthError::MissingToken => write!(f, "Missing authentication token"),
            AuthError::UnresolvedIdentity => write!(f, "Invalid authentication token"),
            AuthError::UsernameTaken => write!(f, "Username already exists"),
            AuthError::EmailTaken => write!(f, "Email already exists"),
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AuthError::PasswordHashError => write!(f, "Password hashing error"),
            AuthError::TokenGenerationError(msg) => write!(f, "Token generation error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl AuthError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::EmptyToken => StatusCode::UNAUTHORIZED,
            AuthError::MalformedToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidSignature => StatusCode::UNAUTHORIZED,
            AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::UnresolvedIdentity => StatusCode::UNAUTHORIZED,
            AuthError::UsernameTaken => StatusCode::CONFLICT,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::PasswordHashError => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to send to clients. Credential failures stay uniform so
    /// a caller cannot learn whether a username exists.
    pub fn error_message(&self) -> String {
        match self {
            AuthError::ValidationError(msg) => msg.clone(),
            AuthError::InvalidCredentials => "Invalid username or password".to_string(),
            AuthError::EmptyToken => "Empty token".to_string(),
            AuthError::MalformedToken => "Malformed token".to_string(),
            AuthError::InvalidSignature => "Invalid token signature".to_string(),
            AuthError::ExpiredToken => "Token has expired".to_string(),
            AuthError::MissingToken => "Missing authentication token".to_string(),
            AuthError::UnresolvedIdentity => "Invalid authentication token".to_string(),
            AuthError::UsernameTaken => "Username already exists".to_string(),
            AuthError::EmailTaken => "Email already exists".to_string(),
            AuthError::UserNotFound => "User not found".to_string(),
            AuthError::DatabaseError(_) => "Internal server error".to_string(),
            AuthError::PasswordHashError => "Internal server error".to_string(),
            AuthError::TokenGenerationError(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::EmptyToken
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::ExpiredToken
            | AuthError::MissingToken
            | AuthError::UnresolvedIdentity => {
                warn!("Rejected token: {}", self);
            }
            AuthError::DatabaseError(msg) => {
                error!("Database error in auth: {}", msg);
            }
            AuthError::PasswordHashError => {
                error!("Password hashing error");
            }
            AuthError::TokenGenerationError(msg) => {
                error!("Token generation error: {}", msg);
            }
            _ => {}
        }

        let body = Json(json!({
            "error": self.error_message(),
        }));

        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_map_to_unauthorized() {
        assert_eq!(AuthError::EmptyToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::MalformedToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidSignature.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::ExpiredToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::MissingToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_conflicts_map_to_conflict_and_name_the_field() {
        assert_eq!(AuthError::UsernameTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert!(AuthError::UsernameTaken.error_message().contains("Username"));
        assert!(AuthError::EmailTaken.error_message().contains("Email"));
    }

    #[test]
    fn test_invalid_credentials_message_is_uniform() {
        // same message whether the username exists or the password was wrong
        assert_eq!(
            AuthError::InvalidCredentials.error_message(),
            "Invalid username or password"
        );
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = AuthError::DatabaseError("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_message(), "Internal server error");
    }
}
