// HTTP handlers for authentication endpoints

use crate::auth::{
    error::AuthError,
    models::{AuthResponse, LoginRequest, RegisterRequest},
};
use crate::AppState;
use axum::{extract::State, Json};

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = AuthResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Username or email already exists")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth_service.register(request).await?;
    Ok(Json(response))
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth_service.login(request).await?;
    Ok(Json(response))
}
