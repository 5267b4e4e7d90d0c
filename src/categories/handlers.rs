// HTTP handlers for category endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::middleware::AuthenticatedUser;
use crate::categories::models::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::error::ApiError;
use crate::AppState;

/// List the caller's categories
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories owned by the caller", body = [Category]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn list_categories_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.category_service.list_categories(&user.username).await?;
    Ok(Json(categories))
}

/// Fetch one of the caller's categories
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "The category", body = Category),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Category belongs to another user"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn get_category_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(category_id): Path<i32>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .category_service
        .get_category(&user.username, category_id)
        .await?;
    Ok(Json(category))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = Category),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Category name already used by the caller")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn create_category_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .category_service
        .create_category(&user.username, request)
        .await?;
    Ok(Json(category))
}

/// Overwrite a category
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Category belongs to another user"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category name already used by the caller")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn update_category_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(category_id): Path<i32>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let category = state
        .category_service
        .update_category(&user.username, category_id, request)
        .await?;
    Ok(Json(category))
}

/// Delete a category, detaching its todos
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted, its todos detached"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Category belongs to another user"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "categories"
)]
pub async fn delete_category_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(category_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .category_service
        .delete_category(&user.username, category_id)
        .await?;
    Ok(StatusCode::OK)
}
