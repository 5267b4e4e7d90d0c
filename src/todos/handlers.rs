// HTTP handlers for todo endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::auth::middleware::AuthenticatedUser;
use crate::error::ApiError;
use crate::todos::models::{CreateTodoRequest, TodoListQuery, TodoResponse, UpdateTodoRequest};
use crate::AppState;

/// List the caller's todos
#[utoipa::path(
    get,
    path = "/api/todos",
    params(TodoListQuery),
    responses(
        (status = 200, description = "Todos owned by the caller", body = [TodoResponse]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn list_todos_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<TodoListQuery>,
) -> Result<Json<Vec<TodoResponse>>, ApiError> {
    let todos = state.todo_service.list_todos(&user.username, query).await?;
    Ok(Json(todos))
}

/// Fetch one of the caller's todos
#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    params(("id" = i32, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "The todo", body = TodoResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Todo belongs to another user"),
        (status = 404, description = "Todo not found")
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn get_todo_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(todo_id): Path<i32>,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo = state.todo_service.get_todo(&user.username, todo_id).await?;
    Ok(Json(todo))
}

/// Create a todo
#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 200, description = "Todo created", body = TodoResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Referenced category belongs to another user"),
        (status = 404, description = "Referenced category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn create_todo_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateTodoRequest>,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo = state
        .todo_service
        .create_todo(&user.username, request)
        .await?;
    Ok(Json(todo))
}

/// Overwrite a todo
#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    params(("id" = i32, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = TodoResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Todo or referenced category belongs to another user"),
        (status = 404, description = "Todo or referenced category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn update_todo_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(todo_id): Path<i32>,
    Json(request): Json<UpdateTodoRequest>,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo = state
        .todo_service
        .update_todo(&user.username, todo_id, request)
        .await?;
    Ok(Json(todo))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(("id" = i32, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Todo belongs to another user"),
        (status = 404, description = "Todo not found")
    ),
    security(("bearer_auth" = [])),
    tag = "todos"
)]
pub async fn delete_todo_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(todo_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state
        .todo_service
        .delete_todo(&user.username, todo_id)
        .await?;
    Ok(StatusCode::OK)
}
