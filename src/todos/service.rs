use crate::auth::{User, UserRepository};
use crate::categories::{Category, CategoryRepository};
use crate::error::ApiError;
use crate::todos::{
    CreateTodoRequest, Todo, TodoListQuery, TodoRepository, TodoResponse, UpdateTodoRequest,
};
use validator::Validate;

/// Service layer for todo business logic
#[derive(Clone)]
pub struct TodoService {
    repository: TodoRepository,
    category_repository: CategoryRepository,
    user_repository: UserRepository,
}

impl TodoService {
    /// Create a new TodoService
    pub fn new(
        repository: TodoRepository,
        category_repository: CategoryRepository,
        user_repository: UserRepository,
    ) -> Self {
        Self {
            repository,
            category_repository,
            user_repository,
        }
    }

    /// Resolve the authenticated username to its user record. A missing
    /// record here is a consistency failure, not a client error.
    async fn resolve_principal(&self, username: &str) -> Result<User, ApiError> {
        self.user_repository
            .find_by_username(username)
            .await
            .map_err(|e| ApiError::InternalError(e.to_string()))?
            .ok_or_else(|| ApiError::PrincipalNotFound(username.to_string()))
    }

    /// Resolve a client-supplied category reference and require that the
    /// caller owns it.
    async fn resolve_owned_category(
        &self,
        user_id: i32,
        category_id: i32,
    ) -> Result<Category, ApiError> {
        let category = self
            .category_repository
            .find_by_id(category_id)
            .await?
            .ok_or(ApiError::NotFound {
                resource: "Category".to_string(),
                id: category_id,
            })?;

        if category.user_id != user_id {
            return Err(ApiError::NotOwner);
        }

        Ok(category)
    }

    /// Attach the full category object, when the todo has one
    async fn attach_category(&self, todo: Todo) -> Result<TodoResponse, ApiError> {
        let category = match todo.category_id {
            Some(category_id) => self.category_repository.find_by_id(category_id).await?,
            None => None,
        };
        Ok(TodoResponse::from_parts(todo, category))
    }

    /// List the caller's todos, optionally filtered to one category or to
    /// todos with no category. category_id wins when both filters appear.
    pub async fn list_todos(
        &self,
        username: &str,
        query: TodoListQuery,
    ) -> Result<Vec<TodoResponse>, ApiError> {
        let user = self.resolve_principal(username).await?;

        let todos = match (query.category_id, query.uncategorized) {
            (Some(category_id), _) => {
                self.repository
                    .find_by_user_and_category(user.id, category_id)
                    .await?
            }
            (None, Some(true)) => self.repository.find_uncategorized(user.id).await?,
            _ => self.repository.find_by_user(user.id).await?,
        };

        let mut responses = Vec::with_capacity(todos.len());
        for todo in todos {
            responses.push(self.attach_category(todo).await?);
        }

        Ok(responses)
    }

    /// Fetch a single todo the caller owns
    pub async fn get_todo(&self, username: &str, todo_id: i32) -> Result<TodoResponse, ApiError> {
        let user = self.resolve_principal(username).await?;

        let todo = self
            .repository
            .find_by_id(todo_id)
            .await?
            .ok_or(ApiError::NotFound {
                resource: "Todo".to_string(),
                id: todo_id,
            })?;

        if todo.user_id != user.id {
            return Err(ApiError::NotOwner);
        }

        self.attach_category(todo).await
    }

    /// Create a new todo owned by the caller
    ///
    /// This method:
    /// 1. Validates the request
    /// 2. Resolves the caller to a user record
    /// 3. Resolves and authorizes the category reference, when supplied
    /// 4. Creates the todo with the owner forced to the caller
    pub async fn create_todo(
        &self,
        username: &str,
        request: CreateTodoRequest,
    ) -> Result<TodoResponse, ApiError> {
        request.validate()?;

        let user = self.resolve_principal(username).await?;

        let category = match request.category_id {
            Some(category_id) => Some(self.resolve_owned_category(user.id, category_id).await?),
            None => None,
        };

        let todo = self
            .repository
            .create(
                user.id,
                &request.title,
                request.description,
                category.as_ref().map(|c| c.id),
            )
            .await?;

        tracing::info!(todo_id = todo.id, user_id = user.id, "Todo created");

        Ok(TodoResponse::from_parts(todo, category))
    }

    /// Overwrite a todo the caller owns
    ///
    /// This method:
    /// 1. Validates the request
    /// 2. Fetches the existing todo
    /// 3. Verifies the caller owns it
    /// 4. Re-resolves and re-authorizes the category reference, when
    ///    supplied; an absent reference detaches the todo
    /// 5. Applies the overwrite
    pub async fn update_todo(
        &self,
        username: &str,
        todo_id: i32,
        request: UpdateTodoRequest,
    ) -> Result<TodoResponse, ApiError> {
        request.validate()?;

        let user = self.resolve_principal(username).await?;

        let existing = self
            .repository
            .find_by_id(todo_id)
            .await?
            .ok_or(ApiError::NotFound {
                resource: "Todo".to_string(),
                id: todo_id,
            })?;

        if existing.user_id != user.id {
            return Err(ApiError::NotOwner);
        }

        let category = match request.category_id {
            Some(category_id) => Some(self.resolve_owned_category(user.id, category_id).await?),
            None => None,
        };

        let todo = self
            .repository
            .update(
                todo_id,
                &request.title,
                request.description,
                request.completed,
                category.as_ref().map(|c| c.id),
            )
            .await?;

        Ok(TodoResponse::from_parts(todo, category))
    }

    /// Delete a todo the caller owns
    pub async fn delete_todo(&self, username: &str, todo_id: i32) -> Result<(), ApiError> {
        let user = self.resolve_principal(username).await?;

        let existing = self
            .repository
            .find_by_id(todo_id)
            .await?
            .ok_or(ApiError::NotFound {
                resource: "Todo".to_string(),
                id: todo_id,
            })?;

        if existing.user_id != user.id {
            return Err(ApiError::NotOwner);
        }

        self.repository.delete(todo_id).await?;

        tracing::info!(todo_id, user_id = user.id, "Todo deleted");

        Ok(())
    }
}
