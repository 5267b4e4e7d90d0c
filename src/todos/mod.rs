// Todos module
// Per-user task records, optionally filed under a category

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use handlers::{
    create_todo_handler, delete_todo_handler, get_todo_handler, list_todos_handler,
    update_todo_handler,
};
pub use models::{CreateTodoRequest, Todo, TodoListQuery, TodoResponse, UpdateTodoRequest};
pub use repository::TodoRepository;
pub use service::TodoService;
