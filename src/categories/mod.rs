// Categories module
// Per-user named groupings that todos can be filed under

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use handlers::{
    create_category_handler, delete_category_handler, get_category_handler,
    list_categories_handler, update_category_handler,
};
pub use models::{Category, CreateCategoryRequest, UpdateCategoryRequest};
pub use repository::CategoryRepository;
pub use service::CategoryService;
