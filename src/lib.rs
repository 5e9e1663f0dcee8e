pub mod api;
pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod pagination;
pub mod relations;
pub mod schema;
pub mod shopping_list;
pub mod validation;

use std::sync::Arc;

/// Application state shared across all handlers
pub type AppState = Arc<db::DbPool>;
