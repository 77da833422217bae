//! Plainwiki - a minimal file-backed wiki
//!
//! Pages live as `<title>.txt` files and are served through two HTML
//! templates: `view.html` to read a page and `edit.html` to change it.

pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod services;
pub mod types;
pub mod utils;

use axum::{
    routing::{get, post},
    Router,
};

// Re-export commonly used items
pub use components::TemplateSet;
pub use config::{Config, TitleMode};
pub use errors::WikiError;
pub use services::{PageStore, TitleValidator};
pub use types::{AppState, Page};

/// Routes for the view, edit and save handlers
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_root))
        .route("/view/*title", get(handlers::handle_view))
        .route("/edit/*title", get(handlers::handle_edit))
        .route("/save/*title", post(handlers::handle_save))
        .with_state(state)
}
