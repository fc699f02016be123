//! Local web form for collecting student ID photos.
//!
//! Serves an upload form, crops the uploaded photo around the dominant face
//! with [`studentphoto`] and hands the result back as a download named after
//! the student.

pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod pages;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, WebConfig};
pub use error::{WebError, WebResult};
pub use state::AppState;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/process", post(handlers::process_form))
        .route("/api/crop", post(handlers::api_crop))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
