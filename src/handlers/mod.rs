pub mod convert;
pub mod frontend;
pub mod health;

pub use convert::*;
pub use frontend::*;
pub use health::*;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::middleware::logging_middleware;
use crate::services::PdfConverter;

/// Per-router state shared by the handlers. Read-only.
#[derive(Debug, Clone)]
pub struct AppState {
    pub converter: PdfConverter,
    pub max_upload_size_mb: usize,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            converter: PdfConverter::new(),
            max_upload_size_mb: config.max_upload_size_mb,
        }
    }
}

/// Builds the application router with all routes and layers.
pub fn create_router(config: &Config) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/convert-to-pdf", post(convert_handler))
        .with_state(AppState::new(config))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
                .layer(axum::middleware::from_fn(logging_middleware)),
        )
}
