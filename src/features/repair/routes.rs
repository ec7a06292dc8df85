use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::repair::handlers::save_report;
use crate::features::repair::services::SaveService;

/// Create routes for the repair feature
pub fn routes(save_service: Arc<SaveService>, max_body_size: usize) -> Router {
    Router::new()
        .route(
            "/api/repair/save",
            // Allow body size up to the configured limit + buffer for multipart overhead
            post(save_report).layer(DefaultBodyLimit::max(max_body_size + 1024 * 1024)),
        )
        .with_state(save_service)
}
