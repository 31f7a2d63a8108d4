pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/upload", post(handlers::handle_upload))
        .route("/api/resumes", get(handlers::handle_list_resumes))
        .route("/api/resumes/:id", get(handlers::handle_get_resume))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
