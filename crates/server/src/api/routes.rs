use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};

use super::{handlers, search, videos};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let front_dir = state.config().paths.front_dir.clone();

    // API routes
    let api_routes = Router::new()
        // Health, config, status
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/status", get(handlers::get_status))
        // Merged catalog (read-only facade)
        .route("/videos", get(videos::list_videos))
        .route("/videos/search", get(videos::search_videos))
        .route("/videos/{id}", get(videos::get_video))
        .route("/categories", get(videos::get_categories))
        .route("/sources", get(videos::list_sources))
        // Full aggregator pass (destructive of prior cache state)
        .route("/search", post(search::run_search))
        .with_state(state);

    // Serve the front-end with an index.html fallback
    let index_path = front_dir.join("index.html");
    let serve_dir = ServeDir::new(&front_dir).fallback(ServeFile::new(&index_path));

    Router::new()
        .nest("/api/v1", api_routes)
        .fallback_service(serve_dir)
}
