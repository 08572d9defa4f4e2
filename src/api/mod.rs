use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::search::SearchService;

pub mod handlers;
pub mod models;

pub fn create_router(search_service: Arc<SearchService>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health_handler))
        .route("/api/search", get(handlers::search_handler))
        .with_state(search_service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
