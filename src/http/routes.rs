use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Probes and client bootstrap
        .route("/health", get(handlers::health_check))
        .route("/config", get(handlers::get_client_config))
        // Recording CRUD
        .route(
            "/recordings",
            get(handlers::list_recordings).post(handlers::create_recording),
        )
        .route(
            "/recordings/:id",
            get(handlers::get_recording)
                .put(handlers::update_transcript)
                .delete(handlers::delete_recording),
        )
        // Audio streaming and summaries
        .route("/recordings/:id/audio", get(handlers::get_audio))
        .route("/recordings/:id/summary", get(handlers::get_summary))
        // Unknown routes answer a JSON 404
        .fallback(handlers::not_found)
        // Request logging + permissive CORS for the browser client
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
