//! Route definitions for the Solar Placement Scoring platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health and service status
        .route("/health", get(handlers::health_check))
        // Full analysis pipeline
        .route("/analyze", post(handlers::analyze))
        // Financial engine
        .nest("/roi", roi_routes())
        // AI summary
        .route("/summary", post(handlers::generate_summary))
        // Persisted history
        .route("/analyses/recent", get(handlers::recent_analyses))
}

/// Financial calculation routes
fn roi_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::calculate_roi))
        .route("/sensitivity", post(handlers::tariff_sensitivity))
}
