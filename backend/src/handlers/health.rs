//! Service health endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use shared::scoring::ALGORITHM_VERSION;

use crate::error::AppResult;
use crate::AppState;

/// Health report with component status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub services: ServiceStatus,
}

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub scoring_engine: &'static str,
    pub summarizer: &'static str,
    pub elevation_provider: &'static str,
    pub database: &'static str,
}

/// Health check for orchestrator probes and dashboards.
pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    let database = if state.db.is_closed() {
        "disconnected"
    } else {
        "connected"
    };

    Ok(Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        services: ServiceStatus {
            scoring_engine: ALGORITHM_VERSION,
            summarizer: if state.summarizer.is_configured() {
                "configured"
            } else {
                "template"
            },
            elevation_provider: if state.config.providers.elevation_api_key.is_empty() {
                "secondary"
            } else {
                "primary"
            },
            database,
        },
    }))
}
