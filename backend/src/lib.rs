//! Solar Placement Scoring platform backend
//!
//! Evaluates geographic points for photovoltaic suitability: concurrent
//! climate and terrain acquisition, the multi-factor scoring engine, an
//! adaptive regional calibrator warmed from persisted history, a
//! capacity-first financial projection and an AI summary with a
//! deterministic fallback.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use external::{ElevationClient, SolarClient, SummarizerClient, WeatherClient};
use services::{AcquisitionService, AnalysisPipeline, HistoryStore, RegionalCalibrator};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub calibrator: Arc<RegionalCalibrator>,
    pub acquisition: AcquisitionService,
    pub summarizer: SummarizerClient,
}

impl AppState {
    /// Wire the provider clients and shared services from configuration.
    pub fn new(db: sqlx::PgPool, config: Config, calibrator: Arc<RegionalCalibrator>) -> Self {
        let providers = &config.providers;
        let acquisition = AcquisitionService::new(
            SolarClient::new(providers.solar_base_url.clone()),
            WeatherClient::new(providers.weather_base_url.clone()),
            ElevationClient::new(
                providers.elevation_base_url.clone(),
                providers.elevation_api_key.clone(),
                providers.elevation_fallback_url.clone(),
            ),
            Duration::from_secs(providers.timeout_secs),
        );
        let summarizer = SummarizerClient::new(
            config.summarizer.base_url.clone(),
            config.summarizer.api_key.clone(),
        );

        Self {
            db,
            config: Arc::new(config),
            calibrator,
            acquisition,
            summarizer,
        }
    }

    /// Per-request pipeline over the shared state.
    pub fn pipeline(&self) -> AnalysisPipeline {
        AnalysisPipeline::new(
            self.acquisition.clone(),
            self.summarizer.clone(),
            self.calibrator.clone(),
            HistoryStore::new(self.db.clone()),
            Duration::from_secs(self.config.summarizer.deadline_secs),
        )
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(liveness))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Solar Placement Scoring Platform API v1.0"
}

/// Liveness endpoint for load balancer probes
async fn liveness() -> &'static str {
    "OK"
}
