//! Solar Placement Scoring Platform - Backend Server
//!
//! Evaluates geographic points for photovoltaic suitability and serves
//! placement scores, financial projections and AI summaries.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sps_server::services::{
    calibrator::{HistoricObservation, RegionalCalibrator, WARM_UP_DAYS},
    HistoryStore,
};
use sps_server::{create_app, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sps_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Solar Placement Scoring Server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    // Warm the regional calibrator from persisted history. The state is
    // not persisted across restarts; it is always rebuilt from here.
    let calibrator = Arc::new(RegionalCalibrator::new());
    let store = HistoryStore::new(db_pool.clone());
    let cutoff = Utc::now() - chrono::Duration::days(WARM_UP_DAYS);
    match store.replay_since(cutoff).await {
        Ok(records) => {
            let observations = records
                .iter()
                .map(|r| HistoricObservation {
                    created_at: r.created_at,
                    lat: r.lat,
                    lng: r.lng,
                    score: f64::from(r.score),
                })
                .collect();
            calibrator.warm_up(observations);
        }
        Err(e) => {
            tracing::warn!("calibrator warm-up replay failed ({e}), starting cold");
            calibrator.warm_up(Vec::new());
        }
    }

    // Create application state
    let port = config.server.port;
    let state = AppState::new(db_pool, config, calibrator);

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM so in-flight requests can drain.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests");
}
