//! HTTP handlers for the analysis pipeline

use std::time::{Duration, Instant};

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::{AnalysisRecord, AnalysisReport, AnalyzeRequest};
use tokio::time::timeout;

use crate::error::{AppError, AppResult};
use crate::services::HistoryStore;
use crate::AppState;

/// Run the full placement analysis pipeline for one location.
///
/// The hard deadline fails the request with 504; the soft deadline is
/// only logged.
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> AppResult<Json<AnalysisReport>> {
    let soft_deadline = Duration::from_secs(state.config.server.soft_deadline_secs);
    let hard_deadline = Duration::from_secs(state.config.server.hard_deadline_secs);

    let pipeline = state.pipeline();
    let started = Instant::now();

    let report = match timeout(hard_deadline, pipeline.run(request)).await {
        Ok(result) => result?,
        Err(_) => return Err(AppError::DeadlineExceeded),
    };

    let elapsed = started.elapsed();
    if elapsed > soft_deadline {
        tracing::warn!("analysis exceeded the soft deadline: {elapsed:?}");
    }

    Ok(Json(report))
}

/// Query parameters for recent analyses
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

/// List the most recent persisted analyses.
pub async fn recent_analyses(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<Vec<AnalysisRecord>>> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let store = HistoryStore::new(state.db.clone());
    let records = store.recent(limit).await?;
    Ok(Json(records))
}
