//! HTTP handler for standalone summary generation

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use shared::{Grade, SuitabilityClass};

use crate::error::AppResult;
use crate::external::summarizer::{self, SummaryContext};
use crate::AppState;

/// Standalone summary request
#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub score: u8,
    pub payback_years: f64,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub solar_irradiance: f64,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub elevation_m: f64,
    #[serde(default)]
    pub annual_savings: f64,
    #[serde(default)]
    pub constraint_violations: Vec<String>,
}

/// Summary response
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
    pub ai_provider: String,
}

/// Generate an AI summary for a previously scored location, falling
/// back to the deterministic template when the summarizer fails.
pub async fn generate_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> AppResult<Json<SummaryResponse>> {
    let grade = Grade::from_score(request.score.min(100));
    let suitability_class = if request.constraint_violations.is_empty() {
        SuitabilityClass::from_grade(grade)
    } else {
        SuitabilityClass::Unsuitable
    };

    let ctx = SummaryContext {
        lat: request.lat,
        lng: request.lng,
        score: request.score.min(100),
        grade,
        suitability_class,
        top_violation: request.constraint_violations.first().cloned(),
        solar_irradiance: request.solar_irradiance,
        wind_speed: request.wind_speed,
        elevation_m: request.elevation_m,
        payback_years: request.payback_years,
        annual_savings: request.annual_savings,
    };

    let summary = match state.summarizer.summarize(&ctx).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!("summarizer failed ({e}), substituting template");
            summarizer::Summary {
                text: summarizer::template_summary(&ctx),
                provider: summarizer::FALLBACK_PROVIDER.to_string(),
            }
        }
    };

    Ok(Json(SummaryResponse {
        summary: summary.text,
        ai_provider: summary.provider,
    }))
}
