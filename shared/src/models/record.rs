//! Persisted analysis history models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted analysis run.
///
/// Records are append-only: created once per successful pipeline
/// invocation and never mutated. The calibrator warm-up consumes
/// `created_at`, `lat`, `lng` and `score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,

    pub lat: f64,
    pub lng: f64,

    pub solar_irradiance: f64,
    pub wind_speed: f64,
    pub elevation_m: f64,

    pub score: i32,
    pub grade: String,
    pub solar_score: f64,
    pub wind_score: f64,
    pub elevation_score: f64,
    pub recommendation: Option<String>,

    pub annual_energy_kwh: f64,
    pub annual_savings: f64,
    pub payback_years: f64,
    pub lifetime_profit: f64,

    pub ai_summary: Option<String>,
    pub ai_provider: Option<String>,
}

/// Insert payload for a new analysis record
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub lat: f64,
    pub lng: f64,
    pub solar_irradiance: f64,
    pub wind_speed: f64,
    pub elevation_m: f64,
    pub score: i32,
    pub grade: String,
    pub solar_score: f64,
    pub wind_score: f64,
    pub elevation_score: f64,
    pub recommendation: String,
    pub annual_energy_kwh: f64,
    pub annual_savings: f64,
    pub payback_years: f64,
    pub lifetime_profit: f64,
    pub ai_summary: String,
    pub ai_provider: String,
}
