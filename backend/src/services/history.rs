//! Analysis history store
//!
//! Append-only persistence for analysis runs, plus the replay used to
//! warm the regional calibrator at startup.

use chrono::{DateTime, Utc};
use shared::{AnalysisRecord, NewAnalysis};
use sqlx::PgPool;

use crate::error::AppResult;

/// History store over the shared connection pool
#[derive(Clone)]
pub struct HistoryStore {
    db: PgPool,
}

/// Database row for an analysis record
#[derive(Debug, sqlx::FromRow)]
struct AnalysisRow {
    id: i64,
    created_at: DateTime<Utc>,
    lat: f64,
    lng: f64,
    solar_irradiance: f64,
    wind_speed: f64,
    elevation_m: f64,
    score: i32,
    grade: String,
    solar_score: f64,
    wind_score: f64,
    elevation_score: f64,
    recommendation: Option<String>,
    annual_energy_kwh: f64,
    annual_savings: f64,
    payback_years: f64,
    lifetime_profit: f64,
    ai_summary: Option<String>,
    ai_provider: Option<String>,
}

impl From<AnalysisRow> for AnalysisRecord {
    fn from(row: AnalysisRow) -> Self {
        AnalysisRecord {
            id: row.id,
            created_at: row.created_at,
            lat: row.lat,
            lng: row.lng,
            solar_irradiance: row.solar_irradiance,
            wind_speed: row.wind_speed,
            elevation_m: row.elevation_m,
            score: row.score,
            grade: row.grade,
            solar_score: row.solar_score,
            wind_score: row.wind_score,
            elevation_score: row.elevation_score,
            recommendation: row.recommendation,
            annual_energy_kwh: row.annual_energy_kwh,
            annual_savings: row.annual_savings,
            payback_years: row.payback_years,
            lifetime_profit: row.lifetime_profit,
            ai_summary: row.ai_summary,
            ai_provider: row.ai_provider,
        }
    }
}

const RECORD_COLUMNS: &str = "id, created_at, lat, lng, solar_irradiance, wind_speed, \
     elevation_m, score, grade, solar_score, wind_score, elevation_score, recommendation, \
     annual_energy_kwh, annual_savings, payback_years, lifetime_profit, ai_summary, ai_provider";

impl HistoryStore {
    /// Create a new HistoryStore
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Append one analysis run. Records are immutable once written.
    pub async fn append(&self, analysis: &NewAnalysis) -> AppResult<AnalysisRecord> {
        let row = sqlx::query_as::<_, AnalysisRow>(&format!(
            r#"
            INSERT INTO analyses (
                lat, lng, solar_irradiance, wind_speed, elevation_m,
                score, grade, solar_score, wind_score, elevation_score,
                recommendation, annual_energy_kwh, annual_savings,
                payback_years, lifetime_profit, ai_summary, ai_provider
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(analysis.lat)
        .bind(analysis.lng)
        .bind(analysis.solar_irradiance)
        .bind(analysis.wind_speed)
        .bind(analysis.elevation_m)
        .bind(analysis.score)
        .bind(&analysis.grade)
        .bind(analysis.solar_score)
        .bind(analysis.wind_score)
        .bind(analysis.elevation_score)
        .bind(&analysis.recommendation)
        .bind(analysis.annual_energy_kwh)
        .bind(analysis.annual_savings)
        .bind(analysis.payback_years)
        .bind(analysis.lifetime_profit)
        .bind(&analysis.ai_summary)
        .bind(&analysis.ai_provider)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// All records created at or after the cutoff, oldest first. The
    /// calibrator warm-up depends on this ordering.
    pub async fn replay_since(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<AnalysisRecord>> {
        let rows = sqlx::query_as::<_, AnalysisRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM analyses WHERE created_at >= $1 ORDER BY created_at ASC"
        ))
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Most recent records, newest first.
    pub async fn recent(&self, limit: i64) -> AppResult<Vec<AnalysisRecord>> {
        let rows = sqlx::query_as::<_, AnalysisRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM analyses ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
