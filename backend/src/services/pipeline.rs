//! Analysis pipeline orchestrator
//!
//! Sequences one request end to end: validation, concurrent feature
//! acquisition, scoring with the regional calibration delta, the
//! financial projection, the deadline-bounded summarizer, the
//! calibrator feedback write and the best-effort persist. Only invalid
//! input surfaces as an error from here; the hard request deadline is
//! enforced by the handler.

use std::sync::Arc;
use std::time::Duration;

use shared::{
    financial, scoring, validate_request, AnalysisReport, AnalyzeRequest, FinancialInputs,
    NewAnalysis,
};
use tokio::time::timeout;

use crate::error::AppResult;
use crate::external::summarizer::{self, Summary, SummaryContext};
use crate::external::SummarizerClient;
use crate::services::{AcquisitionService, HistoryStore, RegionalCalibrator};

/// Per-request orchestrator, cheap to construct from application state
#[derive(Clone)]
pub struct AnalysisPipeline {
    acquisition: AcquisitionService,
    summarizer: SummarizerClient,
    calibrator: Arc<RegionalCalibrator>,
    store: HistoryStore,
    summarizer_deadline: Duration,
}

impl AnalysisPipeline {
    pub fn new(
        acquisition: AcquisitionService,
        summarizer: SummarizerClient,
        calibrator: Arc<RegionalCalibrator>,
        store: HistoryStore,
        summarizer_deadline: Duration,
    ) -> Self {
        Self {
            acquisition,
            summarizer,
            calibrator,
            store,
            summarizer_deadline,
        }
    }

    /// Run the full analysis for one request.
    pub async fn run(&self, request: AnalyzeRequest) -> AppResult<AnalysisReport> {
        validate_request(&request)?;

        tracing::info!(
            "analyzing lat={:.4} lng={:.4} plant={}kW",
            request.lat,
            request.lng,
            request.plant_size_kw
        );

        let features = self
            .acquisition
            .acquire(request.lat, request.lng, request.grid_distance_km)
            .await;

        tracing::info!(
            "features: solar={:.3} wind={:.1} elev={:.0}m temp={:.1}°C cloud={:.0}% slope={:.1}° grid={:.0}km sources={}",
            features.solar_irradiance,
            features.wind_speed,
            features.elevation_m,
            features.temperature_c,
            features.cloud_cover_pct,
            features.slope_degrees,
            features.grid_distance_km,
            features.data_sources,
        );

        // Cells running hot against the global mean are pulled down
        let adjustment = -self.calibrator.delta(request.lat, request.lng);
        let verdict = scoring::evaluate(&features, &request, adjustment);

        tracing::info!(
            "score={}/100 grade={} confidence={}% class={} adj={:+.1} violations={}",
            verdict.score,
            verdict.grade,
            verdict.confidence,
            verdict.suitability_class,
            verdict.calibration_adjustment,
            verdict.constraint_violations.len(),
        );

        let financial = financial::project(&FinancialInputs {
            solar_irradiance: features.solar_irradiance,
            electricity_rate: request.electricity_rate,
            plant_size_kw: Some(request.plant_size_kw),
            panel_area: request.panel_area,
            efficiency: request.efficiency,
            installation_cost: request.installation_cost,
        });

        let ctx = SummaryContext {
            lat: request.lat,
            lng: request.lng,
            score: verdict.score,
            grade: verdict.grade,
            suitability_class: verdict.suitability_class,
            top_violation: verdict.constraint_violations.first().cloned(),
            solar_irradiance: features.solar_irradiance,
            wind_speed: features.wind_speed,
            elevation_m: features.elevation_m,
            payback_years: financial.payback_years,
            annual_savings: financial.annual_savings,
        };

        // The summarizer and the calibrator feedback have no data
        // dependency on each other; run them concurrently. The
        // observation is the calibrated score and completes before the
        // response is returned.
        let summary_fut = async {
            match timeout(self.summarizer_deadline, self.summarizer.summarize(&ctx)).await {
                Ok(Ok(summary)) => summary,
                Ok(Err(e)) => {
                    tracing::warn!("summarizer failed ({e}), substituting template");
                    Summary {
                        text: summarizer::template_summary(&ctx),
                        provider: summarizer::FALLBACK_PROVIDER.to_string(),
                    }
                }
                Err(_) => {
                    tracing::warn!("summarizer deadline exceeded, substituting template");
                    Summary {
                        text: summarizer::template_summary(&ctx),
                        provider: summarizer::FALLBACK_PROVIDER.to_string(),
                    }
                }
            }
        };
        let observe_fut = async {
            self.calibrator
                .observe(request.lat, request.lng, f64::from(verdict.score));
        };
        let (summary, ()) = tokio::join!(summary_fut, observe_fut);

        let record = NewAnalysis {
            lat: request.lat,
            lng: request.lng,
            solar_irradiance: features.solar_irradiance,
            wind_speed: features.wind_speed,
            elevation_m: features.elevation_m,
            score: i32::from(verdict.score),
            grade: verdict.grade.as_str().to_string(),
            solar_score: verdict.sub_scores.solar,
            wind_score: verdict.sub_scores.wind,
            elevation_score: verdict.sub_scores.elevation,
            recommendation: verdict.recommendation.clone(),
            annual_energy_kwh: financial.annual_energy_kwh,
            annual_savings: financial.annual_savings,
            payback_years: financial.payback_years,
            lifetime_profit: financial.lifetime_profit,
            ai_summary: summary.text.clone(),
            ai_provider: summary.provider.clone(),
        };

        // Enqueue the persist without holding up the response;
        // persistence failure never fails the request
        let store = self.store.clone();
        tokio::spawn(async move {
            if let Err(e) = store.append(&record).await {
                tracing::warn!("failed to persist analysis: {e}");
            }
        });

        Ok(AnalysisReport::assemble(
            request.lat,
            request.lng,
            request.plant_size_kw,
            &features,
            verdict,
            financial,
            summary.text,
            summary.provider,
        ))
    }
}
