//! Assembled pipeline response

use serde::{Deserialize, Serialize};

use super::{FinancialProjection, Grade, SiteFeatures, SubScores, SuitabilityClass, Verdict};

/// Full analysis response: echoed features, placement verdict,
/// financial projection and the AI summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    // Location
    pub lat: f64,
    pub lng: f64,

    // Measured climate and terrain features
    pub solar_irradiance: f64,
    pub wind_speed: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub cloud_cover_pct: f64,
    pub elevation_m: f64,
    pub slope_degrees: f64,
    pub grid_distance_km: f64,
    pub data_sources: u8,

    // Placement verdict
    pub score: u8,
    pub grade: Grade,
    pub suitability_class: SuitabilityClass,
    pub confidence: f64,
    pub recommendation: String,
    pub constraint_violations: Vec<String>,
    pub is_suitable: bool,
    pub sub_scores: SubScores,
    pub calibration_adjustment: f64,
    pub algorithm_version: String,

    // Plant sizing
    pub plant_size_kw: f64,
    pub system_size_kwp: f64,
    pub required_land_area_m2: f64,
    pub installation_cost: f64,

    // Financials
    pub annual_energy_kwh: f64,
    pub annual_savings: f64,
    pub monthly_savings: f64,
    pub daily_savings: f64,
    pub payback_years: f64,
    pub lifetime_profit: f64,
    pub system_lifetime_years: u32,
    pub subsidy_amount: f64,
    pub net_cost_after_subsidy: f64,
    pub payback_years_after_subsidy: f64,
    pub lifetime_profit_after_subsidy: f64,
    pub self_consumed_kwh: f64,
    pub exported_kwh: f64,
    pub export_credit: f64,
    pub net_metering_annual_benefit: f64,
    pub net_metering_payback_years: f64,

    // AI summary
    pub ai_summary: String,
    pub ai_provider: String,
}

impl AnalysisReport {
    /// Flatten the pipeline outputs into the wire response.
    pub fn assemble(
        lat: f64,
        lng: f64,
        plant_size_kw: f64,
        features: &SiteFeatures,
        verdict: Verdict,
        financial: FinancialProjection,
        ai_summary: String,
        ai_provider: String,
    ) -> Self {
        Self {
            lat,
            lng,
            solar_irradiance: features.solar_irradiance,
            wind_speed: features.wind_speed,
            temperature_c: features.temperature_c,
            humidity_pct: features.humidity_pct,
            cloud_cover_pct: features.cloud_cover_pct,
            elevation_m: features.elevation_m,
            slope_degrees: features.slope_degrees,
            grid_distance_km: features.grid_distance_km,
            data_sources: features.data_sources,
            score: verdict.score,
            grade: verdict.grade,
            suitability_class: verdict.suitability_class,
            confidence: verdict.confidence,
            recommendation: verdict.recommendation,
            constraint_violations: verdict.constraint_violations,
            is_suitable: verdict.is_suitable,
            sub_scores: verdict.sub_scores,
            calibration_adjustment: verdict.calibration_adjustment,
            algorithm_version: verdict.algorithm_version,
            plant_size_kw,
            system_size_kwp: financial.system_size_kwp,
            required_land_area_m2: financial.required_land_area_m2,
            installation_cost: financial.installation_cost,
            annual_energy_kwh: financial.annual_energy_kwh,
            annual_savings: financial.annual_savings,
            monthly_savings: financial.monthly_savings,
            daily_savings: financial.daily_savings,
            payback_years: financial.payback_years,
            lifetime_profit: financial.lifetime_profit,
            system_lifetime_years: financial.system_lifetime_years,
            subsidy_amount: financial.subsidy_amount,
            net_cost_after_subsidy: financial.net_cost_after_subsidy,
            payback_years_after_subsidy: financial.payback_years_after_subsidy,
            lifetime_profit_after_subsidy: financial.lifetime_profit_after_subsidy,
            self_consumed_kwh: financial.self_consumed_kwh,
            exported_kwh: financial.exported_kwh,
            export_credit: financial.export_credit,
            net_metering_annual_benefit: financial.net_metering_annual_benefit,
            net_metering_payback_years: financial.net_metering_payback_years,
            ai_summary,
            ai_provider,
        }
    }
}
