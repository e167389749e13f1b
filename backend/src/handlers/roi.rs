//! HTTP handlers for financial calculations

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::{financial, FinancialInputs, FinancialProjection, TariffPoint};

use crate::error::{AppError, AppResult};
use crate::AppState;

fn default_panel_area() -> f64 {
    100.0
}

fn default_efficiency() -> f64 {
    0.20
}

fn default_electricity_rate() -> f64 {
    8.0
}

/// Standalone financial calculation request
#[derive(Debug, Deserialize)]
pub struct RoiRequest {
    pub solar_irradiance: f64,
    #[serde(default = "default_panel_area")]
    pub panel_area: f64,
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,
    #[serde(default = "default_electricity_rate")]
    pub electricity_rate: f64,
    #[serde(default)]
    pub installation_cost: f64,
    #[serde(default)]
    pub plant_size_kw: Option<f64>,
}

/// Run the financial engine on caller-supplied inputs.
pub async fn calculate_roi(
    State(_state): State<AppState>,
    Json(request): Json<RoiRequest>,
) -> AppResult<Json<FinancialProjection>> {
    validate_roi_request(&request)?;

    let projection = financial::project(&FinancialInputs {
        solar_irradiance: request.solar_irradiance,
        electricity_rate: request.electricity_rate,
        plant_size_kw: request.plant_size_kw,
        panel_area: request.panel_area,
        efficiency: request.efficiency,
        installation_cost: request.installation_cost,
    });

    Ok(Json(projection))
}

/// Tariff sensitivity request
#[derive(Debug, Deserialize)]
pub struct TariffSensitivityRequest {
    pub solar_irradiance: f64,
    pub plant_size_kw: f64,
    pub installation_cost: f64,
    #[serde(default)]
    pub tariff_rates: Option<Vec<f64>>,
}

/// Tariff sensitivity response
#[derive(Debug, serde::Serialize)]
pub struct TariffSensitivityResponse {
    pub plant_size_kw: f64,
    pub sensitivity: Vec<TariffPoint>,
}

/// Annual savings and payback across a tariff ladder.
pub async fn tariff_sensitivity(
    State(_state): State<AppState>,
    Json(request): Json<TariffSensitivityRequest>,
) -> AppResult<Json<TariffSensitivityResponse>> {
    if request.plant_size_kw <= 0.0 || !request.plant_size_kw.is_finite() {
        return Err(AppError::Validation {
            field: "plant_size_kw".to_string(),
            message: "Plant capacity must be positive".to_string(),
        });
    }

    let rates = request
        .tariff_rates
        .unwrap_or_else(|| financial::DEFAULT_TARIFF_RATES.to_vec());

    let table = financial::tariff_sensitivity(
        request.solar_irradiance,
        request.plant_size_kw,
        request.installation_cost,
        &rates,
    );

    Ok(Json(TariffSensitivityResponse {
        plant_size_kw: request.plant_size_kw,
        sensitivity: table,
    }))
}

fn validate_roi_request(request: &RoiRequest) -> AppResult<()> {
    if !request.solar_irradiance.is_finite() || request.solar_irradiance < 0.0 {
        return Err(AppError::Validation {
            field: "solar_irradiance".to_string(),
            message: "Irradiance cannot be negative".to_string(),
        });
    }
    if request.panel_area <= 0.0 && request.plant_size_kw.is_none() {
        return Err(AppError::Validation {
            field: "panel_area".to_string(),
            message: "Panel area must be positive without a plant size".to_string(),
        });
    }
    if request.efficiency <= 0.0 || request.efficiency > 1.0 {
        return Err(AppError::Validation {
            field: "efficiency".to_string(),
            message: "Efficiency must be in (0, 1]".to_string(),
        });
    }
    if let Some(kw) = request.plant_size_kw {
        if kw <= 0.0 || !kw.is_finite() {
            return Err(AppError::Validation {
                field: "plant_size_kw".to_string(),
                message: "Plant capacity must be positive".to_string(),
            });
        }
    }
    Ok(())
}
