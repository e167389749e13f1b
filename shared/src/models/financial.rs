//! Financial projection models

use serde::{Deserialize, Serialize};

/// Inputs to the financial engine.
///
/// `plant_size_kw = Some(kw)` selects capacity-first sizing; `None`
/// falls back to the legacy area-first path driven by `panel_area` and
/// `efficiency`. An `installation_cost` of zero derives the cost from
/// the benchmark rate per kW.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialInputs {
    pub solar_irradiance: f64,
    pub electricity_rate: f64,
    pub plant_size_kw: Option<f64>,
    pub panel_area: f64,
    pub efficiency: f64,
    pub installation_cost: f64,
}

/// Complete financial projection for one installation.
///
/// Payback fields hold `f64::INFINITY` when annual savings are zero or
/// negative; serde renders non-finite floats as JSON null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialProjection {
    pub annual_energy_kwh: f64,
    pub annual_savings: f64,
    pub monthly_savings: f64,
    pub daily_savings: f64,
    pub installation_cost: f64,
    pub payback_years: f64,
    pub lifetime_profit: f64,
    pub system_lifetime_years: u32,

    // System sizing
    pub system_size_kwp: f64,
    pub required_land_area_m2: f64,

    // Residential subsidy
    pub subsidy_amount: f64,
    pub net_cost_after_subsidy: f64,
    pub payback_years_after_subsidy: f64,
    pub lifetime_profit_after_subsidy: f64,

    // Net metering
    pub self_consumed_kwh: f64,
    pub exported_kwh: f64,
    pub export_credit: f64,
    pub net_metering_annual_benefit: f64,
    pub net_metering_payback_years: f64,
}

/// One row of the tariff sensitivity table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffPoint {
    pub tariff_rate: f64,
    pub annual_savings: f64,
    pub payback_years: f64,
}
