//! Analysis request model

use serde::{Deserialize, Serialize};

fn default_plant_size_kw() -> f64 {
    10.0
}

fn default_electricity_rate() -> f64 {
    8.0
}

fn default_panel_area() -> f64 {
    80.0
}

fn default_efficiency() -> f64 {
    0.20
}

/// Full pipeline request. Capacity-first planning via `plant_size_kw`;
/// `panel_area`/`efficiency` remain for the legacy area-first path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub lat: f64,
    pub lng: f64,

    /// Desired plant capacity in kW
    #[serde(default = "default_plant_size_kw")]
    pub plant_size_kw: f64,

    /// Local electricity tariff (currency per kWh)
    #[serde(default = "default_electricity_rate")]
    pub electricity_rate: f64,

    /// Panel area in m² (legacy area-first sizing)
    #[serde(default = "default_panel_area")]
    pub panel_area: f64,

    /// Panel efficiency in (0, 1] (legacy area-first sizing)
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,

    /// Installed cost in currency units; 0 derives the cost from capacity
    #[serde(default)]
    pub installation_cost: f64,

    /// Distance to the nearest grid connection, if the caller knows it
    #[serde(default)]
    pub grid_distance_km: Option<f64>,

    /// Land area available for the installation
    #[serde(default)]
    pub available_area_m2: Option<f64>,
}

impl AnalyzeRequest {
    /// Minimal constructor used by tests and internal callers.
    pub fn at(lat: f64, lng: f64, plant_size_kw: f64, electricity_rate: f64) -> Self {
        Self {
            lat,
            lng,
            plant_size_kw,
            electricity_rate,
            panel_area: default_panel_area(),
            efficiency: default_efficiency(),
            installation_cost: 0.0,
            grid_distance_km: None,
            available_area_m2: None,
        }
    }
}
