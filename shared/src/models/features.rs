//! Climate and terrain features assembled by the acquisition layer

use serde::{Deserialize, Serialize};

/// Provenance of a fetched feature group.
///
/// Only `Live` values count towards the `data_sources` quality counter;
/// climatology and regional estimates are fallbacks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSource {
    Live,
    Climatology,
    RegionalEstimate,
}

impl FeatureSource {
    pub fn is_live(&self) -> bool {
        matches!(self, FeatureSource::Live)
    }
}

/// Complete feature set for one location.
///
/// Every field is always populated: provider failures degrade to
/// climatology or regional estimates, never to missing data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteFeatures {
    /// Mean daily solar irradiance (kWh/m²/day)
    pub solar_irradiance: f64,
    /// Mean wind speed at 10 m (m/s)
    pub wind_speed: f64,
    /// Mean air temperature at 2 m (°C)
    pub temperature_c: f64,
    /// Mean relative humidity (%)
    pub humidity_pct: f64,
    /// Mean cloud cover (%)
    pub cloud_cover_pct: f64,
    /// Elevation above sea level (m)
    pub elevation_m: f64,
    /// Terrain slope from the 5-point stencil (degrees)
    pub slope_degrees: f64,
    /// Distance to the nearest grid connection (km)
    pub grid_distance_km: f64,
    /// Number of live data sources backing this feature set (0-4)
    pub data_sources: u8,
}
