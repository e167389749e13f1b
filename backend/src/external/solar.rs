//! Solar irradiance client
//!
//! Primary source is a NASA-POWER-style daily point endpoint averaged
//! over the last 365 days; the climatology endpoint provides the
//! long-term annual mean as first fallback, and a latitude-band table
//! guarantees a value when both are unreachable.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use shared::FeatureSource;

/// Irradiance parameter name: all-sky shortwave downward at surface
const IRRADIANCE_PARAMETER: &str = "ALLSKY_SFC_SW_DWN";

/// Fill values in the daily series are data, not errors; anything at or
/// below this level is discarded before averaging.
const FILL_VALUE_CEILING: f64 = -900.0;

/// True for sentinel fill values in a provider time series.
pub fn is_fill_value(value: f64) -> bool {
    value <= FILL_VALUE_CEILING
}

/// A resolved irradiance value with its provenance
#[derive(Debug, Clone, Copy)]
pub struct SolarReading {
    /// Mean daily irradiance (kWh/m²/day)
    pub irradiance: f64,
    pub source: FeatureSource,
}

/// Solar irradiance API client
#[derive(Clone)]
pub struct SolarClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: HashMap<String, HashMap<String, f64>>,
}

impl SolarClient {
    /// Create a new SolarClient
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Fetch the mean daily irradiance, degrading through the fallback
    /// chain. Never fails: the latitude-band estimate is always available.
    pub async fn fetch_irradiance(&self, lat: f64, lng: f64) -> SolarReading {
        match self.fetch_daily_mean(lat, lng).await {
            Ok(irradiance) => {
                tracing::info!("solar daily mean: {irradiance:.3} kWh/m²/d (lat={lat}, lng={lng})");
                return SolarReading {
                    irradiance,
                    source: FeatureSource::Live,
                };
            }
            Err(e) => {
                tracing::warn!("solar daily endpoint failed ({e}), trying climatology");
            }
        }

        match self.fetch_climatology_annual(lat, lng).await {
            Ok(irradiance) => {
                tracing::info!(
                    "solar climatology: {irradiance:.3} kWh/m²/d (lat={lat}, lng={lng})"
                );
                return SolarReading {
                    irradiance,
                    source: FeatureSource::Climatology,
                };
            }
            Err(e) => {
                tracing::warn!("solar climatology failed ({e}), using latitude estimate");
            }
        }

        SolarReading {
            irradiance: estimate_irradiance(lat),
            source: FeatureSource::RegionalEstimate,
        }
    }

    /// Mean of the last 365 days from the daily point endpoint,
    /// excluding sentinel fill values.
    async fn fetch_daily_mean(&self, lat: f64, lng: f64) -> anyhow::Result<f64> {
        // The provider lags realtime by about two days
        let end = Utc::now().date_naive() - Duration::days(2);
        let start = end - Duration::days(364);

        let url = format!("{}/daily/point", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("parameters", IRRADIANCE_PARAMETER),
                ("community", "RE"),
                ("latitude", &format!("{lat:.4}")),
                ("longitude", &format!("{lng:.4}")),
                ("start", &start.format("%Y%m%d").to_string()),
                ("end", &end.format("%Y%m%d").to_string()),
                ("format", "JSON"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let data: PowerResponse = response.json().await?;
        let series = data
            .properties
            .parameter
            .get(IRRADIANCE_PARAMETER)
            .ok_or_else(|| anyhow::anyhow!("missing {IRRADIANCE_PARAMETER} in daily response"))?;

        Ok(mean_excluding_fill(series.values().copied())
            .ok_or_else(|| anyhow::anyhow!("daily series contained only fill values"))?)
    }

    /// Long-term annual mean from the climatology endpoint.
    async fn fetch_climatology_annual(&self, lat: f64, lng: f64) -> anyhow::Result<f64> {
        let url = format!("{}/climatology/point", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("parameters", IRRADIANCE_PARAMETER),
                ("community", "RE"),
                ("latitude", &format!("{lat:.4}")),
                ("longitude", &format!("{lng:.4}")),
                ("format", "JSON"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let data: PowerResponse = response.json().await?;
        data.properties
            .parameter
            .get(IRRADIANCE_PARAMETER)
            .and_then(|months| months.get("ANN"))
            .copied()
            .filter(|v| !is_fill_value(*v))
            .ok_or_else(|| anyhow::anyhow!("missing ANN in climatology response"))
    }
}

/// Mean of a series after dropping fill values; None when nothing is left.
pub fn mean_excluding_fill(values: impl Iterator<Item = f64>) -> Option<f64> {
    let valid: Vec<f64> = values.filter(|v| !is_fill_value(*v)).collect();
    if valid.is_empty() {
        return None;
    }
    Some(valid.iter().sum::<f64>() / valid.len() as f64)
}

/// Latitude-band irradiance estimate (kWh/m²/day)
pub fn estimate_irradiance(lat: f64) -> f64 {
    let abs_lat = lat.abs();
    if abs_lat <= 15.0 {
        6.5 // Tropical
    } else if abs_lat <= 30.0 {
        5.5 // Subtropical
    } else if abs_lat <= 45.0 {
        4.0 // Temperate
    } else if abs_lat <= 60.0 {
        2.5 // Subarctic
    } else {
        1.5 // Arctic
    }
}
