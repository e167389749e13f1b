//! Weather bundle client
//!
//! One call fetches wind, temperature, humidity and cloud cover as
//! 7-day hourly series; the core consumes the arithmetic mean of each.
//! Latitude-band tables stand in when the API is unreachable.

use reqwest::Client;
use serde::Deserialize;
use shared::FeatureSource;

/// Averaged weather metrics for one location
#[derive(Debug, Clone, Copy)]
pub struct WeatherBundle {
    pub wind_speed: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub cloud_cover_pct: f64,
    pub source: FeatureSource,
}

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlySeries,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    cloudcover: Vec<Option<f64>>,
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Fetch the 7-day averaged weather bundle. Never fails: any
    /// missing metric or transport error degrades to the latitude table.
    pub async fn fetch_bundle(&self, lat: f64, lng: f64) -> WeatherBundle {
        match self.fetch_hourly(lat, lng).await {
            Ok(hourly) => {
                let wind = mean_of(&hourly.wind_speed_10m);
                let temp = mean_of(&hourly.temperature_2m);
                let humidity = mean_of(&hourly.relative_humidity_2m);
                let cloud = mean_of(&hourly.cloudcover);

                let bundle = WeatherBundle {
                    wind_speed: wind.unwrap_or_else(|| estimate_wind(lat)),
                    temperature_c: temp.unwrap_or_else(|| estimate_temperature(lat)),
                    humidity_pct: humidity.unwrap_or_else(|| estimate_humidity(lat)),
                    cloud_cover_pct: cloud.unwrap_or_else(|| estimate_cloud(lat)),
                    source: FeatureSource::Live,
                };
                tracing::info!(
                    "weather: wind={:.1}m/s temp={:.1}°C hum={:.0}% cloud={:.0}% (lat={lat}, lng={lng})",
                    bundle.wind_speed,
                    bundle.temperature_c,
                    bundle.humidity_pct,
                    bundle.cloud_cover_pct,
                );
                bundle
            }
            Err(e) => {
                tracing::warn!("weather API failed ({e}), using latitude estimates");
                WeatherBundle {
                    wind_speed: estimate_wind(lat),
                    temperature_c: estimate_temperature(lat),
                    humidity_pct: estimate_humidity(lat),
                    cloud_cover_pct: estimate_cloud(lat),
                    source: FeatureSource::RegionalEstimate,
                }
            }
        }
    }

    async fn fetch_hourly(&self, lat: f64, lng: f64) -> anyhow::Result<HourlySeries> {
        let url = format!("{}/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", format!("{lat:.4}")),
                ("longitude", format!("{lng:.4}")),
                (
                    "hourly",
                    "wind_speed_10m,temperature_2m,relative_humidity_2m,cloudcover".to_string(),
                ),
                ("wind_speed_unit", "ms".to_string()),
                ("forecast_days", "7".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let data: ForecastResponse = response.json().await?;
        Ok(data.hourly)
    }
}

/// Arithmetic mean of the present values; None for an empty series.
fn mean_of(series: &[Option<f64>]) -> Option<f64> {
    let valid: Vec<f64> = series.iter().flatten().copied().collect();
    if valid.is_empty() {
        return None;
    }
    Some(valid.iter().sum::<f64>() / valid.len() as f64)
}

// ── Latitude-band fallback tables ────────────────────────────────────

pub fn estimate_wind(lat: f64) -> f64 {
    let a = lat.abs();
    if a <= 15.0 {
        3.2
    } else if a <= 25.0 {
        4.0
    } else if a <= 35.0 {
        4.8
    } else if a <= 50.0 {
        5.5
    } else if a <= 65.0 {
        7.0
    } else {
        8.5
    }
}

pub fn estimate_temperature(lat: f64) -> f64 {
    let a = lat.abs();
    if a <= 10.0 {
        28.0
    } else if a <= 20.0 {
        26.0
    } else if a <= 30.0 {
        24.0
    } else if a <= 40.0 {
        18.0
    } else if a <= 50.0 {
        10.0
    } else if a <= 60.0 {
        4.0
    } else {
        -5.0
    }
}

pub fn estimate_humidity(lat: f64) -> f64 {
    let a = lat.abs();
    if a <= 10.0 {
        80.0 // Tropical
    } else if a <= 20.0 {
        65.0 // Monsoon belt
    } else if a <= 30.0 {
        48.0 // Semi-arid
    } else if a <= 40.0 {
        55.0
    } else if a <= 55.0 {
        70.0
    } else {
        75.0
    }
}

/// Climatological mean cloud cover by latitude band.
pub fn estimate_cloud(lat: f64) -> f64 {
    let a = lat.abs();
    if a <= 10.0 {
        55.0 // Tropical convergence zone
    } else if a <= 20.0 {
        35.0 // Subtropical dry belt
    } else if a <= 30.0 {
        30.0 // Semi-arid belt
    } else if a <= 40.0 {
        45.0 // Mediterranean / temperate
    } else if a <= 55.0 {
        65.0
    } else {
        75.0 // Sub-polar
    }
}
