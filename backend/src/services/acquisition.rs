//! Concurrent feature acquisition
//!
//! Fans out the three provider fetches with independent hard timeouts
//! and assembles a complete `SiteFeatures`. One provider failing or
//! timing out never cancels the siblings and never fails the request;
//! every field always ends up populated.

use std::time::Duration;

use shared::{FeatureSource, SiteFeatures};
use tokio::time::timeout;

use crate::external::{
    elevation::{self, TerrainReading},
    solar::{self, SolarReading},
    weather::{self, WeatherBundle},
    ElevationClient, SolarClient, WeatherClient,
};

/// Grid distance estimate with whether a named region matched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEstimate {
    pub distance_km: f64,
    /// True when the estimate came from a named region rather than the
    /// global default; named regions count towards `data_sources`.
    pub named_region: bool,
}

/// Feature acquisition service over the three provider clients
#[derive(Clone)]
pub struct AcquisitionService {
    solar: SolarClient,
    weather: WeatherClient,
    elevation: ElevationClient,
    provider_timeout: Duration,
}

impl AcquisitionService {
    pub fn new(
        solar: SolarClient,
        weather: WeatherClient,
        elevation: ElevationClient,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            solar,
            weather,
            elevation,
            provider_timeout,
        }
    }

    /// Fetch all features for a location. `grid_override` is the
    /// caller-supplied grid distance, taking priority over the regional
    /// estimate.
    pub async fn acquire(
        &self,
        lat: f64,
        lng: f64,
        grid_override: Option<f64>,
    ) -> SiteFeatures {
        let (solar, weather, terrain) = tokio::join!(
            timeout(self.provider_timeout, self.solar.fetch_irradiance(lat, lng)),
            timeout(self.provider_timeout, self.weather.fetch_bundle(lat, lng)),
            timeout(self.provider_timeout, self.elevation.fetch_terrain(lat, lng)),
        );

        let solar = solar.unwrap_or_else(|_| {
            tracing::warn!("solar fetch timed out, using latitude estimate");
            SolarReading {
                irradiance: solar::estimate_irradiance(lat),
                source: FeatureSource::RegionalEstimate,
            }
        });

        let weather = weather.unwrap_or_else(|_| {
            tracing::warn!("weather fetch timed out, using latitude estimates");
            WeatherBundle {
                wind_speed: weather::estimate_wind(lat),
                temperature_c: weather::estimate_temperature(lat),
                humidity_pct: weather::estimate_humidity(lat),
                cloud_cover_pct: weather::estimate_cloud(lat),
                source: FeatureSource::RegionalEstimate,
            }
        });

        let terrain = terrain.unwrap_or_else(|_| {
            tracing::warn!("elevation fetch timed out, using region estimate");
            TerrainReading {
                elevation_m: elevation::estimate_elevation(lat, lng),
                slope_degrees: 2.0,
                source: FeatureSource::RegionalEstimate,
            }
        });

        let grid_estimate = regional_grid_estimate(lat, lng);
        let (grid_distance_km, grid_counts) = match grid_override {
            Some(km) => (km, true),
            None => (grid_estimate.distance_km, grid_estimate.named_region),
        };

        let mut data_sources = 0u8;
        if solar.source.is_live() {
            data_sources += 1;
        }
        if weather.source.is_live() {
            data_sources += 1;
        }
        if terrain.source.is_live() {
            data_sources += 1;
        }
        if grid_counts {
            data_sources += 1;
        }

        SiteFeatures {
            solar_irradiance: solar.irradiance,
            wind_speed: weather.wind_speed,
            temperature_c: weather.temperature_c,
            humidity_pct: weather.humidity_pct,
            cloud_cover_pct: weather.cloud_cover_pct,
            elevation_m: terrain.elevation_m,
            slope_degrees: terrain.slope_degrees,
            grid_distance_km,
            data_sources,
        }
    }
}

/// Heuristic grid proximity when the caller does not supply a distance.
pub fn regional_grid_estimate(lat: f64, lng: f64) -> GridEstimate {
    // Indian subcontinent
    if (8.0..=37.0).contains(&lat) && (68.0..=97.0).contains(&lng) {
        let distance_km = if (20.0..=30.0).contains(&lat) {
            8.0 // Indo-Gangetic plain, dense grid
        } else if lat > 30.0 {
            20.0 // Himalayan foothills, sparse
        } else {
            10.0 // Southern India
        };
        return GridEstimate {
            distance_km,
            named_region: true,
        };
    }
    // Europe
    if (35.0..=72.0).contains(&lat) && (-10.0..=40.0).contains(&lng) {
        return GridEstimate {
            distance_km: 5.0,
            named_region: true,
        };
    }
    // North America
    if (25.0..=60.0).contains(&lat) && (-130.0..=-60.0).contains(&lng) {
        return GridEstimate {
            distance_km: 12.0,
            named_region: true,
        };
    }
    // Africa
    if (-35.0..=37.0).contains(&lat) && (-18.0..=52.0).contains(&lng) {
        return GridEstimate {
            distance_km: 25.0,
            named_region: true,
        };
    }
    GridEstimate {
        distance_km: 15.0,
        named_region: false,
    }
}
