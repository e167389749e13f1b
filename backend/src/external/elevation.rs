//! Elevation and terrain slope client
//!
//! Samples a five-point cross around the query point (±200 m in the
//! cardinal directions) and derives the slope from the elevation
//! gradient. The primary provider accepts a batch GET; the secondary
//! accepts a batch POST; a regional table covers total outage.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::FeatureSource;

/// Cardinal sample offset from the centre point, metres
const STENCIL_OFFSET_M: f64 = 200.0;

/// Metres per degree of latitude
const METRES_PER_DEGREE: f64 = 111_320.0;

/// Slope assigned when only the regional table is available
const FALLBACK_SLOPE_DEG: f64 = 2.0;

/// Resolved elevation and slope with provenance
#[derive(Debug, Clone, Copy)]
pub struct TerrainReading {
    pub elevation_m: f64,
    pub slope_degrees: f64,
    pub source: FeatureSource,
}

/// Elevation API client with a primary/secondary provider chain
#[derive(Clone)]
pub struct ElevationClient {
    client: Client,
    base_url: String,
    api_key: String,
    fallback_url: String,
}

#[derive(Debug, Deserialize)]
struct BatchGetResponse {
    status: Option<String>,
    results: Vec<ElevationResult>,
}

#[derive(Debug, Deserialize)]
struct BatchPostResponse {
    results: Vec<ElevationResult>,
}

#[derive(Debug, Deserialize)]
struct ElevationResult {
    elevation: f64,
}

#[derive(Debug, Serialize)]
struct BatchPostRequest {
    locations: Vec<PostLocation>,
}

#[derive(Debug, Serialize)]
struct PostLocation {
    latitude: f64,
    longitude: f64,
}

impl ElevationClient {
    /// Create a new ElevationClient
    pub fn new(base_url: String, api_key: String, fallback_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            fallback_url,
        }
    }

    /// Fetch elevation and slope for a point. Never fails: the regional
    /// table backs the provider chain.
    pub async fn fetch_terrain(&self, lat: f64, lng: f64) -> TerrainReading {
        let points = stencil_points(lat, lng);

        let elevations = if !self.api_key.is_empty() {
            match self.batch_primary(&points).await {
                Ok(elevations) => Some(elevations),
                Err(e) => {
                    tracing::warn!("primary elevation batch failed ({e})");
                    None
                }
            }
        } else {
            None
        };

        let elevations = match elevations {
            Some(e) => Some(e),
            None => match self.batch_secondary(&points).await {
                Ok(elevations) => Some(elevations),
                Err(e) => {
                    tracing::warn!("secondary elevation batch failed ({e}), using region estimate");
                    None
                }
            },
        };

        match elevations {
            Some(elevations) => {
                let slope = slope_from_stencil(&elevations);
                tracing::info!(
                    "elevation: {:.1}m slope: {slope:.1}° (lat={lat}, lng={lng})",
                    elevations[0]
                );
                TerrainReading {
                    elevation_m: elevations[0],
                    slope_degrees: slope,
                    source: FeatureSource::Live,
                }
            }
            None => TerrainReading {
                elevation_m: estimate_elevation(lat, lng),
                slope_degrees: FALLBACK_SLOPE_DEG,
                source: FeatureSource::RegionalEstimate,
            },
        }
    }

    /// Primary provider: batch GET with `|`-separated locations.
    async fn batch_primary(&self, points: &[(f64, f64); 5]) -> anyhow::Result<[f64; 5]> {
        let locations = points
            .iter()
            .map(|(lat, lng)| format!("{lat},{lng}"))
            .collect::<Vec<_>>()
            .join("|");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("locations", locations.as_str()), ("key", &self.api_key)])
            .send()
            .await?
            .error_for_status()?;

        let data: BatchGetResponse = response.json().await?;
        if data.status.as_deref() != Some("OK") {
            anyhow::bail!("primary elevation status {:?}", data.status);
        }
        collect_five(data.results)
    }

    /// Secondary provider: batch POST with a JSON location list.
    async fn batch_secondary(&self, points: &[(f64, f64); 5]) -> anyhow::Result<[f64; 5]> {
        let payload = BatchPostRequest {
            locations: points
                .iter()
                .map(|&(latitude, longitude)| PostLocation {
                    latitude,
                    longitude,
                })
                .collect(),
        };

        let response = self
            .client
            .post(&self.fallback_url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        let data: BatchPostResponse = response.json().await?;
        collect_five(data.results)
    }
}

fn collect_five(results: Vec<ElevationResult>) -> anyhow::Result<[f64; 5]> {
    if results.len() != 5 {
        anyhow::bail!("expected 5 elevations, got {}", results.len());
    }
    let mut elevations = [0.0; 5];
    for (slot, result) in elevations.iter_mut().zip(results) {
        *slot = result.elevation;
    }
    Ok(elevations)
}

/// The five sample points in provider order: centre, north, south,
/// east, west. Offsets are ±200 m converted to degrees at this latitude.
pub fn stencil_points(lat: f64, lng: f64) -> [(f64, f64); 5] {
    let d_lat = STENCIL_OFFSET_M / METRES_PER_DEGREE;
    // Longitude degrees shrink with latitude; degenerate at the poles
    let d_lng = STENCIL_OFFSET_M / (METRES_PER_DEGREE * lat.to_radians().cos().max(1e-6));
    [
        (lat, lng),
        (lat + d_lat, lng),
        (lat - d_lat, lng),
        (lat, lng + d_lng),
        (lat, lng - d_lng),
    ]
}

/// Slope in degrees from the `[centre, n, s, e, w]` elevations: the
/// cardinal gradients over the 400 m spans, combined and converted.
pub fn slope_from_stencil(elevations: &[f64; 5]) -> f64 {
    let (n, s, e, w) = (elevations[1], elevations[2], elevations[3], elevations[4]);
    let dz_dx = (e - w) / (2.0 * STENCIL_OFFSET_M);
    let dz_dy = (n - s) / (2.0 * STENCIL_OFFSET_M);
    let gradient = (dz_dx * dz_dx + dz_dy * dz_dy).sqrt();
    round2(gradient.atan().to_degrees())
}

/// Regional elevation estimate (m) for total provider outage.
pub fn estimate_elevation(lat: f64, lng: f64) -> f64 {
    if (28.0..=40.0).contains(&lat) && (75.0..=105.0).contains(&lng) {
        3500.0 // Himalayas
    } else if (8.0..=37.0).contains(&lat) && (68.0..=97.0).contains(&lng) {
        400.0 // Indian subcontinent
    } else if (-55.0..=10.0).contains(&lat) && (-80.0..=-60.0).contains(&lng) {
        1500.0 // Andes
    } else if (30.0..=60.0).contains(&lat) && (-125.0..=-90.0).contains(&lng) {
        700.0 // North America
    } else if (44.0..=48.0).contains(&lat) && (6.0..=16.0).contains(&lng) {
        1200.0 // Alps
    } else {
        150.0 // Coastal / lowland default
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
