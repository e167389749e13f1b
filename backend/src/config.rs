//! Configuration management for the Solar Placement Scoring platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SPS_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// External data provider configuration
    pub providers: ProviderConfig,

    /// AI summarizer configuration
    pub summarizer: SummarizerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,

    /// Soft per-request deadline; exceeding it is logged
    pub soft_deadline_secs: u64,

    /// Hard per-request deadline; exceeding it fails with 504
    pub hard_deadline_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Solar irradiance API base URL (daily and climatology endpoints)
    pub solar_base_url: String,

    /// Weather API base URL
    pub weather_base_url: String,

    /// Primary elevation API base URL (batch GET)
    pub elevation_base_url: String,

    /// Primary elevation API key; empty skips straight to the secondary
    pub elevation_api_key: String,

    /// Secondary elevation API base URL (batch POST)
    pub elevation_fallback_url: String,

    /// Hard timeout applied independently to each provider fetch
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SummarizerConfig {
    /// Generative API base URL
    pub base_url: String,

    /// API key; empty selects the deterministic template
    pub api_key: String,

    /// Deadline for one summary generation
    pub deadline_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("SPS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.soft_deadline_secs", 30)?
            .set_default("server.hard_deadline_secs", 60)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default(
                "providers.solar_base_url",
                "https://power.larc.nasa.gov/api/temporal",
            )?
            .set_default(
                "providers.weather_base_url",
                "https://api.open-meteo.com/v1",
            )?
            .set_default(
                "providers.elevation_base_url",
                "https://maps.googleapis.com/maps/api/elevation/json",
            )?
            .set_default("providers.elevation_api_key", "")?
            .set_default(
                "providers.elevation_fallback_url",
                "https://api.open-elevation.com/api/v1/lookup",
            )?
            .set_default("providers.timeout_secs", 8)?
            .set_default(
                "summarizer.base_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("summarizer.api_key", "")?
            .set_default("summarizer.deadline_secs", 5)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SPS_ prefix)
            .add_source(
                Environment::with_prefix("SPS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
