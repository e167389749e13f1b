//! External API integrations

pub mod elevation;
pub mod solar;
pub mod summarizer;
pub mod weather;

pub use elevation::ElevationClient;
pub use solar::SolarClient;
pub use summarizer::SummarizerClient;
pub use weather::WeatherClient;
