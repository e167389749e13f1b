//! AI summarizer client
//!
//! Generates the natural-language site summary through a generative
//! language API, trying models in order of preference. The scoring
//! pipeline never depends on this succeeding: a deterministic template
//! derived from the grade and the top constraint violation always
//! exists.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{Grade, SuitabilityClass};

use crate::error::{AppError, AppResult};

/// Model identifiers tried in order of preference
const MODEL_PREFERENCE: [&str; 3] = [
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
    "gemini-1.5-flash",
];

/// Provider tag for a summary produced without any API configured
pub const TEMPLATE_PROVIDER: &str = "template";

/// Provider tag when the live summarizer failed or timed out
pub const FALLBACK_PROVIDER: &str = "fallback-template";

/// Compact prompt view of one analysis, enough for a summary
#[derive(Debug, Clone)]
pub struct SummaryContext {
    pub lat: f64,
    pub lng: f64,
    pub score: u8,
    pub grade: Grade,
    pub suitability_class: SuitabilityClass,
    pub top_violation: Option<String>,
    pub solar_irradiance: f64,
    pub wind_speed: f64,
    pub elevation_m: f64,
    pub payback_years: f64,
    pub annual_savings: f64,
}

/// A generated summary with the provider that produced it
#[derive(Debug, Clone)]
pub struct Summary {
    pub text: String,
    pub provider: String,
}

/// Generative API client
#[derive(Clone)]
pub struct SummarizerClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

impl SummarizerClient {
    /// Create a new SummarizerClient
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Generate a summary. Without an API key the deterministic
    /// template is used directly; with one, models are tried in order
    /// and an error is returned only when all of them fail.
    pub async fn summarize(&self, ctx: &SummaryContext) -> AppResult<Summary> {
        if !self.is_configured() {
            tracing::info!("summarizer not configured, using template summary");
            return Ok(Summary {
                text: template_summary(ctx),
                provider: TEMPLATE_PROVIDER.to_string(),
            });
        }

        let prompt = build_prompt(ctx);
        let mut last_err: Option<anyhow::Error> = None;

        for model in MODEL_PREFERENCE {
            match self.generate(model, &prompt).await {
                Ok(text) => {
                    tracing::info!("summary generated via {model}");
                    return Ok(Summary {
                        text,
                        provider: model.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("summarizer model {model} failed: {e}");
                    last_err = Some(e);
                }
            }
        }

        Err(AppError::SummarizerUnavailable(
            last_err
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no models configured".to_string()),
        ))
    }

    async fn generate(&self, model: &str, prompt: &str) -> anyhow::Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let data: GenerateResponse = response.json().await?;
        data.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow::anyhow!("empty candidate response"))
    }
}

fn build_prompt(ctx: &SummaryContext) -> String {
    let violation_note = match &ctx.top_violation {
        Some(v) => format!("\nHard constraint violated: {v}"),
        None => String::new(),
    };
    format!(
        "You are an expert in renewable energy site evaluation.\n\n\
         Analyze this location and provide a concise (3-4 sentence), professional and \
         actionable recommendation for a solar installation.\n\n\
         Location: {:.4}, {:.4}\n\
         Placement Score: {}/100 (grade {})\n\
         Payback Period: {:.1} years\n\
         Solar Irradiance: {:.2} kWh/m²/day\n\
         Wind Speed: {:.1} m/s\n\
         Elevation: {:.0} m\n\
         Estimated Annual Savings: {:.0}{violation_note}\n\n\
         Address the site suitability, the key factor driving the score, practical \
         advice for maximizing yield, and the investment outlook. Keep it concise and data-driven.",
        ctx.lat,
        ctx.lng,
        ctx.score,
        ctx.grade,
        ctx.payback_years,
        ctx.solar_irradiance,
        ctx.wind_speed,
        ctx.elevation_m,
        ctx.annual_savings,
    )
}

/// Deterministic rule-based summary used whenever the live summarizer
/// is unavailable. Pure function of the context.
pub fn template_summary(ctx: &SummaryContext) -> String {
    if let Some(violation) = &ctx.top_violation {
        return format!(
            "This location is not suitable for a solar installation (score: {}/100, class: {}). \
             Blocking issue: {}. Consider a different site or a smaller system.",
            ctx.score, ctx.suitability_class, violation
        );
    }

    let (suitability, outlook) = match ctx.suitability_class {
        SuitabilityClass::Excellent => ("an excellent", "The investment outlook is very strong"),
        SuitabilityClass::Good => ("a good", "The investment outlook is favorable"),
        SuitabilityClass::Moderate => ("a moderate", "The investment outlook is acceptable"),
        SuitabilityClass::Poor | SuitabilityClass::Unsuitable => (
            "a below-average",
            "Consider alternative sites for better returns",
        ),
    };

    let payback_note = if ctx.payback_years.is_finite() {
        format!(
            "a payback period of approximately {:.1} years",
            ctx.payback_years
        )
    } else {
        "no payback at the current tariff".to_string()
    };

    format!(
        "This location has {suitability} solar energy potential (score: {}/100, grade {}) \
         with solar irradiance of {:.1} kWh/m²/day and wind speed of {:.1} m/s. \
         Estimated annual savings of {:.0} give {payback_note}. \
         {outlook}.",
        ctx.score, ctx.grade, ctx.solar_irradiance, ctx.wind_speed, ctx.annual_savings,
    )
}
