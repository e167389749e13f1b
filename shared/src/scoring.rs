//! Multi-factor placement scoring engine
//!
//! Eight normalized factors (Gaussian, sigmoid and step curves) are
//! combined into a weighted 0-100 score, gated by hard constraints and
//! adjusted by the regional calibration delta supplied by the caller.
//! The engine itself is a pure function of its inputs.

use crate::models::{
    AnalyzeRequest, Grade, SiteFeatures, SubScores, SuitabilityClass, Verdict,
};

/// Reported in every verdict and persisted response
pub const ALGORITHM_VERSION: &str = "v3";

/// Land requirement for crystalline silicon, m² per kW
pub const M2_PER_KW: f64 = 8.0;

/// Factor weights; must sum to 1.0
pub const WEIGHTS: [(&str, f64); 8] = [
    ("solar", 0.30),
    ("temperature", 0.10),
    ("elevation", 0.10),
    ("wind", 0.08),
    ("cloud", 0.10),
    ("slope", 0.10),
    ("grid", 0.12),
    ("plant_feasibility", 0.10),
];

/// Headroom multiplier so near-ideal sites can reach the top of the
/// scale despite Gaussian tails never quite touching 1.0
const AGGREGATION_HEADROOM: f64 = 1.05;

/// Score ceiling when any hard constraint is violated
const CONSTRAINT_CAP: u8 = 34;

// Hard constraint thresholds (strict inequalities)
const MIN_SOLAR: f64 = 2.0; // kWh/m²/day
const MAX_SLOPE: f64 = 25.0; // degrees
const MAX_CLOUD: f64 = 90.0; // percent
const MAX_GRID_KM: f64 = 100.0; // km
const MIN_AREA_FRACTION: f64 = 0.4; // of the required land area

// ============================================================================
// Normalization primitives
// ============================================================================

/// Bell curve peaking at 1.0 when `x == optimal`.
pub fn gaussian(x: f64, optimal: f64, spread: f64) -> f64 {
    let z = (x - optimal) / spread;
    (-0.5 * z * z).exp()
}

/// Logistic curve, 0.5 at the midpoint, rising with `x`.
pub fn sigmoid(x: f64, midpoint: f64, steepness: f64) -> f64 {
    1.0 / (1.0 + (-steepness * (x - midpoint)).exp())
}

pub fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// NaN and infinities become the documented default of zero.
fn sanitize(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

// ============================================================================
// Per-factor scores, each in [0, 1]
// ============================================================================

fn score_solar(irradiance: f64) -> f64 {
    gaussian(irradiance, 5.5, 1.5)
}

fn score_temperature(temp_c: f64) -> f64 {
    gaussian(temp_c, 22.0, 8.0)
}

fn score_elevation(elevation_m: f64) -> f64 {
    gaussian(elevation_m, 600.0, 800.0)
}

fn score_wind(wind_speed: f64) -> f64 {
    gaussian(wind_speed, 3.5, 2.0)
}

fn score_cloud(cloud_cover_pct: f64) -> f64 {
    1.0 - sigmoid(cloud_cover_pct, 50.0, 0.06)
}

/// Step table from ground-mount feasibility guidelines.
fn score_slope(slope_degrees: f64) -> f64 {
    if slope_degrees < 5.0 {
        1.00
    } else if slope_degrees < 15.0 {
        0.65
    } else if slope_degrees < 25.0 {
        0.30
    } else {
        0.05
    }
}

fn score_grid(distance_km: f64) -> f64 {
    1.0 - sigmoid(distance_km, 25.0, 0.10)
}

/// Feasibility of the requested capacity on the available land under the
/// local solar resource. With no area constraint the fit ratio is 1.
fn score_plant_feasibility(plant_size_kw: f64, available_area_m2: Option<f64>, irradiance: f64) -> f64 {
    let required_m2 = plant_size_kw * M2_PER_KW;
    let area_ratio = match available_area_m2 {
        Some(area) if area > 0.0 && required_m2 > 0.0 => clamp01(area / required_m2),
        _ => 1.0,
    };
    let irradiance_factor = clamp01(irradiance / 5.5);
    sigmoid(area_ratio * irradiance_factor, 0.5, 6.0)
}

// ============================================================================
// Hard constraints
// ============================================================================

/// Evaluate the hard constraints, returning the canonical violation
/// strings in a fixed order. Empty means all constraints pass.
pub fn check_constraints(features: &SiteFeatures, request: &AnalyzeRequest) -> Vec<String> {
    let mut violations = Vec::new();

    if features.solar_irradiance < MIN_SOLAR {
        violations.push("Solar irradiance insufficient".to_string());
    }

    if features.slope_degrees > MAX_SLOPE {
        violations.push("Terrain unsuitable".to_string());
    }

    if features.cloud_cover_pct > MAX_CLOUD {
        violations.push("Permanent overcast".to_string());
    }

    if features.grid_distance_km > MAX_GRID_KM {
        violations.push("Grid connection unviable".to_string());
    }

    // Only checked when the caller supplied a usable area figure
    if let Some(area) = request.available_area_m2 {
        let required_m2 = request.plant_size_kw * M2_PER_KW;
        if area > 0.0 && area < MIN_AREA_FRACTION * required_m2 {
            violations.push("Insufficient land area".to_string());
        }
    }

    violations
}

// ============================================================================
// Confidence
// ============================================================================

/// Confidence (0-100) from factor agreement, data source quality and
/// input plausibility.
pub fn calculate_confidence(sub_scores: &SubScores, features: &SiteFeatures) -> f64 {
    let scores = sub_scores.as_array();
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

    // 2500 is the variance of sub-scores spread evenly over 0-100
    let agreement = clamp01(1.0 - variance / 2500.0);

    let source_quality = clamp01(f64::from(features.data_sources) / 4.0);

    let mut penalties = 0.0;
    if !(0.0..=10.0).contains(&features.solar_irradiance) {
        penalties += 0.25;
    }
    if !(0.0..=90.0).contains(&features.slope_degrees) {
        penalties += 0.25;
    }
    if !(0.0..=100.0).contains(&features.cloud_cover_pct) {
        penalties += 0.25;
    }
    if !(0.0..=100.0).contains(&features.humidity_pct) {
        penalties += 0.25;
    }
    let plausibility = clamp01(1.0 - penalties);

    let confidence = clamp01(0.50 * agreement + 0.30 * source_quality + 0.20 * plausibility);
    round1(confidence * 100.0)
}

// ============================================================================
// Main entry point
// ============================================================================

/// Score a location. `calibration_adjustment` is the signed regional
/// delta to add to the raw score; it is bounded to ±10 here regardless
/// of what the caller learned.
pub fn evaluate(
    features: &SiteFeatures,
    request: &AnalyzeRequest,
    calibration_adjustment: f64,
) -> Verdict {
    let violations = check_constraints(features, request);

    let factors = [
        sanitize(score_solar(features.solar_irradiance)),
        sanitize(score_temperature(features.temperature_c)),
        sanitize(score_elevation(features.elevation_m)),
        sanitize(score_wind(features.wind_speed)),
        sanitize(score_cloud(features.cloud_cover_pct)),
        sanitize(score_slope(features.slope_degrees)),
        sanitize(score_grid(features.grid_distance_km)),
        sanitize(score_plant_feasibility(
            request.plant_size_kw,
            request.available_area_m2,
            features.solar_irradiance,
        )),
    ];

    let sub_scores = SubScores {
        solar: round1(factors[0] * 100.0),
        temperature: round1(factors[1] * 100.0),
        elevation: round1(factors[2] * 100.0),
        wind: round1(factors[3] * 100.0),
        cloud: round1(factors[4] * 100.0),
        slope: round1(factors[5] * 100.0),
        grid: round1(factors[6] * 100.0),
        plant_feasibility: round1(factors[7] * 100.0),
    };

    let weighted: f64 = WEIGHTS
        .iter()
        .zip(factors.iter())
        .map(|((_, w), f)| w * f)
        .sum();

    let raw_score = (weighted * AGGREGATION_HEADROOM * 100.0).clamp(0.0, 100.0);

    let adjustment = sanitize(calibration_adjustment).clamp(-10.0, 10.0);
    let mut score = (raw_score + adjustment).clamp(0.0, 100.0).round() as u8;
    if !violations.is_empty() {
        score = score.min(CONSTRAINT_CAP);
    }

    let grade = Grade::from_score(score);
    let suitability_class = if violations.is_empty() {
        SuitabilityClass::from_grade(grade)
    } else {
        SuitabilityClass::Unsuitable
    };

    let confidence = calculate_confidence(&sub_scores, features);
    let is_suitable = score >= 50 && violations.is_empty();

    Verdict {
        score,
        grade,
        suitability_class,
        confidence,
        recommendation: recommendation(grade).to_string(),
        constraint_violations: violations,
        is_suitable,
        sub_scores,
        calibration_adjustment: round2(adjustment),
        algorithm_version: ALGORITHM_VERSION.to_string(),
    }
}

/// One-sentence recommendation keyed by grade.
pub fn recommendation(grade: Grade) -> &'static str {
    match grade {
        Grade::APlus => {
            "Exceptional site: top-tier solar resource with maximum expected return and minimal risk."
        }
        Grade::A => {
            "Highly recommended: excellent solar potential with fast payback and strong lifetime returns."
        }
        Grade::BPlus => "Recommended: good conditions for a solar installation with solid returns.",
        Grade::B => "Promising: above-average potential where a standard installation will be profitable.",
        Grade::C => "Moderate: acceptable conditions; premium panels would improve the yield.",
        Grade::D => "Marginal: limited potential; evaluate shading and panel orientation before committing.",
        Grade::F => "Not recommended: poor solar resource with high investment risk.",
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desert_features() -> SiteFeatures {
        SiteFeatures {
            solar_irradiance: 6.5,
            wind_speed: 3.5,
            temperature_c: 34.0,
            humidity_pct: 35.0,
            cloud_cover_pct: 20.0,
            elevation_m: 250.0,
            slope_degrees: 2.0,
            grid_distance_km: 8.0,
            data_sources: 4,
        }
    }

    fn desert_request() -> AnalyzeRequest {
        let mut req = AnalyzeRequest::at(26.92, 70.90, 20.0, 8.0);
        req.available_area_m2 = Some(200.0);
        req
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_gaussian_peaks_at_optimal() {
        assert!((gaussian(5.5, 5.5, 1.5) - 1.0).abs() < 1e-12);
        assert!(gaussian(4.0, 5.5, 1.5) < 1.0);
        assert!(gaussian(7.0, 5.5, 1.5) < 1.0);
    }

    #[test]
    fn test_sigmoid_midpoint_is_half() {
        assert!((sigmoid(50.0, 50.0, 0.06) - 0.5).abs() < 1e-12);
        assert!(sigmoid(100.0, 50.0, 0.06) > 0.9);
        assert!(sigmoid(0.0, 50.0, 0.06) < 0.1);
    }

    #[test]
    fn test_slope_step_table() {
        assert_eq!(score_slope(0.0), 1.00);
        assert_eq!(score_slope(4.99), 1.00);
        assert_eq!(score_slope(5.0), 0.65);
        assert_eq!(score_slope(14.99), 0.65);
        assert_eq!(score_slope(15.0), 0.30);
        assert_eq!(score_slope(25.0), 0.05);
        assert_eq!(score_slope(40.0), 0.05);
    }

    #[test]
    fn test_desert_site_scores_excellent() {
        let verdict = evaluate(&desert_features(), &desert_request(), 0.0);
        assert!(verdict.score >= 85, "score was {}", verdict.score);
        assert!(matches!(verdict.grade, Grade::APlus | Grade::A));
        assert_eq!(verdict.suitability_class, SuitabilityClass::Excellent);
        assert!(verdict.constraint_violations.is_empty());
        assert!(verdict.is_suitable);
    }

    #[test]
    fn test_arctic_site_rejected_on_irradiance() {
        let mut features = desert_features();
        features.solar_irradiance = 1.4;
        features.cloud_cover_pct = 80.0;
        features.slope_degrees = 3.0;
        let req = AnalyzeRequest::at(69.0, 19.0, 20.0, 8.0);

        let verdict = evaluate(&features, &req, 0.0);
        assert!(!verdict.is_suitable);
        assert!(verdict
            .constraint_violations
            .iter()
            .any(|v| v == "Solar irradiance insufficient"));
        assert!(verdict.score <= 34);
        assert_eq!(verdict.suitability_class, SuitabilityClass::Unsuitable);
    }

    #[test]
    fn test_steep_terrain_rejected() {
        let mut features = desert_features();
        features.slope_degrees = 30.0;
        let verdict = evaluate(&features, &desert_request(), 0.0);
        assert!(verdict
            .constraint_violations
            .iter()
            .any(|v| v == "Terrain unsuitable"));
        assert_eq!(verdict.suitability_class, SuitabilityClass::Unsuitable);
        assert!(verdict.score <= 34);
    }

    #[test]
    fn test_constraint_boundaries_are_strict() {
        // Exactly at the thresholds nothing is violated
        let mut features = desert_features();
        features.solar_irradiance = 2.0;
        features.slope_degrees = 25.0;
        features.cloud_cover_pct = 90.0;
        features.grid_distance_km = 100.0;
        let violations = check_constraints(&features, &desert_request());
        assert!(violations.is_empty(), "violations: {violations:?}");
    }

    #[test]
    fn test_insufficient_area_violation() {
        let mut req = desert_request();
        // 20 kW needs 160 m²; below 40% of that is a hard stop
        req.available_area_m2 = Some(60.0);
        let violations = check_constraints(&desert_features(), &req);
        assert!(violations.iter().any(|v| v == "Insufficient land area"));

        req.available_area_m2 = Some(64.0); // exactly 40%
        let violations = check_constraints(&desert_features(), &req);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_area_not_checked_when_missing() {
        let mut req = desert_request();
        req.available_area_m2 = None;
        assert!(check_constraints(&desert_features(), &req).is_empty());

        req.available_area_m2 = Some(0.0);
        assert!(check_constraints(&desert_features(), &req).is_empty());
    }

    #[test]
    fn test_overcast_and_remote_grid_violations() {
        let mut features = desert_features();
        features.cloud_cover_pct = 95.0;
        features.grid_distance_km = 150.0;
        let violations = check_constraints(&features, &desert_request());
        assert!(violations.iter().any(|v| v == "Permanent overcast"));
        assert!(violations.iter().any(|v| v == "Grid connection unviable"));
    }

    #[test]
    fn test_calibration_adjustment_bounded() {
        let verdict = evaluate(&desert_features(), &desert_request(), 25.0);
        assert!((verdict.calibration_adjustment - 10.0).abs() < 1e-9);
        let verdict = evaluate(&desert_features(), &desert_request(), -25.0);
        assert!((verdict.calibration_adjustment + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_adjustment_shifts_score() {
        let base = evaluate(&desert_features(), &desert_request(), 0.0);
        let down = evaluate(&desert_features(), &desert_request(), -5.0);
        assert_eq!(i32::from(base.score) - i32::from(down.score), 5);
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let a = evaluate(&desert_features(), &desert_request(), 1.5);
        let b = evaluate(&desert_features(), &desert_request(), 1.5);
        assert_eq!(a.score, b.score);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.sub_scores.as_array(), b.sub_scores.as_array());
        assert_eq!(a.constraint_violations, b.constraint_violations);
    }

    #[test]
    fn test_nan_inputs_do_not_panic_or_leak() {
        let mut features = desert_features();
        features.wind_speed = f64::NAN;
        features.elevation_m = f64::INFINITY;
        let verdict = evaluate(&features, &desert_request(), f64::NAN);
        assert!(verdict.score <= 100);
        assert!(verdict.sub_scores.wind.is_finite());
        assert!(verdict.sub_scores.elevation.is_finite());
        assert_eq!(verdict.calibration_adjustment, 0.0);
    }

    #[test]
    fn test_confidence_in_range_and_source_sensitive() {
        let full = calculate_confidence(
            &evaluate(&desert_features(), &desert_request(), 0.0).sub_scores,
            &desert_features(),
        );
        let mut degraded = desert_features();
        degraded.data_sources = 0;
        let none = calculate_confidence(
            &evaluate(&degraded, &desert_request(), 0.0).sub_scores,
            &degraded,
        );
        assert!((0.0..=100.0).contains(&full));
        assert!((0.0..=100.0).contains(&none));
        assert!(none < full);
    }

    #[test]
    fn test_plausibility_penalty_lowers_confidence() {
        let mut features = desert_features();
        features.solar_irradiance = 14.0; // physically implausible
        let normal = evaluate(&desert_features(), &desert_request(), 0.0);
        let odd = evaluate(&features, &desert_request(), 0.0);
        assert!(odd.confidence < normal.confidence);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(Grade::from_score(100), Grade::APlus);
        assert_eq!(Grade::from_score(88), Grade::APlus);
        assert_eq!(Grade::from_score(87), Grade::A);
        assert_eq!(Grade::from_score(78), Grade::A);
        assert_eq!(Grade::from_score(77), Grade::BPlus);
        assert_eq!(Grade::from_score(68), Grade::BPlus);
        assert_eq!(Grade::from_score(67), Grade::B);
        assert_eq!(Grade::from_score(58), Grade::B);
        assert_eq!(Grade::from_score(57), Grade::C);
        assert_eq!(Grade::from_score(47), Grade::C);
        assert_eq!(Grade::from_score(46), Grade::D);
        assert_eq!(Grade::from_score(35), Grade::D);
        assert_eq!(Grade::from_score(34), Grade::F);
        assert_eq!(Grade::from_score(0), Grade::F);
    }

    #[test]
    fn test_every_grade_has_a_recommendation() {
        for grade in [
            Grade::APlus,
            Grade::A,
            Grade::BPlus,
            Grade::B,
            Grade::C,
            Grade::D,
            Grade::F,
        ] {
            assert!(!recommendation(grade).is_empty());
        }
    }
}
