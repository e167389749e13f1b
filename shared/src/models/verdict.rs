//! Placement verdict models

use serde::{Deserialize, Serialize};

/// Letter grade for a placement score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

impl Grade {
    /// Grade from a final 0-100 score.
    pub fn from_score(score: u8) -> Self {
        match score {
            88..=100 => Grade::APlus,
            78..=87 => Grade::A,
            68..=77 => Grade::BPlus,
            58..=67 => Grade::B,
            47..=57 => Grade::C,
            35..=46 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse suitability label derived from the grade
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SuitabilityClass {
    Excellent,
    Good,
    Moderate,
    Poor,
    Unsuitable,
}

impl SuitabilityClass {
    pub fn from_grade(grade: Grade) -> Self {
        match grade {
            Grade::APlus | Grade::A => SuitabilityClass::Excellent,
            Grade::BPlus | Grade::B => SuitabilityClass::Good,
            Grade::C => SuitabilityClass::Moderate,
            Grade::D => SuitabilityClass::Poor,
            Grade::F => SuitabilityClass::Unsuitable,
        }
    }
}

impl std::fmt::Display for SuitabilityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SuitabilityClass::Excellent => "Excellent",
            SuitabilityClass::Good => "Good",
            SuitabilityClass::Moderate => "Moderate",
            SuitabilityClass::Poor => "Poor",
            SuitabilityClass::Unsuitable => "Unsuitable",
        };
        f.write_str(s)
    }
}

/// Per-factor sub-scores on the 0-100 display scale.
///
/// Every weighted factor has exactly one field here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubScores {
    pub solar: f64,
    pub temperature: f64,
    pub elevation: f64,
    pub wind: f64,
    pub cloud: f64,
    pub slope: f64,
    pub grid: f64,
    pub plant_feasibility: f64,
}

impl SubScores {
    pub fn as_array(&self) -> [f64; 8] {
        [
            self.solar,
            self.temperature,
            self.elevation,
            self.wind,
            self.cloud,
            self.slope,
            self.grid,
            self.plant_feasibility,
        ]
    }
}

/// Scoring engine output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Final placement score (0-100, calibrated, constraint-capped)
    pub score: u8,
    pub grade: Grade,
    pub suitability_class: SuitabilityClass,
    /// Self-estimated confidence (0-100)
    pub confidence: f64,
    pub recommendation: String,
    /// Human-readable hard-constraint violations; empty when all pass
    pub constraint_violations: Vec<String>,
    /// score >= 50 and no constraint violations
    pub is_suitable: bool,
    pub sub_scores: SubScores,
    /// Regional calibration delta applied to the raw score
    pub calibration_adjustment: f64,
    pub algorithm_version: String,
}
