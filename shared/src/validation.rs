//! Input validation for analysis requests
//!
//! Malformed input is rejected at the HTTP boundary; nothing below the
//! boundary re-validates. A zero electricity rate is deliberately
//! accepted and flows through to the financial engine's infinite
//! payback handling.

use crate::models::AnalyzeRequest;

/// A single failed validation, with the offending field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate latitude is within [-90, 90]
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::new(
            "lat",
            "Latitude must be between -90 and 90",
        ));
    }
    Ok(())
}

/// Validate longitude is within [-180, 180]
pub fn validate_longitude(lng: f64) -> Result<(), ValidationError> {
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(ValidationError::new(
            "lng",
            "Longitude must be between -180 and 180",
        ));
    }
    Ok(())
}

/// Validate the full analysis request
pub fn validate_request(req: &AnalyzeRequest) -> Result<(), ValidationError> {
    validate_latitude(req.lat)?;
    validate_longitude(req.lng)?;

    if !req.plant_size_kw.is_finite() || req.plant_size_kw <= 0.0 {
        return Err(ValidationError::new(
            "plant_size_kw",
            "Plant capacity must be positive",
        ));
    }

    if !req.electricity_rate.is_finite() || req.electricity_rate < 0.0 {
        return Err(ValidationError::new(
            "electricity_rate",
            "Electricity rate cannot be negative",
        ));
    }

    if !req.panel_area.is_finite() || req.panel_area < 0.0 {
        return Err(ValidationError::new(
            "panel_area",
            "Panel area cannot be negative",
        ));
    }

    if !req.efficiency.is_finite() || req.efficiency <= 0.0 || req.efficiency > 1.0 {
        return Err(ValidationError::new(
            "efficiency",
            "Efficiency must be in (0, 1]",
        ));
    }

    if !req.installation_cost.is_finite() || req.installation_cost < 0.0 {
        return Err(ValidationError::new(
            "installation_cost",
            "Installation cost cannot be negative",
        ));
    }

    if let Some(grid) = req.grid_distance_km {
        if !grid.is_finite() || grid < 0.0 {
            return Err(ValidationError::new(
                "grid_distance_km",
                "Grid distance cannot be negative",
            ));
        }
    }

    if let Some(area) = req.available_area_m2 {
        if !area.is_finite() || area < 0.0 {
            return Err(ValidationError::new(
                "available_area_m2",
                "Available area cannot be negative",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> AnalyzeRequest {
        AnalyzeRequest::at(26.92, 70.90, 20.0, 8.0)
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_request(&valid_request()).is_ok());
    }

    #[test]
    fn test_latitude_bounds() {
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(90.001).is_err());
        assert!(validate_latitude(-90.001).is_err());
        assert!(validate_latitude(f64::NAN).is_err());
    }

    #[test]
    fn test_longitude_bounds() {
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(180.0).is_ok());
        assert!(validate_longitude(180.5).is_err());
        assert!(validate_longitude(f64::INFINITY).is_err());
    }

    #[test]
    fn test_zero_plant_size_rejected() {
        let mut req = valid_request();
        req.plant_size_kw = 0.0;
        let err = validate_request(&req).unwrap_err();
        assert_eq!(err.field, "plant_size_kw");
    }

    #[test]
    fn test_negative_plant_size_rejected() {
        let mut req = valid_request();
        req.plant_size_kw = -5.0;
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn test_zero_electricity_rate_accepted() {
        // Zero tariff is a financial boundary case, not invalid input
        let mut req = valid_request();
        req.electricity_rate = 0.0;
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn test_negative_electricity_rate_rejected() {
        let mut req = valid_request();
        req.electricity_rate = -1.0;
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn test_efficiency_range() {
        let mut req = valid_request();
        req.efficiency = 1.0;
        assert!(validate_request(&req).is_ok());
        req.efficiency = 0.0;
        assert!(validate_request(&req).is_err());
        req.efficiency = 1.01;
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn test_negative_optional_fields_rejected() {
        let mut req = valid_request();
        req.grid_distance_km = Some(-1.0);
        assert!(validate_request(&req).is_err());

        let mut req = valid_request();
        req.available_area_m2 = Some(-0.1);
        assert!(validate_request(&req).is_err());

        let mut req = valid_request();
        req.available_area_m2 = Some(0.0);
        assert!(validate_request(&req).is_ok());
    }
}
