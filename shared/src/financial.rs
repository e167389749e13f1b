//! Capacity-first financial engine
//!
//! Sizes the system from the requested capacity (or from panel area in
//! the legacy path), projects energy yield with a lumped performance
//! ratio, models 25-year returns with annual panel degradation, and
//! applies the tiered residential subsidy schedule.

use crate::models::{FinancialInputs, FinancialProjection, TariffPoint};
use crate::scoring::M2_PER_KW;

pub const SYSTEM_LIFETIME_YEARS: u32 = 25;
/// Annual fractional decrease in panel output
pub const DEGRADATION_RATE: f64 = 0.005;
const DAYS_PER_YEAR: f64 = 365.0;
/// Benchmark installed cost per kW, currency units
pub const COST_PER_KW: f64 = 50_000.0;
/// Lumped performance ratio: inverter, wiring, soiling, temperature derate
pub const PERFORMANCE_RATIO: f64 = 0.80;

/// Residential subsidy cap: systems above this size receive nothing
const SUBSIDY_MAX_KWP: f64 = 10.0;

/// Piecewise-constant subsidy schedule as sorted (upper bound kWp, amount)
const SUBSIDY_TIERS: [(f64, f64); 4] = [
    (1.0, 30_000.0),
    (2.0, 60_000.0),
    (3.0, 78_000.0),
    (SUBSIDY_MAX_KWP, 78_000.0),
];

// Net metering assumptions for rooftop systems
const SELF_CONSUMPTION_SHARE: f64 = 0.70;
const EXPORT_RATE_SHARE: f64 = 0.50;

/// Subsidy amount for a system of the given nameplate size.
pub fn subsidy_for(system_kwp: f64) -> f64 {
    for (upper_bound, amount) in SUBSIDY_TIERS {
        if system_kwp <= upper_bound {
            return amount;
        }
    }
    0.0
}

/// Payback period in years; infinite when there are no savings.
/// Left unrounded so the cost/savings identity holds exactly.
fn payback(cost: f64, annual_savings: f64) -> f64 {
    if annual_savings > 0.0 {
        cost / annual_savings
    } else {
        f64::INFINITY
    }
}

/// Run the financial projection.
pub fn project(inputs: &FinancialInputs) -> FinancialProjection {
    let irradiance = inputs.solar_irradiance;

    let (system_kwp, required_land_m2, annual_energy_kwh, auto_cost) = match inputs.plant_size_kw {
        Some(kw) if kw > 0.0 => {
            // Capacity-first: kW × irradiance (kWh/m²/d) × days × performance ratio
            let annual = kw * irradiance * DAYS_PER_YEAR * PERFORMANCE_RATIO;
            (kw, kw * M2_PER_KW, round1(annual), kw * COST_PER_KW)
        }
        _ => {
            // Legacy area-first sizing
            let annual = inputs.panel_area * inputs.efficiency * irradiance * DAYS_PER_YEAR;
            let kwp = round2(inputs.panel_area * inputs.efficiency);
            (
                kwp,
                inputs.panel_area,
                round1(annual),
                inputs.panel_area * COST_PER_KW / M2_PER_KW,
            )
        }
    };

    let installation_cost = if inputs.installation_cost > 0.0 {
        inputs.installation_cost
    } else {
        auto_cost
    };

    let annual_savings = round2(annual_energy_kwh * inputs.electricity_rate);
    let monthly_savings = round2(annual_savings / 12.0);
    let daily_savings = round2(annual_savings / DAYS_PER_YEAR);

    let payback_years = payback(installation_cost, annual_savings);

    // Degradation-aware lifetime yield
    let lifetime_energy_kwh: f64 = (0..SYSTEM_LIFETIME_YEARS)
        .map(|year| annual_energy_kwh * (1.0 - DEGRADATION_RATE).powi(year as i32))
        .sum();
    // Unrounded so the geometric-series identity holds exactly
    let lifetime_savings = lifetime_energy_kwh * inputs.electricity_rate;
    let lifetime_profit = lifetime_savings - installation_cost;

    // Residential subsidy
    let subsidy_amount = if system_kwp <= SUBSIDY_MAX_KWP {
        subsidy_for(system_kwp)
    } else {
        0.0
    };
    let net_cost_after_subsidy = (installation_cost - subsidy_amount).max(0.0);
    let payback_years_after_subsidy = payback(net_cost_after_subsidy, annual_savings);
    let lifetime_profit_after_subsidy = lifetime_savings - net_cost_after_subsidy;

    // Net metering split of the annual yield
    let self_consumed_kwh = round1(annual_energy_kwh * SELF_CONSUMPTION_SHARE);
    let exported_kwh = round1(annual_energy_kwh * (1.0 - SELF_CONSUMPTION_SHARE));
    let self_saved = self_consumed_kwh * inputs.electricity_rate;
    let export_credit = round2(exported_kwh * inputs.electricity_rate * EXPORT_RATE_SHARE);
    let net_metering_annual_benefit = round2(self_saved + export_credit);
    let net_metering_payback_years = payback(installation_cost, net_metering_annual_benefit);

    FinancialProjection {
        annual_energy_kwh,
        annual_savings,
        monthly_savings,
        daily_savings,
        installation_cost: round2(installation_cost),
        payback_years,
        lifetime_profit,
        system_lifetime_years: SYSTEM_LIFETIME_YEARS,
        system_size_kwp: round2(system_kwp),
        required_land_area_m2: round1(required_land_m2),
        subsidy_amount,
        net_cost_after_subsidy: round2(net_cost_after_subsidy),
        payback_years_after_subsidy,
        lifetime_profit_after_subsidy,
        self_consumed_kwh,
        exported_kwh,
        export_credit,
        net_metering_annual_benefit,
        net_metering_payback_years,
    }
}

/// Annual savings and payback at each tariff on the ladder.
pub fn tariff_sensitivity(
    solar_irradiance: f64,
    plant_size_kw: f64,
    installation_cost: f64,
    tariff_rates: &[f64],
) -> Vec<TariffPoint> {
    let annual_energy = plant_size_kw * solar_irradiance * DAYS_PER_YEAR * PERFORMANCE_RATIO;
    tariff_rates
        .iter()
        .map(|&rate| {
            let savings = (annual_energy * rate).round();
            TariffPoint {
                tariff_rate: rate,
                annual_savings: savings,
                payback_years: payback(installation_cost, savings),
            }
        })
        .collect()
}

/// Default tariff ladder for the sensitivity chart
pub const DEFAULT_TARIFF_RATES: [f64; 9] = [4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 12.0, 15.0];

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity_inputs(kw: f64, irradiance: f64, rate: f64) -> FinancialInputs {
        FinancialInputs {
            solar_irradiance: irradiance,
            electricity_rate: rate,
            plant_size_kw: Some(kw),
            panel_area: 80.0,
            efficiency: 0.20,
            installation_cost: 0.0,
        }
    }

    #[test]
    fn test_desert_plant_yield_and_payback() {
        let projection = project(&capacity_inputs(20.0, 6.5, 8.0));
        // 20 kW × 6.5 × 365 × 0.80
        assert!((projection.annual_energy_kwh - 37_960.0).abs() < 0.5);
        assert!((projection.installation_cost - 1_000_000.0).abs() < 1e-6);
        assert!((projection.payback_years - 3.2929).abs() < 0.001);
        // Above the residential cap
        assert_eq!(projection.subsidy_amount, 0.0);
        assert!((projection.required_land_area_m2 - 160.0).abs() < 1e-9);
        assert!((projection.system_size_kwp - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_residential_subsidy_applied() {
        let projection = project(&capacity_inputs(3.0, 6.5, 8.0));
        assert_eq!(projection.subsidy_amount, 78_000.0);
        assert!((projection.installation_cost - 150_000.0).abs() < 1e-6);
        assert!((projection.net_cost_after_subsidy - 72_000.0).abs() < 1e-6);
        assert!(projection.payback_years_after_subsidy < projection.payback_years);
        assert!(projection.lifetime_profit_after_subsidy > projection.lifetime_profit);
    }

    #[test]
    fn test_subsidy_schedule() {
        assert_eq!(subsidy_for(0.5), 30_000.0);
        assert_eq!(subsidy_for(1.0), 30_000.0);
        assert_eq!(subsidy_for(1.5), 60_000.0);
        assert_eq!(subsidy_for(2.0), 60_000.0);
        assert_eq!(subsidy_for(2.5), 78_000.0);
        assert_eq!(subsidy_for(3.0), 78_000.0);
        assert_eq!(subsidy_for(7.0), 78_000.0);
        assert_eq!(subsidy_for(10.0), 78_000.0);
        assert_eq!(subsidy_for(10.01), 0.0);
        assert_eq!(subsidy_for(20.0), 0.0);
    }

    #[test]
    fn test_subsidy_constant_within_tier() {
        // Doubling inside the >3 kWp flat tier never increases the subsidy
        let small = project(&capacity_inputs(4.0, 5.5, 8.0));
        let large = project(&capacity_inputs(8.0, 5.5, 8.0));
        assert!(large.subsidy_amount <= small.subsidy_amount);
    }

    #[test]
    fn test_zero_rate_gives_infinite_payback() {
        let projection = project(&capacity_inputs(10.0, 5.5, 0.0));
        assert!(projection.payback_years.is_infinite());
        assert!(projection.net_metering_payback_years.is_infinite());
        assert_eq!(projection.annual_savings, 0.0);
        // Lifetime profit degenerates to the negated cost
        assert!((projection.lifetime_profit + projection.installation_cost).abs() < 1e-6);
    }

    #[test]
    fn test_payback_identity() {
        let projection = project(&capacity_inputs(12.0, 5.1, 7.3));
        let expected = projection.installation_cost / projection.annual_savings;
        let rel = (projection.payback_years - expected).abs() / expected;
        assert!(rel < 1e-9, "relative error {rel}");
    }

    #[test]
    fn test_degradation_matches_geometric_series() {
        let projection = project(&capacity_inputs(10.0, 5.5, 8.0));
        let annual = projection.annual_energy_kwh;
        let q: f64 = 1.0 - DEGRADATION_RATE;
        let closed_form = annual * (1.0 - q.powi(SYSTEM_LIFETIME_YEARS as i32)) / (1.0 - q);
        let lifetime_savings = projection.lifetime_profit + projection.installation_cost;
        let expected = closed_form * 8.0;
        let rel = (lifetime_savings - expected).abs() / expected;
        assert!(rel < 1e-6, "relative error {rel}");
    }

    #[test]
    fn test_supplied_cost_is_honoured() {
        let mut inputs = capacity_inputs(10.0, 5.5, 8.0);
        inputs.installation_cost = 420_000.0;
        let projection = project(&inputs);
        assert!((projection.installation_cost - 420_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_area_first_mode() {
        let inputs = FinancialInputs {
            solar_irradiance: 5.0,
            electricity_rate: 8.0,
            plant_size_kw: None,
            panel_area: 100.0,
            efficiency: 0.20,
            installation_cost: 0.0,
        };
        let projection = project(&inputs);
        // 100 m² × 0.20 × 5.0 × 365
        assert!((projection.annual_energy_kwh - 36_500.0).abs() < 0.5);
        assert!((projection.system_size_kwp - 20.0).abs() < 1e-9);
        assert!((projection.installation_cost - 625_000.0).abs() < 1e-6);
        assert!((projection.required_land_area_m2 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_net_metering_split() {
        let projection = project(&capacity_inputs(10.0, 5.5, 8.0));
        let total = projection.self_consumed_kwh + projection.exported_kwh;
        assert!((total - projection.annual_energy_kwh).abs() < 0.2);
        // Export pays half the retail rate, so the blended benefit is lower
        assert!(projection.net_metering_annual_benefit < projection.annual_savings);
        assert!(projection.net_metering_payback_years > projection.payback_years);
    }

    #[test]
    fn test_tariff_sensitivity_monotonic() {
        let table = tariff_sensitivity(5.5, 10.0, 500_000.0, &DEFAULT_TARIFF_RATES);
        assert_eq!(table.len(), DEFAULT_TARIFF_RATES.len());
        for pair in table.windows(2) {
            assert!(pair[1].annual_savings > pair[0].annual_savings);
            assert!(pair[1].payback_years < pair[0].payback_years);
        }
    }
}
