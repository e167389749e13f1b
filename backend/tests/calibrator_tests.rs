//! Regional calibrator tests
//!
//! Covers the EMA convergence bound, the minimum-sample gate, the
//! warm-up replay equivalence and the bounded delta.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use sps_server::services::calibrator::{region_key, HistoricObservation, RegionalCalibrator};

const EMA_ALPHA: f64 = 0.12;

/// A calibrator that has completed (empty) warm-up and is live
fn warmed() -> RegionalCalibrator {
    let calibrator = RegionalCalibrator::new();
    calibrator.warm_up(Vec::new());
    calibrator
}

// ============================================================================
// Region bucketing
// ============================================================================

mod bucketing {
    use super::*;

    #[test]
    fn five_degree_cells() {
        assert_eq!(region_key(26.92, 70.90), (25, 70));
        assert_eq!(region_key(0.0, 0.0), (0, 0));
        assert_eq!(region_key(4.99, 4.99), (0, 0));
        assert_eq!(region_key(5.0, 5.0), (5, 5));
        assert_eq!(region_key(-0.1, -0.1), (-5, -5));
        assert_eq!(region_key(-90.0, -180.0), (-90, -180));
        assert_eq!(region_key(89.9, 179.9), (85, 175));
    }

    #[test]
    fn nearby_points_share_a_cell() {
        assert_eq!(region_key(26.1, 70.2), region_key(27.9, 74.8));
        assert_ne!(region_key(26.1, 70.2), region_key(26.1, 75.2));
    }
}

// ============================================================================
// EMA behaviour
// ============================================================================

mod ema {
    use super::*;

    /// After N identical observations the cell EMA approaches the value
    /// with error bounded by (1-alpha)^N times the value.
    #[test]
    fn converges_with_bounded_error() {
        let calibrator = warmed();
        let value = 90.0;
        for n in 1..=40u32 {
            calibrator.observe(26.0, 71.0, value);
            let ema = calibrator.cell_ema(26.0, 71.0);
            let bound = (1.0 - EMA_ALPHA).powi(n as i32) * value;
            assert!(
                (ema - value).abs() <= bound + 1e-9,
                "n={n}: |{ema} - {value}| > {bound}"
            );
        }
    }

    /// Fewer than five samples in a cell always yields a zero delta
    #[test]
    fn thin_cells_return_zero() {
        let calibrator = warmed();
        for _ in 0..4 {
            calibrator.observe(26.0, 71.0, 95.0);
        }
        // Push the global EMA elsewhere so a delta would exist
        for _ in 0..20 {
            calibrator.observe(50.0, 10.0, 40.0);
        }
        assert_eq!(calibrator.cell_samples(26.0, 71.0), 4);
        assert_eq!(calibrator.delta(26.0, 71.0), 0.0);

        calibrator.observe(26.0, 71.0, 95.0);
        assert_eq!(calibrator.cell_samples(26.0, 71.0), 5);
        assert!(calibrator.delta(26.0, 71.0) != 0.0);
    }

    /// Before warm-up completes, delta is always zero
    #[test]
    fn cold_calibrator_returns_zero() {
        let calibrator = RegionalCalibrator::new();
        for _ in 0..10 {
            calibrator.observe(26.0, 71.0, 90.0);
        }
        assert_eq!(calibrator.delta(26.0, 71.0), 0.0);

        // Same history after warm-up produces a live delta path
        let live = warmed();
        for _ in 0..10 {
            live.observe(26.0, 71.0, 90.0);
        }
        // Cell and global EMAs only differ by the sample count here, so
        // the delta may still be noise-gated; what matters is the gate
        // above was the warmed flag, not the data
        assert_eq!(calibrator.cell_ema(26.0, 71.0), live.cell_ema(26.0, 71.0));
    }

    /// The returned delta never exceeds the ±10 bound
    #[test]
    fn delta_is_clamped() {
        let calibrator = warmed();
        // Saturate one cell high, then drag the global mean down with a
        // long run of low scores elsewhere
        for _ in 0..50 {
            calibrator.observe(26.0, 71.0, 100.0);
        }
        for _ in 0..200 {
            calibrator.observe(10.0, 10.0, 5.0);
        }
        let delta = calibrator.delta(26.0, 71.0);
        assert!(delta > 0.0);
        assert!((delta - 10.0).abs() < 1e-9, "delta was {delta}");
    }
}

// ============================================================================
// Learning scenario
// ============================================================================

mod learning {
    use super::*;

    /// Ten observations in one cell and a single observation in a
    /// neighbour: the saturated cell earns a bias, the thin one stays 0.
    #[test]
    fn hot_cell_earns_bias_thin_cell_does_not() {
        let calibrator = warmed();

        for _ in 0..10 {
            calibrator.observe(26.0, 71.0, 90.0); // cell (25, 70)
        }
        calibrator.observe(26.0, 76.0, 90.0); // cell (25, 75)

        let hot = calibrator.delta(26.0, 71.0);
        assert!(hot < 0.0, "delta was {hot}");
        assert!(hot >= -10.0);

        assert_eq!(calibrator.delta(26.0, 76.0), 0.0);
    }

    /// Sub-point deltas are treated as noise
    #[test]
    fn small_deltas_are_gated() {
        let calibrator = warmed();
        // Every observation identical in a single cell: cell EMA equals
        // the global EMA, so the delta collapses below the noise floor
        for _ in 0..50 {
            calibrator.observe(26.0, 71.0, 80.0);
        }
        let cell = calibrator.cell_ema(26.0, 71.0);
        assert!((cell - 80.0).abs() < 1.0);
        assert_eq!(calibrator.delta(26.0, 71.0), 0.0);
    }
}

// ============================================================================
// Warm-up replay
// ============================================================================

mod warm_up {
    use super::*;

    fn observation(days_ago: i64, lat: f64, lng: f64, score: f64) -> HistoricObservation {
        HistoricObservation {
            created_at: Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap() - Duration::days(days_ago),
            lat,
            lng,
            score,
        }
    }

    /// Replaying persisted records equals feeding the observations live
    #[test]
    fn replay_matches_direct_feed() {
        let history: Vec<HistoricObservation> = (0..30)
            .map(|i| observation(30 - i, 26.0, 71.0, 60.0 + (i % 7) as f64 * 5.0))
            .collect();

        let replayed = RegionalCalibrator::new();
        replayed.warm_up(history.clone());

        let direct = RegionalCalibrator::new();
        direct.warm_up(Vec::new());
        for obs in &history {
            direct.observe(obs.lat, obs.lng, obs.score);
        }

        assert_eq!(
            replayed.cell_ema(26.0, 71.0),
            direct.cell_ema(26.0, 71.0)
        );
        assert_eq!(
            replayed.cell_samples(26.0, 71.0),
            direct.cell_samples(26.0, 71.0)
        );
        assert_eq!(replayed.delta(26.0, 71.0), direct.delta(26.0, 71.0));
    }

    /// Warm-up sorts by creation time before replaying
    #[test]
    fn replay_is_time_ordered() {
        // Same observations, shuffled input order
        let ordered = vec![
            observation(3, 26.0, 71.0, 40.0),
            observation(2, 26.0, 71.0, 60.0),
            observation(1, 26.0, 71.0, 80.0),
        ];
        let shuffled = vec![ordered[2], ordered[0], ordered[1]];

        let a = RegionalCalibrator::new();
        a.warm_up(ordered);
        let b = RegionalCalibrator::new();
        b.warm_up(shuffled);

        assert_eq!(a.cell_ema(26.0, 71.0), b.cell_ema(26.0, 71.0));
    }
}

// ============================================================================
// Property-based tests
// ============================================================================

mod properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Delta stays bounded for arbitrary observation streams
        #[test]
        fn delta_always_bounded(
            scores in proptest::collection::vec(0.0f64..100.0, 1..100),
            lat in -89.0f64..89.0,
            lng in -179.0f64..179.0,
        ) {
            let calibrator = warmed();
            for &score in &scores {
                calibrator.observe(lat, lng, score);
            }
            let delta = calibrator.delta(lat, lng);
            prop_assert!(delta.abs() <= 10.0);
        }

        /// Sample counts track the number of observations exactly
        #[test]
        fn sample_count_tracks_observations(count in 0usize..50) {
            let calibrator = warmed();
            for _ in 0..count {
                calibrator.observe(12.0, 34.0, 70.0);
            }
            prop_assert_eq!(calibrator.cell_samples(12.0, 34.0), count as u64);
        }
    }
}
