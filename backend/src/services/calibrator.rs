//! Adaptive regional calibrator
//!
//! Learns per-region score bias from deployed history: each 5°×5° grid
//! cell keeps a slow exponential moving average of the scores observed
//! there, compared against one global EMA over all observations. The
//! bias delta is bounded and only trusted once a cell has enough
//! samples. This is the only process-wide mutable state in the core.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

/// Slow learner: keeps the regional signal stable
const EMA_ALPHA: f64 = 0.12;
/// Maximum adjustment magnitude in score points
const MAX_ADJUST: f64 = 10.0;
/// Minimum observations in a cell before its delta is trusted
const MIN_SAMPLES: u64 = 5;
/// Deltas below this magnitude are treated as noise
const MIN_DELTA: f64 = 1.0;
/// Warm-up replays history no older than this
pub const WARM_UP_DAYS: i64 = 180;

/// One EMA accumulator; starts at zero with no samples
#[derive(Debug, Clone, Copy, Default)]
struct EmaCell {
    ema: f64,
    samples: u64,
}

impl EmaCell {
    fn update(&mut self, value: f64) {
        self.ema = EMA_ALPHA * value + (1.0 - EMA_ALPHA) * self.ema;
        self.samples += 1;
    }
}

#[derive(Debug, Default)]
struct CalibratorState {
    cells: HashMap<(i32, i32), EmaCell>,
    global: EmaCell,
    warmed: bool,
}

/// A warm-up observation taken from one persisted analysis
#[derive(Debug, Clone, Copy)]
pub struct HistoricObservation {
    pub created_at: DateTime<Utc>,
    pub lat: f64,
    pub lng: f64,
    pub score: f64,
}

/// Process-wide regional calibrator. Reads and writes are serialized
/// through an interior reader-writer lock; the handle is shared via
/// `Arc` and passed into the pipeline by reference.
#[derive(Debug, Default)]
pub struct RegionalCalibrator {
    state: RwLock<CalibratorState>,
}

/// 5°×5° region key for a coordinate pair
pub fn region_key(lat: f64, lng: f64) -> (i32, i32) {
    (
        ((lat / 5.0).floor() as i32) * 5,
        ((lng / 5.0).floor() as i32) * 5,
    )
}

impl RegionalCalibrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay persisted history in ascending time order and mark the
    /// calibrator ready. Until this runs, `delta` always returns 0.
    pub fn warm_up(&self, mut observations: Vec<HistoricObservation>) {
        observations.sort_by_key(|o| o.created_at);
        let count = observations.len();

        let mut state = self.state.write().expect("calibrator lock poisoned");
        for obs in observations {
            state.cells.entry(region_key(obs.lat, obs.lng)).or_default().update(obs.score);
            state.global.update(obs.score);
        }
        state.warmed = true;
        let regions = state.cells.len();
        drop(state);

        tracing::info!("calibrator warmed from {count} analyses over {regions} regions");
    }

    /// Record one scored analysis. Called exactly once per successful
    /// pipeline run, with the final calibrated score.
    pub fn observe(&self, lat: f64, lng: f64, score: f64) {
        let mut state = self.state.write().expect("calibrator lock poisoned");
        state.cells.entry(region_key(lat, lng)).or_default().update(score);
        state.global.update(score);
    }

    /// Raw regional bias for a location: how far the cell's EMA sits
    /// from the global EMA, bounded to ±10. Returns 0 before warm-up,
    /// for thin cells, and for sub-noise deltas. Callers apply the
    /// negated value so hot regions are pulled back towards the mean.
    pub fn delta(&self, lat: f64, lng: f64) -> f64 {
        let state = self.state.read().expect("calibrator lock poisoned");
        if !state.warmed {
            return 0.0;
        }
        let Some(cell) = state.cells.get(&region_key(lat, lng)) else {
            return 0.0;
        };
        if cell.samples < MIN_SAMPLES {
            return 0.0;
        }
        let delta = cell.ema - state.global.ema;
        if delta.abs() < MIN_DELTA {
            return 0.0;
        }
        delta.clamp(-MAX_ADJUST, MAX_ADJUST)
    }

    /// Samples recorded for the cell containing this location.
    pub fn cell_samples(&self, lat: f64, lng: f64) -> u64 {
        let state = self.state.read().expect("calibrator lock poisoned");
        state
            .cells
            .get(&region_key(lat, lng))
            .map(|c| c.samples)
            .unwrap_or(0)
    }

    /// Cell EMA for the region containing this location.
    pub fn cell_ema(&self, lat: f64, lng: f64) -> f64 {
        let state = self.state.read().expect("calibrator lock poisoned");
        state
            .cells
            .get(&region_key(lat, lng))
            .map(|c| c.ema)
            .unwrap_or(0.0)
    }
}
