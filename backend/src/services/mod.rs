//! Core services for the Solar Placement Scoring platform

pub mod acquisition;
pub mod calibrator;
pub mod history;
pub mod pipeline;

pub use acquisition::AcquisitionService;
pub use calibrator::RegionalCalibrator;
pub use history::HistoryStore;
pub use pipeline::AnalysisPipeline;
