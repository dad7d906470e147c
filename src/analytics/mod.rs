//! Analytics Module
//!
//! 異常検知・消費量予測システム

pub mod anomaly;
pub mod prediction;
pub mod stats;

pub use anomaly::{AnomalyConfig, AnomalyDetector, AnomalyVerdict};
pub use prediction::{ForecastConfig, TrendDirection, TrendForecaster, TrendModel};
