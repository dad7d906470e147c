//! Anomaly Detection Module
//!
//! 異常検知システム

mod detector;
mod types;

pub use detector::AnomalyDetector;
pub use types::{AnomalyConfig, AnomalyVerdict};
