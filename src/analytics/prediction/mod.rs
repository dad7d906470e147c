//! Prediction Analytics Module
//!
//! 予測分析システム

mod forecaster;
mod types;

pub use forecaster::TrendForecaster;
pub use types::{ForecastConfig, TrendDirection, TrendModel};
