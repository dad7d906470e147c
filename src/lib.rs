//! # energy-analytics
//!
//! Energy consumption analytics for metered subscribers.
//!
//! The crate flags anomalous readings against a subscriber's recent history
//! (z-score over a recency window) and forecasts next-day consumption with a
//! least-squares trend fitted over elapsed calendar days. Both computations are
//! stateless and read history through the injected [`history::HistoryStore`].
//! The [`monitoring`] layer wires them into reading ingestion, alerts, budgets
//! and dashboard aggregation.

pub mod analytics;
pub mod clock;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod monitoring;

pub use analytics::{AnomalyDetector, AnomalyVerdict, TrendForecaster};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AnalyticsConfig;
pub use error::{Error, HistoryError, Result};
pub use history::{HistoryStore, MemoryHistoryStore, NewReading, Reading, ReadingStore, SortOrder};
