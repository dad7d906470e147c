//! 消費量モニタリング
//!
//! このモジュールは、計測値の取り込み時の異常・予算チェック、
//! アラート管理、ダッシュボード集計、省エネ提案を提供します。

pub mod alerts;
pub mod budget;
pub mod dashboard;
pub mod evaluator;
pub mod recommendations;
pub mod sustainability;

pub use alerts::{Alert, AlertKind, AlertStore, MemoryAlertStore};
pub use budget::{Budget, BudgetPeriod, BudgetStore, MemoryBudgetStore};
pub use dashboard::{DailyConsumption, DashboardService, DashboardStats};
pub use evaluator::{IngestOutcome, ReadingEvaluator};
pub use recommendations::{MemoryRecommendationStore, Recommendation, RecommendationStore};
pub use sustainability::{ImpactLevel, SustainabilityConfig, SustainabilityMetrics};
