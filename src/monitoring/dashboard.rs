//! ダッシュボード集計

use super::alerts::{Alert, AlertStore};
use super::budget::{BudgetPeriod, BudgetStore};
use super::recommendations::{MemoryRecommendationStore, Recommendation, RecommendationStore};
use super::sustainability::{SustainabilityConfig, SustainabilityMetrics};
use crate::analytics::{ForecastConfig, TrendForecaster};
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::history::{HistoryStore, Reading, ReadingStore, SortOrder};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 一覧表示の最大件数
const RECENT_READINGS_LIMIT: usize = 100;
const RECENT_ALERTS_LIMIT: usize = 20;
/// 日別サマリーの日数
const SUMMARY_DAYS: i64 = 7;

/// ダッシュボード統計
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// 直近24時間の消費量
    pub current_usage: f64,
    /// 翌日予測（履歴不足なら None）
    pub prediction: Option<f64>,
    /// 未読アラート数
    pub alert_count: usize,
    /// 今月の消費量
    pub monthly_spent: f64,
    /// 月間予算（未設定なら 0）
    pub budget_limit: f64,
}

impl DashboardStats {
    /// 表示用の予測値（予測なしは "N/A"、0 は "0.0"）
    pub fn prediction_label(&self) -> String {
        match self.prediction {
            Some(value) => format!("{:.1}", value),
            None => "N/A".to_string(),
        }
    }
}

/// 日別消費量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyConsumption {
    pub date: NaiveDate,
    /// 曜日ラベル（"Mon" など）
    pub name: String,
    pub consumption: f64,
}

/// ダッシュボードサービス
pub struct DashboardService {
    readings: Arc<dyn ReadingStore>,
    alerts: Arc<dyn AlertStore>,
    budgets: Arc<dyn BudgetStore>,
    recommendations: Arc<dyn RecommendationStore>,
    forecaster: TrendForecaster,
    clock: Arc<dyn Clock>,
    sustainability: SustainabilityConfig,
}

impl DashboardService {
    pub fn new<S>(
        readings: Arc<S>,
        alerts: Arc<dyn AlertStore>,
        budgets: Arc<dyn BudgetStore>,
        clock: Arc<dyn Clock>,
        forecast: ForecastConfig,
        sustainability: SustainabilityConfig,
    ) -> Self
    where
        S: ReadingStore + 'static,
    {
        let history: Arc<dyn HistoryStore> = readings.clone();
        Self {
            forecaster: TrendForecaster::new(history, clock.clone(), forecast),
            readings,
            alerts,
            budgets,
            recommendations: Arc::new(MemoryRecommendationStore::new()),
            clock,
            sustainability,
        }
    }

    /// 提案ストアを差し替える
    pub fn with_recommendations(mut self, recommendations: Arc<dyn RecommendationStore>) -> Self {
        self.recommendations = recommendations;
        self
    }

    pub fn forecaster(&self) -> &TrendForecaster {
        &self.forecaster
    }

    /// ダッシュボード統計を取得
    pub async fn stats(&self, subscriber_id: &str) -> Result<DashboardStats> {
        let now = self.clock.now();
        let day_ago = now - Duration::days(1);
        let month_start = BudgetPeriod::Monthly.start_of(now);

        let (current_usage, prediction, alert_count, monthly_spent, budget) = tokio::try_join!(
            self.total_since(subscriber_id, day_ago),
            async {
                self.forecaster
                    .forecast_next_day(subscriber_id)
                    .await
                    .map_err(Error::from)
            },
            self.alerts.unseen_count(subscriber_id),
            self.total_since(subscriber_id, month_start),
            self.budgets.get(subscriber_id, BudgetPeriod::Monthly),
        )?;

        Ok(DashboardStats {
            current_usage,
            prediction,
            alert_count,
            monthly_spent,
            budget_limit: budget.map_or(0.0, |b| b.limit),
        })
    }

    /// 直近7日間（今日を含む、古い順）の日別消費量
    pub async fn consumption_summary(&self, subscriber_id: &str) -> Result<Vec<DailyConsumption>> {
        let today = self.clock.now().date_naive();
        let days = (0..SUMMARY_DAYS)
            .rev()
            .map(|offset| today - Duration::days(offset));

        try_join_all(days.map(|date| async move {
            let start = day_start(date);
            let consumption = self
                .readings
                .total_between(subscriber_id, Some(start), Some(start + Duration::days(1)))
                .await?;

            Ok::<_, Error>(DailyConsumption {
                date,
                name: date.format("%a").to_string(),
                consumption,
            })
        }))
        .await
    }

    /// 累計消費量からの環境負荷指標
    pub async fn sustainability(&self, subscriber_id: &str) -> Result<SustainabilityMetrics> {
        let total = self.readings.total_between(subscriber_id, None, None).await?;
        Ok(SustainabilityMetrics::from_total(total, &self.sustainability))
    }

    /// 新しい順の計測一覧
    pub async fn recent_readings(&self, subscriber_id: &str) -> Result<Vec<Reading>> {
        Ok(self
            .readings
            .fetch_recent(subscriber_id, RECENT_READINGS_LIMIT, SortOrder::Descending)
            .await?)
    }

    /// 新しい順のアラート一覧
    pub async fn recent_alerts(&self, subscriber_id: &str) -> Result<Vec<Alert>> {
        self.alerts.recent(subscriber_id, RECENT_ALERTS_LIMIT).await
    }

    /// 新しい順の省エネ提案（未登録なら既定の3件）
    pub async fn recommendations(&self, subscriber_id: &str) -> Result<Vec<Recommendation>> {
        let stored = self.recommendations.for_subscriber(subscriber_id).await?;
        if stored.is_empty() {
            return Ok(Recommendation::defaults(subscriber_id, self.clock.now()));
        }
        Ok(stored)
    }

    async fn total_since(&self, subscriber_id: &str, from: DateTime<Utc>) -> Result<f64> {
        Ok(self
            .readings
            .total_between(subscriber_id, Some(from), None)
            .await?)
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
