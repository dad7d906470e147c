//! Trend Forecaster
//!
//! 線形回帰による翌日消費量の予測

use super::types::{ForecastConfig, TrendDirection, TrendModel};
use crate::analytics::stats;
use crate::clock::Clock;
use crate::error::HistoryError;
use crate::history::{HistoryStore, Reading, SortOrder};
use std::sync::Arc;

/// トレンド予測器
///
/// 予測は「最後の計測の翌日」ではなく「現在時刻の翌日」で評価する。
/// 履歴が古い場合は当てはめ範囲を大きく外れた外挿になる点に注意。
#[derive(Clone)]
pub struct TrendForecaster {
    history: Arc<dyn HistoryStore>,
    clock: Arc<dyn Clock>,
    config: ForecastConfig,
}

impl TrendForecaster {
    /// 新しい予測器を作成
    pub fn new(
        history: Arc<dyn HistoryStore>,
        clock: Arc<dyn Clock>,
        config: ForecastConfig,
    ) -> Self {
        Self {
            history,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// 翌日の消費量を予測（履歴不足なら None）
    pub async fn forecast_next_day(&self, subscriber_id: &str) -> Result<Option<f64>, HistoryError> {
        let Some(model) = self.fit(subscriber_id).await? else {
            tracing::debug!(subscriber_id, "Not enough history for a forecast");
            return Ok(None);
        };

        let x_next = stats::day_diff(self.clock.now(), model.anchor) + 1;
        let forecast = model.value_at(x_next as f64).max(0.0);

        tracing::debug!(
            subscriber_id,
            slope = model.slope,
            intercept = model.intercept,
            x_next,
            forecast,
            "Next-day forecast"
        );

        Ok(Some(forecast))
    }

    /// 最新履歴に直線を当てはめる
    pub async fn fit(&self, subscriber_id: &str) -> Result<Option<TrendModel>, HistoryError> {
        let readings = self
            .history
            .fetch_recent(subscriber_id, self.config.window, SortOrder::Ascending)
            .await?;

        Ok(self.fit_readings(&readings))
    }

    /// トレンド方向を判定
    pub async fn trend(&self, subscriber_id: &str) -> Result<Option<TrendDirection>, HistoryError> {
        Ok(self
            .fit(subscriber_id)
            .await?
            .map(|model| model.direction(self.config.stability_threshold)))
    }

    /// 昇順の計測列に直線を当てはめる
    pub fn fit_readings(&self, readings: &[Reading]) -> Option<TrendModel> {
        if readings.len() < self.config.min_history {
            return None;
        }
        let anchor = readings.first()?.timestamp;

        let n = readings.len() as f64;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_x2 = 0.0;

        for reading in readings {
            let x = stats::day_diff(reading.timestamp, anchor) as f64;
            let y = reading.amount;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_x2 += x * x;
        }

        // x はすべて整数なので分母ゼロは厳密に判定できる
        let denominator = n * sum_x2 - sum_x * sum_x;
        if denominator == 0.0 {
            return Some(TrendModel {
                slope: 0.0,
                intercept: sum_y / n,
                sample_count: readings.len(),
                anchor,
                degenerate: true,
            });
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;

        Some(TrendModel {
            slope,
            intercept,
            sample_count: readings.len(),
            anchor,
            degenerate: false,
        })
    }
}
