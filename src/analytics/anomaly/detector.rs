//! Anomaly Detector Implementation
//!
//! Z-スコア法による計測値の異常検知

use super::types::{AnomalyConfig, AnomalyVerdict};
use crate::analytics::stats;
use crate::error::HistoryError;
use crate::history::{HistoryStore, SortOrder};
use std::sync::Arc;

/// 異常検知器
///
/// 状態を持たず、呼び出しごとに最新履歴を取得してベースラインを再計算する。
/// 判定対象の値はベースラインに含めない（取り込み前に呼び出すこと）。
#[derive(Clone)]
pub struct AnomalyDetector {
    history: Arc<dyn HistoryStore>,
    config: AnomalyConfig,
}

impl AnomalyDetector {
    /// 新しい異常検知器を作成
    pub fn new(history: Arc<dyn HistoryStore>, config: AnomalyConfig) -> Self {
        Self { history, config }
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    /// 異常かどうかのみを返す
    pub async fn detect(
        &self,
        subscriber_id: &str,
        candidate_amount: f64,
    ) -> Result<bool, HistoryError> {
        Ok(self
            .evaluate(subscriber_id, candidate_amount)
            .await?
            .is_anomaly)
    }

    /// 詳細付きで判定
    pub async fn evaluate(
        &self,
        subscriber_id: &str,
        candidate_amount: f64,
    ) -> Result<AnomalyVerdict, HistoryError> {
        let readings = self
            .history
            .fetch_recent(subscriber_id, self.config.window, SortOrder::Descending)
            .await?;
        let amounts: Vec<f64> = readings.iter().map(|r| r.amount).collect();

        let verdict = self.evaluate_amounts(&amounts, candidate_amount);
        tracing::debug!(
            subscriber_id,
            candidate_amount,
            samples = verdict.sample_count,
            is_anomaly = verdict.is_anomaly,
            "{}",
            verdict.reason
        );

        Ok(verdict)
    }

    /// 取得済みのベースラインに対して判定
    pub fn evaluate_amounts(&self, baseline: &[f64], candidate_amount: f64) -> AnomalyVerdict {
        if baseline.len() < self.config.min_history {
            return AnomalyVerdict::insufficient(baseline.len(), self.config.min_history);
        }

        let (Some(mean), Some(std_dev)) =
            (stats::mean(baseline), stats::population_std_dev(baseline))
        else {
            return AnomalyVerdict::insufficient(baseline.len(), self.config.min_history);
        };

        let deviation = candidate_amount - mean;

        // 分散ゼロ: Z-スコアは定義できないため、平均からのずれがあれば異常とする
        if stats::is_effectively_zero(std_dev, mean) {
            let is_anomaly = !stats::is_effectively_zero(deviation, mean);
            return AnomalyVerdict {
                is_anomaly,
                z_score: None,
                baseline_mean: Some(mean),
                baseline_std_dev: Some(std_dev),
                sample_count: baseline.len(),
                reason: format!(
                    "Zero variance baseline: mean {:.2}, deviation {:.2}",
                    mean, deviation
                ),
            };
        }

        let z_score = deviation / std_dev;
        let is_anomaly = z_score.abs() > self.config.z_threshold;

        AnomalyVerdict {
            is_anomaly,
            z_score: Some(z_score),
            baseline_mean: Some(mean),
            baseline_std_dev: Some(std_dev),
            sample_count: baseline.len(),
            reason: format!(
                "Z-score: {:.2}, threshold: {:.2}",
                z_score, self.config.z_threshold
            ),
        }
    }
}
