//! 計測値の取り込みと評価
//!
//! 新しい計測値ごとに異常判定・予算チェックを行い、必要ならアラートを発行する

use super::alerts::{Alert, AlertStore};
use super::budget::{BudgetPeriod, BudgetStore};
use crate::analytics::{AnomalyConfig, AnomalyDetector};
use crate::clock::Clock;
use crate::error::Result;
use crate::history::{HistoryStore, NewReading, Reading, ReadingStore};
use serde::Serialize;
use std::sync::Arc;

/// 取り込み結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    /// 保存した計測値
    pub reading: Reading,
    /// 異常フラグ
    pub is_anomaly: bool,
    /// 今回発行したアラート
    pub alerts: Vec<Alert>,
}

/// 計測値評価器
pub struct ReadingEvaluator {
    detector: AnomalyDetector,
    readings: Arc<dyn ReadingStore>,
    alerts: Arc<dyn AlertStore>,
    budgets: Arc<dyn BudgetStore>,
    clock: Arc<dyn Clock>,
}

impl ReadingEvaluator {
    pub fn new<S>(
        readings: Arc<S>,
        alerts: Arc<dyn AlertStore>,
        budgets: Arc<dyn BudgetStore>,
        clock: Arc<dyn Clock>,
        config: AnomalyConfig,
    ) -> Self
    where
        S: ReadingStore + 'static,
    {
        let history: Arc<dyn HistoryStore> = readings.clone();
        Self {
            detector: AnomalyDetector::new(history, config),
            readings,
            alerts,
            budgets,
            clock,
        }
    }

    /// 計測値を取り込む
    ///
    /// 異常判定は保存前に行うため、判定対象はベースラインに含まれない
    pub async fn record(&self, new_reading: NewReading) -> Result<IngestOutcome> {
        let now = self.clock.now();
        let reading = new_reading.validate(now)?;
        let subscriber_id = reading.subscriber_id.clone();

        let is_anomaly = self.detector.detect(&subscriber_id, reading.amount).await?;
        self.readings.append(reading.clone()).await?;

        tracing::info!(
            subscriber_id = %subscriber_id,
            amount = reading.amount,
            is_anomaly,
            "Reading recorded"
        );

        let mut raised = Vec::new();
        if is_anomaly {
            raised.push(Alert::anomaly(&subscriber_id, reading.amount, now));
        }
        if let Some(alert) = self.check_budget(&subscriber_id).await? {
            raised.push(alert);
        }

        for alert in &raised {
            self.alerts.raise(alert.clone()).await?;
        }

        Ok(IngestOutcome {
            reading,
            is_anomaly,
            alerts: raised,
        })
    }

    /// 月間予算の超過をチェック
    async fn check_budget(&self, subscriber_id: &str) -> Result<Option<Alert>> {
        let Some(budget) = self
            .budgets
            .get(subscriber_id, BudgetPeriod::Monthly)
            .await?
        else {
            return Ok(None);
        };

        let now = self.clock.now();
        let spent = self
            .readings
            .total_between(subscriber_id, Some(budget.period.start_of(now)), None)
            .await?;

        if budget.is_exceeded_by(spent) {
            tracing::debug!(subscriber_id, spent, limit = budget.limit, "Budget exceeded");
            return Ok(Some(Alert::budget_exceeded(subscriber_id, budget.limit, now)));
        }

        Ok(None)
    }
}
