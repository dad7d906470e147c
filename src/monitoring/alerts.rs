//! アラート管理システム

use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// アラート種別
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    /// 異常な消費量
    Anomaly,
    /// 月間予算超過
    BudgetExceeded,
}

impl AlertKind {
    /// 種別名を取得
    pub fn as_str(&self) -> &str {
        match self {
            Self::Anomaly => "ANOMALY",
            Self::BudgetExceeded => "BUDGET_EXCEEDED",
        }
    }
}

/// アラート
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// アラートID
    pub id: String,
    /// 契約者ID
    pub subscriber_id: String,
    /// 種別
    pub kind: AlertKind,
    /// メッセージ
    pub message: String,
    /// 作成時刻
    pub created_at: DateTime<Utc>,
    /// 既読フラグ
    pub seen: bool,
}

impl Alert {
    /// 新しいアラートを作成
    pub fn new(
        subscriber_id: impl Into<String>,
        kind: AlertKind,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            subscriber_id: subscriber_id.into(),
            kind,
            message: message.into(),
            created_at,
            seen: false,
        }
    }

    /// 異常消費アラート
    pub fn anomaly(subscriber_id: impl Into<String>, amount: f64, at: DateTime<Utc>) -> Self {
        Self::new(
            subscriber_id,
            AlertKind::Anomaly,
            format!("Abnormal energy consumption detected: {} kWh", amount),
            at,
        )
    }

    /// 予算超過アラート
    pub fn budget_exceeded(subscriber_id: impl Into<String>, limit: f64, at: DateTime<Utc>) -> Self {
        Self::new(
            subscriber_id,
            AlertKind::BudgetExceeded,
            format!("Monthly budget of {} kWh has been exceeded.", limit),
            at,
        )
    }

    /// 既読にする
    pub fn mark_seen(&mut self) {
        self.seen = true;
    }
}

/// アラートの保存先
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// アラートを登録
    async fn raise(&self, alert: Alert) -> Result<()>;

    /// 新しい順に最大 `limit` 件
    async fn recent(&self, subscriber_id: &str, limit: usize) -> Result<Vec<Alert>>;

    /// 既読にして更新後のアラートを返す
    async fn mark_seen(&self, alert_id: &str) -> Result<Alert>;

    /// 未読件数
    async fn unseen_count(&self, subscriber_id: &str) -> Result<usize>;
}

/// メモリ上のアラートストア
#[derive(Debug, Default)]
pub struct MemoryAlertStore {
    alerts: RwLock<HashMap<String, Vec<Alert>>>,
}

impl MemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn raise(&self, alert: Alert) -> Result<()> {
        tracing::warn!(
            subscriber_id = %alert.subscriber_id,
            kind = alert.kind.as_str(),
            "{}",
            alert.message
        );
        self.alerts
            .write()
            .await
            .entry(alert.subscriber_id.clone())
            .or_default()
            .push(alert);
        Ok(())
    }

    async fn recent(&self, subscriber_id: &str, limit: usize) -> Result<Vec<Alert>> {
        let guard = self.alerts.read().await;
        let mut alerts = guard.get(subscriber_id).cloned().unwrap_or_default();
        // 作成時刻が同じなら後から登録したものを先に
        alerts.reverse();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        alerts.truncate(limit);
        Ok(alerts)
    }

    async fn mark_seen(&self, alert_id: &str) -> Result<Alert> {
        let mut guard = self.alerts.write().await;
        let alert = guard
            .values_mut()
            .flat_map(|alerts| alerts.iter_mut())
            .find(|alert| alert.id == alert_id)
            .ok_or_else(|| Error::NotFound(format!("alert {}", alert_id)))?;

        alert.mark_seen();
        Ok(alert.clone())
    }

    async fn unseen_count(&self, subscriber_id: &str) -> Result<usize> {
        let guard = self.alerts.read().await;
        Ok(guard
            .get(subscriber_id)
            .map_or(0, |alerts| alerts.iter().filter(|a| !a.seen).count()))
    }
}
