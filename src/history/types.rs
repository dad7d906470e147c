//! Reading Types
//!
//! 計測履歴の型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 電力計測値（不変の履歴レコード）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// 契約者ID
    pub subscriber_id: String,
    /// 消費量（kWh）
    pub amount: f64,
    /// 計測時刻
    pub timestamp: DateTime<Utc>,
    /// デバイスラベル
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl Reading {
    /// 新しい計測値を作成
    pub fn new(
        subscriber_id: impl Into<String>,
        amount: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            subscriber_id: subscriber_id.into(),
            amount,
            timestamp,
            device_id: None,
        }
    }

    /// デバイスラベルを設定
    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// 外部から読み込んだレコードの検証
    pub fn validate(&self) -> Result<()> {
        check_subscriber_id(&self.subscriber_id)?;
        check_amount(self.amount)
    }
}

/// 消費量は有限かつ非負
pub fn check_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidInput(format!(
            "amount must be a non-negative number, got {}",
            amount
        )));
    }
    Ok(())
}

fn check_subscriber_id(subscriber_id: &str) -> Result<()> {
    if subscriber_id.trim().is_empty() {
        return Err(Error::InvalidInput("subscriber id is empty".to_string()));
    }
    Ok(())
}

/// 取り込み前の計測値
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReading {
    pub subscriber_id: String,
    pub amount: f64,
    #[serde(default)]
    pub device_id: Option<String>,
    /// 省略時は取り込み時刻
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewReading {
    pub fn new(subscriber_id: impl Into<String>, amount: f64) -> Self {
        Self {
            subscriber_id: subscriber_id.into(),
            amount,
            device_id: None,
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// 入力を検証して履歴レコードに変換
    pub fn validate(self, now: DateTime<Utc>) -> Result<Reading> {
        check_subscriber_id(&self.subscriber_id)?;
        check_amount(self.amount)?;

        Ok(Reading {
            subscriber_id: self.subscriber_id,
            amount: self.amount,
            timestamp: self.timestamp.unwrap_or(now),
            device_id: self.device_id,
        })
    }
}

/// タイムスタンプの並び順
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// 古い順
    Ascending,
    /// 新しい順
    Descending,
}
