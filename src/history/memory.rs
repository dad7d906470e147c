//! In-memory history store

use super::store::{HistoryStore, ReadingStore};
use super::types::{Reading, SortOrder};
use crate::error::{self, HistoryError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

/// メモリ上の計測ストア
///
/// 契約者ごとにタイムスタンプ昇順で保持する
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    readings: RwLock<HashMap<String, Vec<Reading>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 計測値の一覧からストアを作成
    pub fn from_readings(readings: impl IntoIterator<Item = Reading>) -> Self {
        let mut map: HashMap<String, Vec<Reading>> = HashMap::new();
        for reading in readings {
            map.entry(reading.subscriber_id.clone())
                .or_default()
                .push(reading);
        }
        for series in map.values_mut() {
            series.sort_by_key(|r| r.timestamp);
        }

        Self {
            readings: RwLock::new(map),
        }
    }

    /// JSON配列ファイルから読み込み
    pub fn from_json_file(path: &Path) -> error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let readings: Vec<Reading> = serde_json::from_str(&content)?;
        for (index, reading) in readings.iter().enumerate() {
            reading.validate().map_err(|e| match e {
                error::Error::InvalidInput(message) => error::Error::InvalidInput(format!(
                    "{} (entry {}): {}",
                    path.display(),
                    index,
                    message
                )),
                other => other,
            })?;
        }
        tracing::debug!(count = readings.len(), path = %path.display(), "Loaded readings");
        Ok(Self::from_readings(readings))
    }

    /// 全契約者の計測値（契約者内は古い順）
    pub async fn snapshot(&self) -> Vec<Reading> {
        let guard = self.readings.read().await;
        let mut subscribers: Vec<&String> = guard.keys().collect();
        subscribers.sort();
        subscribers
            .into_iter()
            .flat_map(|id| guard[id].iter().cloned())
            .collect()
    }

    /// 契約者の保持件数
    pub async fn count(&self, subscriber_id: &str) -> usize {
        self.readings
            .read()
            .await
            .get(subscriber_id)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn fetch_recent(
        &self,
        subscriber_id: &str,
        limit: usize,
        order: SortOrder,
    ) -> Result<Vec<Reading>, HistoryError> {
        let guard = self.readings.read().await;
        let Some(series) = guard.get(subscriber_id) else {
            return Ok(Vec::new());
        };

        let start = series.len().saturating_sub(limit);
        let mut window: Vec<Reading> = series[start..].to_vec();
        if order == SortOrder::Descending {
            window.reverse();
        }

        Ok(window)
    }
}

#[async_trait]
impl ReadingStore for MemoryHistoryStore {
    async fn append(&self, reading: Reading) -> Result<(), HistoryError> {
        let mut guard = self.readings.write().await;
        let series = guard.entry(reading.subscriber_id.clone()).or_default();

        // 同時刻のレコードは後から来たものを後ろに置く
        let index = series.partition_point(|r| r.timestamp <= reading.timestamp);
        series.insert(index, reading);
        Ok(())
    }

    async fn total_between(
        &self,
        subscriber_id: &str,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<f64, HistoryError> {
        let guard = self.readings.read().await;
        let total = guard
            .get(subscriber_id)
            .map(|series| {
                series
                    .iter()
                    .filter(|r| from.map_or(true, |f| r.timestamp >= f))
                    .filter(|r| until.map_or(true, |u| r.timestamp < u))
                    .map(|r| r.amount)
                    .sum()
            })
            .unwrap_or(0.0);

        Ok(total)
    }
}
