//! History Store Abstraction
//!
//! 計測履歴ストアに対する統一インターフェース

use super::types::{Reading, SortOrder};
use crate::error::HistoryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 計測履歴の読み出しトレイト
///
/// 分析コンポーネントが依存する唯一の外部機能
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// 契約者の最新 `limit` 件を取得し、`order` の順に並べて返す
    async fn fetch_recent(
        &self,
        subscriber_id: &str,
        limit: usize,
        order: SortOrder,
    ) -> Result<Vec<Reading>, HistoryError>;
}

/// 書き込みと集計を備えた計測ストア
#[async_trait]
pub trait ReadingStore: HistoryStore {
    /// 計測値を追加
    async fn append(&self, reading: Reading) -> Result<(), HistoryError>;

    /// `from <= timestamp < until` の消費量合計
    async fn total_between(
        &self,
        subscriber_id: &str,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<f64, HistoryError>;
}
