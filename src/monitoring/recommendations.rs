//! 省エネ提案

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// 提案がない契約者に返す既定の提案（内容, 効果スコア）
const DEFAULT_RECOMMENDATIONS: [(&str, f64); 3] = [
    ("Shift laundry to 10 PM to 6 AM for 15% lower rates.", 0.8),
    ("A/C usage is 20% higher than similar households.", 0.5),
    ("Switching to LED bulbs could save you $12/month.", 0.3),
];

/// 省エネ提案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// 契約者ID
    pub subscriber_id: String,
    /// 提案内容
    pub content: String,
    /// 効果スコア（0.0〜1.0、大きいほど効果が高い）
    pub impact_score: f64,
    /// 作成時刻
    pub created_at: DateTime<Utc>,
}

impl Recommendation {
    pub fn new(
        subscriber_id: impl Into<String>,
        content: impl Into<String>,
        impact_score: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subscriber_id: subscriber_id.into(),
            content: content.into(),
            impact_score,
            created_at,
        }
    }

    /// 既定の提案一覧（効果スコアの高い順）
    pub fn defaults(subscriber_id: &str, at: DateTime<Utc>) -> Vec<Self> {
        DEFAULT_RECOMMENDATIONS
            .iter()
            .map(|(content, score)| Self::new(subscriber_id, *content, *score, at))
            .collect()
    }
}

/// 提案の保存先
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// 提案を登録
    async fn add(&self, recommendation: Recommendation) -> Result<()>;

    /// 契約者の提案を新しい順に
    async fn for_subscriber(&self, subscriber_id: &str) -> Result<Vec<Recommendation>>;
}

/// メモリ上の提案ストア
#[derive(Debug, Default)]
pub struct MemoryRecommendationStore {
    recommendations: RwLock<HashMap<String, Vec<Recommendation>>>,
}

impl MemoryRecommendationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecommendationStore for MemoryRecommendationStore {
    async fn add(&self, recommendation: Recommendation) -> Result<()> {
        self.recommendations
            .write()
            .await
            .entry(recommendation.subscriber_id.clone())
            .or_default()
            .push(recommendation);
        Ok(())
    }

    async fn for_subscriber(&self, subscriber_id: &str) -> Result<Vec<Recommendation>> {
        let guard = self.recommendations.read().await;
        let mut recommendations = guard.get(subscriber_id).cloned().unwrap_or_default();
        // 作成時刻が同じなら後から登録したものを先に
        recommendations.reverse();
        recommendations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recommendations)
    }
}
