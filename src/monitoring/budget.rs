//! 消費量予算

use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// 予算期間
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum BudgetPeriod {
    #[default]
    Monthly,
}

impl BudgetPeriod {
    /// `now` を含む期間の開始時刻（UTC）
    pub fn start_of(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Monthly => Utc
                .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
                .single()
                .unwrap_or(now),
        }
    }
}

/// 予算
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// 契約者ID
    pub subscriber_id: String,
    /// 上限（kWh）
    pub limit: f64,
    /// 期間
    #[serde(default)]
    pub period: BudgetPeriod,
}

impl Budget {
    /// 月間予算を作成
    pub fn monthly(subscriber_id: impl Into<String>, limit: f64) -> Result<Self> {
        if !limit.is_finite() || limit < 0.0 {
            return Err(Error::InvalidInput(format!(
                "budget limit must be a non-negative number, got {}",
                limit
            )));
        }

        Ok(Self {
            subscriber_id: subscriber_id.into(),
            limit,
            period: BudgetPeriod::Monthly,
        })
    }

    /// 期間内の消費量が上限を超えたか
    pub fn is_exceeded_by(&self, spent: f64) -> bool {
        spent > self.limit
    }
}

/// 予算の保存先
#[async_trait]
pub trait BudgetStore: Send + Sync {
    async fn get(&self, subscriber_id: &str, period: BudgetPeriod) -> Result<Option<Budget>>;

    /// 同じ契約者・期間の既存予算を置き換える
    async fn set(&self, budget: Budget) -> Result<()>;
}

/// メモリ上の予算ストア
#[derive(Debug, Default)]
pub struct MemoryBudgetStore {
    budgets: RwLock<HashMap<(String, BudgetPeriod), Budget>>,
}

impl MemoryBudgetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BudgetStore for MemoryBudgetStore {
    async fn get(&self, subscriber_id: &str, period: BudgetPeriod) -> Result<Option<Budget>> {
        Ok(self
            .budgets
            .read()
            .await
            .get(&(subscriber_id.to_string(), period))
            .cloned())
    }

    async fn set(&self, budget: Budget) -> Result<()> {
        self.budgets
            .write()
            .await
            .insert((budget.subscriber_id.clone(), budget.period), budget);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_of_month() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 17, 45, 0).unwrap();
        let start = BudgetPeriod::Monthly.start_of(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_exceeded_is_strict() {
        let budget = Budget::monthly("user-1", 400.0).unwrap();
        assert!(!budget.is_exceeded_by(400.0));
        assert!(budget.is_exceeded_by(400.1));
    }

    #[test]
    fn test_rejects_negative_limit() {
        assert!(Budget::monthly("user-1", -5.0).is_err());
    }

    #[tokio::test]
    async fn test_set_replaces_existing() {
        let store = MemoryBudgetStore::new();
        store.set(Budget::monthly("user-1", 300.0).unwrap()).await.unwrap();
        store.set(Budget::monthly("user-1", 450.0).unwrap()).await.unwrap();

        let budget = store.get("user-1", BudgetPeriod::Monthly).await.unwrap();
        assert_eq!(budget.map(|b| b.limit), Some(450.0));
        assert!(store
            .get("user-2", BudgetPeriod::Monthly)
            .await
            .unwrap()
            .is_none());
    }
}
