//! Prediction Types
//!
//! 予測分析用の型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// トレンド予測の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// 回帰に使う最新履歴の件数
    pub window: usize,
    /// 予測に必要な最小履歴件数（未満なら予測なし）
    pub min_history: usize,
    /// 傾き（kWh/日）がこの絶対値未満なら Stable
    pub stability_threshold: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window: 60,
            min_history: 7,
            stability_threshold: 0.05,
        }
    }
}

/// トレンド方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    /// 上昇トレンド
    Increasing,
    /// 下降トレンド
    Decreasing,
    /// 安定
    Stable,
}

/// 最小二乗法で当てはめた直線 y = slope·x + intercept
///
/// x は `anchor`（窓内で最も古い計測）の日付からの経過暦日数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    /// 傾き（kWh/日）
    pub slope: f64,
    /// 切片
    pub intercept: f64,
    /// 回帰に使った件数
    pub sample_count: usize,
    /// x = 0 の基準時刻
    pub anchor: DateTime<Utc>,
    /// 全計測が同じ暦日にあり、平均値へフォールバックした
    pub degenerate: bool,
}

impl TrendModel {
    /// x 日目の値（負値はそのまま）
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// トレンド方向
    pub fn direction(&self, stability_threshold: f64) -> TrendDirection {
        if self.slope.abs() < stability_threshold {
            TrendDirection::Stable
        } else if self.slope > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        }
    }
}
