//! Anomaly Detection Types
//!
//! 異常検知用の型定義

use serde::{Deserialize, Serialize};

/// 異常検知の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// ベースラインに使う最新履歴の件数
    pub window: usize,
    /// 判定に必要な最小履歴件数（未満なら常に正常）
    pub min_history: usize,
    /// Z-スコア閾値
    pub z_threshold: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            window: 30,
            min_history: 5,
            z_threshold: 2.5,
        }
    }
}

/// 異常判定結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyVerdict {
    /// 異常フラグ
    pub is_anomaly: bool,
    /// Z-スコア（分散ゼロ・履歴不足時は None）
    pub z_score: Option<f64>,
    /// ベースライン平均
    pub baseline_mean: Option<f64>,
    /// ベースライン母標準偏差
    pub baseline_std_dev: Option<f64>,
    /// ベースライン件数
    pub sample_count: usize,
    /// 説明
    pub reason: String,
}

impl AnomalyVerdict {
    /// 履歴不足による正常判定
    pub fn insufficient(sample_count: usize, required: usize) -> Self {
        Self {
            is_anomaly: false,
            z_score: None,
            baseline_mean: None,
            baseline_std_dev: None,
            sample_count,
            reason: format!(
                "Insufficient data: {} readings, {} required",
                sample_count, required
            ),
        }
    }
}
