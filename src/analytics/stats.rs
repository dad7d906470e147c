//! Statistics helpers
//!
//! 異常検知とトレンド予測で共有する数値ユーティリティ

use chrono::{DateTime, Utc};

/// 算術平均（空なら None）
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// 母標準偏差（除数 n）
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// 暦日ベースの日数差（UTC日付の差）
///
/// 24時間単位ではなく日付境界で数える。2024-01-01T23:00 → 2024-01-02T01:00 は1日
pub fn day_diff(later: DateTime<Utc>, earlier: DateTime<Utc>) -> i64 {
    (later.date_naive() - earlier.date_naive()).num_days()
}

/// `scale` の大きさに比例した許容誤差でゼロとみなせるか
///
/// 同一値の平均・分散計算で生じる丸め誤差を吸収する
pub fn is_effectively_zero(value: f64, scale: f64) -> bool {
    value.abs() <= tolerance(scale)
}

/// 許容誤差（`scale` に対する相対値。`scale` が 0 なら 0）
pub fn tolerance(scale: f64) -> f64 {
    f64::EPSILON * 16.0 * scale.abs()
}
