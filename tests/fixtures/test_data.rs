//! Test Data
//!
//! テスト用の共通データとヘルパー関数

use chrono::{DateTime, Duration, TimeZone, Utc};
use energy_analytics::Reading;

pub const SUBSCRIBER: &str = "demo@greenenergy.com";

/// 基準時刻（2024-03-01 07:30 UTC）
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 7, 30, 0).unwrap()
}

/// 1日1件の計測値（base_time から連続した暦日）
pub fn daily_readings(amounts: &[f64]) -> Vec<Reading> {
    amounts
        .iter()
        .enumerate()
        .map(|(day, &amount)| {
            Reading::new(SUBSCRIBER, amount, base_time() + Duration::days(day as i64))
                .with_device("SMART-METER-HUB")
        })
        .collect()
}

/// 平均10・母標準偏差1の30件
pub fn unit_variance_amounts() -> Vec<f64> {
    (0..30).map(|i| if i % 2 == 0 { 9.0 } else { 11.0 }).collect()
}

/// 最後の計測の翌日
pub fn day_after(readings: &[Reading]) -> DateTime<Utc> {
    readings
        .last()
        .map(|r| r.timestamp + Duration::days(1))
        .unwrap_or_else(base_time)
}
