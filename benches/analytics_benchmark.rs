use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use energy_analytics::analytics::{AnomalyConfig, ForecastConfig};
use energy_analytics::{
    AnomalyDetector, FixedClock, MemoryHistoryStore, Reading, TrendForecaster,
};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// 分析パスのベンチマーク
///
/// 履歴件数を変えて、取得＋統計計算のコストを測定します。

fn history(size: usize) -> (Arc<MemoryHistoryStore>, chrono::DateTime<Utc>) {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let readings = (0..size).map(|i| {
        let amount = 8.0 + (i % 7) as f64 * 0.5;
        Reading::new("bench-user", amount, start + Duration::hours(i as i64 * 6))
    });
    let now = start + Duration::hours(size as i64 * 6);
    (Arc::new(MemoryHistoryStore::from_readings(readings)), now)
}

fn bench_detect(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("anomaly_detect");

    for size in [30, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(1));
        let (store, _) = history(*size);
        let detector = AnomalyDetector::new(store, AnomalyConfig::default());

        group.bench_with_input(BenchmarkId::new("history", size), size, |b, _| {
            b.to_async(&rt)
                .iter(|| async { detector.detect("bench-user", 25.0).await.unwrap() })
        });
    }

    group.finish();
}

fn bench_forecast(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("trend_forecast");

    for size in [60, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(1));
        let (store, now) = history(*size);
        let forecaster =
            TrendForecaster::new(store, Arc::new(FixedClock(now)), ForecastConfig::default());

        group.bench_with_input(BenchmarkId::new("history", size), size, |b, _| {
            b.to_async(&rt)
                .iter(|| async { forecaster.forecast_next_day("bench-user").await.unwrap() })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detect, bench_forecast);
criterion_main!(benches);
