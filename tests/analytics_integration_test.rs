//! 異常検知・トレンド予測の統合テスト

mod fixtures;

use chrono::Duration;
use energy_analytics::analytics::{AnomalyConfig, ForecastConfig};
use energy_analytics::{
    AnomalyDetector, FixedClock, HistoryError, MemoryHistoryStore, SortOrder, TrendForecaster,
};
use fixtures::mock_services::{FailingHistoryStore, RecordingHistoryStore};
use fixtures::test_data::{
    base_time, daily_readings, day_after, unit_variance_amounts, SUBSCRIBER,
};
use std::sync::Arc;

fn detector(amounts: &[f64]) -> AnomalyDetector {
    AnomalyDetector::new(
        Arc::new(MemoryHistoryStore::from_readings(daily_readings(amounts))),
        AnomalyConfig::default(),
    )
}

#[tokio::test]
async fn test_detect_cold_start_boundary() {
    for count in 0..5 {
        let d = detector(&vec![10.0; count]);
        assert!(!d.detect(SUBSCRIBER, 1_000.0).await.unwrap());
    }

    // 5件ちょうどで判定が始まる
    let d = detector(&[10.0; 5]);
    assert!(d.detect(SUBSCRIBER, 1_000.0).await.unwrap());
}

#[tokio::test]
async fn test_detect_zero_variance_policy() {
    let d = detector(&[10.0, 10.0, 10.0, 10.0, 10.0]);

    assert!(!d.detect(SUBSCRIBER, 10.0).await.unwrap());
    assert!(d.detect(SUBSCRIBER, 50.0).await.unwrap());
}

#[tokio::test]
async fn test_detect_unit_variance_history() {
    let d = detector(&unit_variance_amounts());

    assert!(d.detect(SUBSCRIBER, 20.0).await.unwrap());
    assert!(!d.detect(SUBSCRIBER, 10.5).await.unwrap());
}

#[tokio::test]
async fn test_detect_uses_newest_thirty_descending() {
    // 古い10件の外れ値は窓に入らない
    let mut amounts = vec![500.0; 10];
    amounts.extend(unit_variance_amounts());
    let store = Arc::new(RecordingHistoryStore::new(MemoryHistoryStore::from_readings(
        daily_readings(&amounts),
    )));
    let d = AnomalyDetector::new(store.clone(), AnomalyConfig::default());

    let verdict = d.evaluate(SUBSCRIBER, 10.0).await.unwrap();
    assert_eq!(verdict.sample_count, 30);
    assert_eq!(verdict.baseline_mean, Some(10.0));
    assert_eq!(store.last_request(), Some((30, SortOrder::Descending)));
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_detect_respects_configured_threshold() {
    let config = AnomalyConfig {
        z_threshold: 12.0,
        ..AnomalyConfig::default()
    };
    let d = AnomalyDetector::new(
        Arc::new(MemoryHistoryStore::from_readings(daily_readings(
            &unit_variance_amounts(),
        ))),
        config,
    );

    assert!(!d.detect(SUBSCRIBER, 20.0).await.unwrap());
}

#[tokio::test]
async fn test_detect_propagates_history_error() {
    let error = HistoryError::Connection("connection refused".to_string());
    let d = AnomalyDetector::new(
        Arc::new(FailingHistoryStore::new(error.clone())),
        AnomalyConfig::default(),
    );

    assert_eq!(d.detect(SUBSCRIBER, 1.0).await, Err(error));
}

#[tokio::test]
async fn test_forecast_linear_history() {
    let readings = daily_readings(&[5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0]);
    let now = day_after(&readings);
    let f = TrendForecaster::new(
        Arc::new(MemoryHistoryStore::from_readings(readings)),
        Arc::new(FixedClock(now)),
        ForecastConfig::default(),
    );

    let forecast = f.forecast_next_day(SUBSCRIBER).await.unwrap().unwrap();
    assert!((forecast - 13.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_forecast_requires_seven_readings() {
    for count in 0..7 {
        let amounts: Vec<f64> = (0..count).map(|i| 5.0 + i as f64).collect();
        let f = TrendForecaster::new(
            Arc::new(MemoryHistoryStore::from_readings(daily_readings(&amounts))),
            Arc::new(FixedClock(base_time() + Duration::days(10))),
            ForecastConfig::default(),
        );
        assert_eq!(f.forecast_next_day(SUBSCRIBER).await.unwrap(), None);
    }
}

#[tokio::test]
async fn test_forecast_is_never_negative() {
    let readings = daily_readings(&[100.0, 80.0, 60.0, 40.0, 20.0, 10.0, 1.0]);
    let now = day_after(&readings);
    let f = TrendForecaster::new(
        Arc::new(MemoryHistoryStore::from_readings(readings)),
        Arc::new(FixedClock(now)),
        ForecastConfig::default(),
    );

    assert_eq!(f.forecast_next_day(SUBSCRIBER).await.unwrap(), Some(0.0));
}

#[tokio::test]
async fn test_forecast_requests_sixty_ascending() {
    let amounts: Vec<f64> = (0..80).map(|i| i as f64).collect();
    let store = Arc::new(RecordingHistoryStore::new(MemoryHistoryStore::from_readings(
        daily_readings(&amounts),
    )));
    let f = TrendForecaster::new(
        store.clone(),
        Arc::new(FixedClock(base_time() + Duration::days(80))),
        ForecastConfig::default(),
    );

    let model = f.fit(SUBSCRIBER).await.unwrap().unwrap();
    assert_eq!(model.sample_count, 60);
    // 窓の先頭は20日目
    assert_eq!(model.anchor, base_time() + Duration::days(20));
    assert_eq!(store.last_request(), Some((60, SortOrder::Ascending)));
}

#[tokio::test]
async fn test_forecast_propagates_history_error() {
    let error = HistoryError::Query("syntax error".to_string());
    let f = TrendForecaster::new(
        Arc::new(FailingHistoryStore::new(error.clone())),
        Arc::new(FixedClock(base_time())),
        ForecastConfig::default(),
    );

    assert_eq!(f.forecast_next_day(SUBSCRIBER).await, Err(error));
}

#[tokio::test]
async fn test_repeated_calls_are_identical() {
    let readings = daily_readings(&[3.0, 9.0, 4.0, 8.0, 5.0, 7.0, 6.0, 12.0]);
    let now = day_after(&readings);
    let store = Arc::new(MemoryHistoryStore::from_readings(readings));
    let d = AnomalyDetector::new(store.clone(), AnomalyConfig::default());
    let f = TrendForecaster::new(store, Arc::new(FixedClock(now)), ForecastConfig::default());

    let first = (
        d.evaluate(SUBSCRIBER, 11.0).await.unwrap(),
        f.forecast_next_day(SUBSCRIBER).await.unwrap(),
    );
    let second = (
        d.evaluate(SUBSCRIBER, 11.0).await.unwrap(),
        f.forecast_next_day(SUBSCRIBER).await.unwrap(),
    );
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_concurrent_calls_for_same_subscriber() {
    let readings = daily_readings(&unit_variance_amounts());
    let now = day_after(&readings);
    let store = Arc::new(MemoryHistoryStore::from_readings(readings));
    let d = AnomalyDetector::new(store.clone(), AnomalyConfig::default());
    let f = TrendForecaster::new(store, Arc::new(FixedClock(now)), ForecastConfig::default());

    let mut handles = Vec::new();
    for i in 0..8 {
        let d = d.clone();
        let f = f.clone();
        handles.push(tokio::spawn(async move {
            let flagged = d.detect(SUBSCRIBER, 10.0 + i as f64).await.unwrap();
            let forecast = f.forecast_next_day(SUBSCRIBER).await.unwrap();
            (i, flagged, forecast)
        }));
    }

    let baseline = f.forecast_next_day(SUBSCRIBER).await.unwrap();
    for handle in handles {
        let (i, flagged, forecast) = handle.await.unwrap();
        // |z| = i、閾値2.5を超えるのは3以上
        assert_eq!(flagged, i >= 3);
        assert_eq!(forecast, baseline);
    }
}
