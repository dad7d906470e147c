//! Mock Services
//!
//! テスト用のモック履歴ストア

use async_trait::async_trait;
use energy_analytics::{HistoryError, HistoryStore, Reading, SortOrder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 常に失敗する履歴ストア
pub struct FailingHistoryStore {
    pub error: HistoryError,
}

impl FailingHistoryStore {
    pub fn new(error: HistoryError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl HistoryStore for FailingHistoryStore {
    async fn fetch_recent(
        &self,
        _subscriber_id: &str,
        _limit: usize,
        _order: SortOrder,
    ) -> Result<Vec<Reading>, HistoryError> {
        Err(self.error.clone())
    }
}

/// 呼び出し内容を記録する履歴ストア
pub struct RecordingHistoryStore<S> {
    inner: S,
    calls: Arc<AtomicUsize>,
    last_request: std::sync::Mutex<Option<(usize, SortOrder)>>,
}

impl<S: HistoryStore> RecordingHistoryStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
            last_request: std::sync::Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(usize, SortOrder)> {
        *self.last_request.lock().unwrap()
    }
}

#[async_trait]
impl<S: HistoryStore> HistoryStore for RecordingHistoryStore<S> {
    async fn fetch_recent(
        &self,
        subscriber_id: &str,
        limit: usize,
        order: SortOrder,
    ) -> Result<Vec<Reading>, HistoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((limit, order));
        self.inner.fetch_recent(subscriber_id, limit, order).await
    }
}
