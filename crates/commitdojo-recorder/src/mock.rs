//! In-memory recorders.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use commitdojo_core::error::RecorderError;
use commitdojo_core::traits::{AttemptRecord, AttemptRecorder};

/// Drops every record. Used when no recorder is configured.
pub struct NullRecorder;

#[async_trait]
impl AttemptRecorder for NullRecorder {
    fn name(&self) -> &str {
        "none"
    }

    async fn record(&self, _record: &AttemptRecord) -> anyhow::Result<()> {
        Ok(())
    }
}

/// A mock recorder for testing dispatch without touching disk or network.
///
/// Keeps every record it receives and can be told to fail or stall.
#[derive(Default)]
pub struct MockRecorder {
    records: Mutex<Vec<AttemptRecord>>,
    call_count: AtomicU32,
    fail: AtomicBool,
    delay: Option<Duration>,
}

impl MockRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder that waits `delay` before accepting each record.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Make subsequent calls fail with a network error.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }

    /// Number of calls made, including failed ones.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Records accepted so far.
    pub fn records(&self) -> Vec<AttemptRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl AttemptRecorder for MockRecorder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn record(&self, record: &AttemptRecord) -> anyhow::Result<()> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::Relaxed) {
            return Err(RecorderError::Network("mock recorder is failing".into()).into());
        }
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record.clone());
        Ok(())
    }
}
