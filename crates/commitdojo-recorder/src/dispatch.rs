//! Fire-and-forget delivery of attempt records.
//!
//! Grading never waits on a recorder. Each record is delivered on its own
//! tokio task under a deadline; failures are logged and counted, never
//! surfaced to the learner.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;

use commitdojo_core::error::RecorderError;
use commitdojo_core::traits::{AttemptRecord, AttemptRecorder};

/// Spawns recorder calls in the background and tracks them until drained.
pub struct RecordDispatcher {
    recorder: Arc<dyn AttemptRecorder>,
    timeout: Duration,
    pending: Mutex<Vec<JoinHandle<()>>>,
    failures: Arc<AtomicU32>,
}

impl RecordDispatcher {
    pub fn new(recorder: Arc<dyn AttemptRecorder>, timeout: Duration) -> Self {
        Self {
            recorder,
            timeout,
            pending: Mutex::new(Vec::new()),
            failures: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn recorder_name(&self) -> &str {
        self.recorder.name()
    }

    /// Number of records that failed or timed out so far.
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Queue a record for delivery and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, record: AttemptRecord) {
        let recorder = Arc::clone(&self.recorder);
        let failures = Arc::clone(&self.failures);
        let timeout = self.timeout;

        let handle = tokio::spawn(async move {
            let exercise = record.exercise_id.clone();
            let attempt = record.attempt_number;
            let result = match tokio::time::timeout(timeout, recorder.record(&record)).await {
                Ok(result) => result,
                Err(_) => Err(RecorderError::Timeout(timeout.as_millis() as u64).into()),
            };

            match result {
                Ok(()) => {
                    tracing::debug!(recorder = recorder.name(), %exercise, attempt, "attempt recorded");
                }
                Err(e) => {
                    failures.fetch_add(1, Ordering::Relaxed);
                    let transient = e
                        .downcast_ref::<RecorderError>()
                        .is_some_and(RecorderError::is_transient);
                    tracing::warn!(
                        recorder = recorder.name(),
                        %exercise,
                        attempt,
                        transient,
                        "failed to record attempt: {e:#}"
                    );
                }
            }
        });

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Number of deliveries still running.
    pub fn in_flight(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|h| !h.is_finished())
            .count()
    }

    /// Wait up to `grace` for in-flight deliveries, then abort the rest.
    ///
    /// Returns the number of deliveries that were abandoned.
    pub async fn drain(&self, grace: Duration) -> usize {
        let handles: Vec<JoinHandle<()>> =
            std::mem::take(&mut *self.pending.lock().unwrap_or_else(|e| e.into_inner()));
        if handles.is_empty() {
            return 0;
        }

        let aborts: Vec<_> = handles.iter().map(JoinHandle::abort_handle).collect();
        if tokio::time::timeout(grace, join_all(handles)).await.is_ok() {
            return 0;
        }

        let abandoned = aborts.iter().filter(|a| !a.is_finished()).count();
        for abort in &aborts {
            abort.abort();
        }
        if abandoned > 0 {
            tracing::warn!(abandoned, "attempt records dropped at shutdown");
        }
        abandoned
    }
}
