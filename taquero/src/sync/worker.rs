//! SyncWorker — background worker that mirrors local mutations to the sheet
//!
//! Stores enqueue requests without waiting; the worker posts them one at a
//! time in enqueue order, so two quick edits of the same record reach the
//! sheet in the order they were made. A request that still fails after the
//! retries is logged and kept in [`SyncStatus::failures`]; the local change
//! is never rolled back.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use shared::{AppError, AppResult, ErrorCode, SyncRequest};
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::RemoteSheet;

/// Max retry attempts after the first failure
const MAX_RETRIES: u32 = 3;
/// Initial retry delay, doubled after each attempt
const INITIAL_RETRY_DELAY_MS: u64 = 500;

/// Retry schedule for transient failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            initial_delay: Duration::from_millis(INITIAL_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// No retries (tests)
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::ZERO,
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay.saturating_mul(1 << attempt.min(16))
    }
}

/// A request that could not be delivered
#[derive(Debug, Clone)]
pub struct FailedSync {
    pub request: SyncRequest,
    pub error: AppError,
    pub failed_at: DateTime<Utc>,
}

/// Counters shared between the handle and the worker
#[derive(Debug, Default)]
pub struct SyncStatus {
    pending: AtomicUsize,
    pushed: AtomicU64,
    failures: Mutex<Vec<FailedSync>>,
    drained: Notify,
}

impl SyncStatus {
    /// Requests enqueued but not yet finished (pushed or given up)
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Requests the sheet accepted
    pub fn pushed(&self) -> u64 {
        self.pushed.load(Ordering::SeqCst)
    }

    /// Requests that were given up on
    pub fn failures(&self) -> Vec<FailedSync> {
        self.failures.lock().clone()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.lock().len()
    }

    fn finish_one(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.drained.notify_waiters();
        }
    }
}

/// Cheap cloneable sender held by the stores
#[derive(Debug, Clone)]
pub struct SyncHandle {
    tx: mpsc::UnboundedSender<SyncRequest>,
    status: Arc<SyncStatus>,
}

impl SyncHandle {
    /// Queue a request; returns immediately
    pub fn enqueue(&self, request: SyncRequest) -> AppResult<()> {
        self.status.pending.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(request).is_err() {
            self.status.finish_one();
            return Err(AppError::new(ErrorCode::SyncQueueClosed));
        }
        Ok(())
    }

    pub fn status(&self) -> &Arc<SyncStatus> {
        &self.status
    }

    /// Wait until every queued request is finished or `timeout` elapses
    ///
    /// Returns `true` when the queue drained in time.
    pub async fn settle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let notified = self.status.drained.notified();
            if self.status.pending() == 0 {
                return true;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.status.pending() == 0;
            }
        }
    }
}

pub struct SyncWorker {
    remote: Arc<dyn RemoteSheet>,
    rx: mpsc::UnboundedReceiver<SyncRequest>,
    status: Arc<SyncStatus>,
    retry: RetryPolicy,
    shutdown: CancellationToken,
}

impl SyncWorker {
    /// Create a worker and the handle feeding it
    pub fn new(remote: Arc<dyn RemoteSheet>, shutdown: CancellationToken) -> (Self, SyncHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let status = Arc::new(SyncStatus::default());
        let worker = Self {
            remote,
            rx,
            status: status.clone(),
            retry: RetryPolicy::default(),
            shutdown,
        };
        (worker, SyncHandle { tx, status })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Spawn the worker on the current runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run until shutdown is requested or every handle is dropped
    ///
    /// On shutdown the requests already queued are still delivered.
    pub async fn run(mut self) {
        tracing::info!("SyncWorker started");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    tracing::info!("SyncWorker shutting down, flushing {} queued", self.status.pending());
                    while let Ok(request) = self.rx.try_recv() {
                        self.deliver(request).await;
                    }
                    break;
                }

                next = self.rx.recv() => {
                    match next {
                        Some(request) => self.deliver(request).await,
                        None => {
                            tracing::info!("All sync handles dropped, SyncWorker stopping");
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!(
            pushed = self.status.pushed(),
            failed = self.status.failure_count(),
            "SyncWorker stopped"
        );
    }

    /// Push one request with retries, then record the outcome
    async fn deliver(&self, request: SyncRequest) {
        match self.push_with_retry(&request).await {
            Ok(()) => {
                self.status.pushed.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(
                    action = %request.action,
                    sheet = %request.sheet,
                    id = %request.id,
                    "Synced"
                );
            }
            Err(error) => {
                tracing::warn!(
                    action = %request.action,
                    sheet = %request.sheet,
                    id = %request.id,
                    code = %error.code,
                    "Sync failed, local change kept: {error}"
                );
                self.status.failures.lock().push(FailedSync {
                    request,
                    error,
                    failed_at: Utc::now(),
                });
            }
        }
        self.status.finish_one();
    }

    async fn push_with_retry(&self, request: &SyncRequest) -> AppResult<()> {
        let mut attempt = 0;
        loop {
            match self.remote.push(request).await {
                Ok(()) => return Ok(()),
                Err(e) if e.code == ErrorCode::RemoteRequestFailed && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    attempt += 1;
                    tracing::debug!(attempt, ?delay, "Sync push failed, retrying: {e}");
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        // Stop backing off on shutdown; one last try below
                        _ = self.shutdown.cancelled() => {
                            return self.remote.push(request).await;
                        }
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}
