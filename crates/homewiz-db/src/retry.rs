//! Retry/backoff executor with an offline queue.
//!
//! Wraps storage operations with bounded exponential backoff. Only
//! categories the classifier marks retryable are retried; everything else
//! propagates immediately as a classified error. While offline (and with
//! offline support enabled) operations are queued instead of attempted;
//! the caller's future stays pending until the queue is replayed.
//!
//! Backoff carries no jitter, so correlated failures retry in lockstep.
//! A replay failure re-queues at the tail, which can starve FIFO ordering
//! under persistent failures; both are accepted trade-offs.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::{Mutex, oneshot};
use tracing::{debug, warn};

use homewiz_core::error::{classify, EnhancedError, ErrorCategory, ErrorLog};
use homewiz_core::store::StoreError;

/// Retry policy: total attempt ceiling and base backoff delay.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following `attempt` (1-based):
    /// `base_delay * 2^(attempt-1)`.
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Shared online/offline flag, driven by whatever connectivity signal the
/// host platform provides.
#[derive(Debug)]
pub struct Connectivity {
    online: AtomicBool,
}

impl Default for Connectivity {
    fn default() -> Self {
        Self {
            online: AtomicBool::new(true),
        }
    }
}

impl Connectivity {
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn set(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

type ReplayFuture = Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send>>;

/// A deferred operation waiting for connectivity. Running it resolves the
/// original caller through its captured channel; a retryable failure
/// leaves the caller pending so the operation can be re-queued.
struct QueuedOperation {
    label: String,
    run: Box<dyn FnMut() -> ReplayFuture + Send>,
}

/// Executor wrapping storage operations with classified retry, backoff,
/// and offline deferral.
pub struct RetryExecutor {
    policy: RetryPolicy,
    connectivity: Arc<Connectivity>,
    error_log: Arc<ErrorLog>,
    offline_support: bool,
    queue: Mutex<VecDeque<QueuedOperation>>,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy, error_log: Arc<ErrorLog>) -> Self {
        Self {
            policy,
            connectivity: Arc::new(Connectivity::default()),
            error_log,
            offline_support: true,
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Disable the offline queue: operations attempted while offline fail
    /// like any other network error.
    pub fn without_offline_support(mut self) -> Self {
        self.offline_support = false;
        self
    }

    pub fn connectivity(&self) -> Arc<Connectivity> {
        Arc::clone(&self.connectivity)
    }

    /// Number of operations waiting for connectivity.
    pub async fn queued(&self) -> usize {
        self.queue.lock().await.len()
    }

    /// Flip the connectivity flag. Going online replays the offline queue
    /// sequentially in FIFO order before returning.
    pub async fn set_online(&self, online: bool) {
        self.connectivity.set(online);
        if online {
            self.drain_queue().await;
        }
    }

    /// Run `operation`, retrying transient failures with exponential
    /// backoff up to the attempt ceiling. While offline the operation is
    /// queued and this future stays pending until replay resolves it.
    pub async fn execute<T, F, Fut>(&self, label: &str, operation: F) -> Result<T, EnhancedError>
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, StoreError>> + Send + 'static,
    {
        if self.offline_support && !self.connectivity.is_online() {
            let receiver = self.enqueue(label, operation).await;
            return match receiver.await {
                Ok(result) => result,
                // Sender dropped without resolving (executor torn down).
                Err(_) => Err(EnhancedError::new(
                    ErrorCategory::Unknown,
                    "queued operation was abandoned before replay",
                )
                .with_operation(label)),
            };
        }

        self.attempt_loop(label, &operation).await
    }

    async fn attempt_loop<T, F, Fut>(&self, label: &str, operation: &F) -> Result<T, EnhancedError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut attempt = 1u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    let classified = classify(&err, label);
                    self.error_log.record(&classified);
                    if !classified.retryable || attempt >= self.policy.max_attempts {
                        return Err(classified);
                    }
                    let delay = self.policy.backoff(attempt);
                    warn!(
                        operation = label,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        category = ?classified.category,
                        "transient failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn enqueue<T, F, Fut>(
        &self,
        label: &str,
        operation: F,
    ) -> oneshot::Receiver<Result<T, EnhancedError>>
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, StoreError>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let tx = Arc::new(StdMutex::new(Some(tx)));
        let operation = Arc::new(operation);
        let label_owned = label.to_string();
        let error_log = Arc::clone(&self.error_log);

        let run: Box<dyn FnMut() -> ReplayFuture + Send> = Box::new(move || {
            let operation = Arc::clone(&operation);
            let tx = Arc::clone(&tx);
            let label = label_owned.clone();
            let error_log = Arc::clone(&error_log);
            Box::pin(async move {
                match (*operation)().await {
                    Ok(value) => {
                        if let Some(tx) = take_sender(&tx) {
                            let _ = tx.send(Ok(value));
                        }
                        Ok(())
                    }
                    Err(err) => {
                        let classified = classify(&err, &label);
                        error_log.record(&classified);
                        if classified.retryable {
                            // Leave the caller pending; the drainer will
                            // re-queue this operation at the tail.
                            Err(err)
                        } else {
                            if let Some(tx) = take_sender(&tx) {
                                let _ = tx.send(Err(classified));
                            }
                            Ok(())
                        }
                    }
                }
            })
        });

        let mut queue = self.queue.lock().await;
        queue.push_back(QueuedOperation {
            label: label.to_string(),
            run,
        });
        debug!(operation = label, depth = queue.len(), "queued while offline");
        rx
    }

    /// Replay the operations present at drain start, in FIFO order, one at
    /// a time. Retryable replay failures go back to the tail and wait for
    /// the next connectivity event.
    async fn drain_queue(&self) {
        let pending = self.queue.lock().await.len();
        for _ in 0..pending {
            let next = self.queue.lock().await.pop_front();
            let Some(mut op) = next else { break };
            match (op.run)().await {
                Ok(()) => {
                    debug!(operation = %op.label, "offline replay resolved");
                }
                Err(err) => {
                    warn!(
                        operation = %op.label,
                        error = %err,
                        "offline replay failed, re-queueing at tail"
                    );
                    self.queue.lock().await.push_back(op);
                }
            }
        }
    }
}

fn take_sender<T>(
    slot: &StdMutex<Option<oneshot::Sender<Result<T, EnhancedError>>>>,
) -> Option<oneshot::Sender<Result<T, EnhancedError>>> {
    match slot.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    }
}
