//! Bounded concurrency queue.
//!
//! [`BoundedQueue`] admits work under two independent limits:
//!
//! - at most `concurrency` tasks run at once
//! - at most `interval_cap` tasks start within any fixed `interval` window
//!
//! Admission is strictly FIFO: one scheduler task pulls jobs off a channel
//! in submission order, waits for a free slot and for the pacing window,
//! then spawns the job. A slot is released when the job finishes, whether
//! it returned normally or panicked, so one failing task never blocks or
//! cancels its siblings.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use shopify_data::queue::{BoundedQueue, QueueConfig};
//!
//! let queue = BoundedQueue::new(QueueConfig::new(2, Duration::from_secs(1), 2)?);
//! let handle = queue.add(async { 40 + 2 });
//! queue.on_idle().await;
//! assert_eq!(handle.await?, 42);
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch, Semaphore};
use tokio::time::Instant;

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Invalid queue limits.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueConfigError {
    /// `concurrency` must be at least 1.
    #[error("queue concurrency must be at least 1")]
    ZeroConcurrency,
    /// `interval` must be longer than zero.
    #[error("queue interval must be greater than zero")]
    ZeroInterval,
    /// `interval_cap` must be at least 1.
    #[error("queue interval cap must be at least 1")]
    ZeroIntervalCap,
}

/// A task that did not produce a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The task panicked or its runtime shut down before it finished.
    #[error("queued task was aborted before completing")]
    Aborted,
}

/// Validated queue limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueConfig {
    concurrency: usize,
    interval: Duration,
    interval_cap: usize,
}

impl QueueConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`QueueConfigError`] when any limit is zero.
    pub fn new(
        concurrency: usize,
        interval: Duration,
        interval_cap: usize,
    ) -> Result<Self, QueueConfigError> {
        if concurrency == 0 {
            return Err(QueueConfigError::ZeroConcurrency);
        }
        if interval.is_zero() {
            return Err(QueueConfigError::ZeroInterval);
        }
        if interval_cap == 0 {
            return Err(QueueConfigError::ZeroIntervalCap);
        }

        Ok(Self {
            concurrency,
            interval,
            interval_cap,
        })
    }

    /// Maximum number of tasks in flight.
    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Length of one pacing window.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Maximum admissions per window.
    #[must_use]
    pub const fn interval_cap(&self) -> usize {
        self.interval_cap
    }
}

impl Default for QueueConfig {
    /// Two in flight, two starts per second.
    fn default() -> Self {
        Self {
            concurrency: 2,
            interval: Duration::from_secs(1),
            interval_cap: 2,
        }
    }
}

/// Fixed-window start pacing.
#[derive(Debug)]
struct Pacer {
    interval: Duration,
    cap: usize,
    window_end: Option<Instant>,
    admitted: usize,
}

impl Pacer {
    const fn new(config: &QueueConfig) -> Self {
        Self {
            interval: config.interval,
            cap: config.interval_cap,
            window_end: None,
            admitted: 0,
        }
    }

    /// Waits until the current window has room, then takes one admission.
    async fn admit(&mut self) {
        loop {
            let now = Instant::now();
            match self.window_end {
                Some(end) if now < end => {
                    if self.admitted < self.cap {
                        self.admitted += 1;
                        return;
                    }
                    tokio::time::sleep_until(end).await;
                }
                _ => {
                    self.window_end = Some(now + self.interval);
                    self.admitted = 1;
                    return;
                }
            }
        }
    }
}

/// Decrements the pending count when dropped.
struct PendingGuard(Arc<watch::Sender<usize>>);

impl PendingGuard {
    fn new(pending: &Arc<watch::Sender<usize>>) -> Self {
        pending.send_modify(|n| *n += 1);
        Self(Arc::clone(pending))
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Handle to one queued task's result.
///
/// Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct TaskHandle<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T, QueueError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.map_err(|_| QueueError::Aborted))
    }
}

/// A queue that bounds how many tasks run at once and how fast they start.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone, Debug)]
pub struct BoundedQueue {
    config: QueueConfig,
    jobs: mpsc::UnboundedSender<Job>,
    pending: Arc<watch::Sender<usize>>,
}

impl BoundedQueue {
    /// Creates a queue and starts its scheduler.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(config: QueueConfig) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        let (pending, _) = watch::channel(0usize);

        tokio::spawn(Self::schedule(rx, config));

        Self {
            config,
            jobs,
            pending: Arc::new(pending),
        }
    }

    /// Returns the queue's limits.
    #[must_use]
    pub const fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Enqueues a task.
    ///
    /// The task starts once a concurrency slot is free and the pacing window
    /// allows it. The returned handle resolves to the task's output, or to
    /// [`QueueError::Aborted`] if it panicked.
    pub fn add<F, T>(&self, task: F) -> TaskHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let guard = PendingGuard::new(&self.pending);

        let job: Job = Box::pin(async move {
            let output = task.await;
            let _ = tx.send(output);
            drop(guard);
        });

        // The scheduler lives as long as any sender; a failed send drops the
        // job, which releases the guard and resolves the handle as aborted.
        let _ = self.jobs.send(job);

        TaskHandle { rx }
    }

    /// Number of tasks enqueued or running.
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.pending.borrow()
    }

    /// Waits until every enqueued and running task has finished.
    pub async fn on_idle(&self) {
        let mut rx = self.pending.subscribe();
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    async fn schedule(mut rx: mpsc::UnboundedReceiver<Job>, config: QueueConfig) {
        let permits = Arc::new(Semaphore::new(config.concurrency));
        let mut pacer = Pacer::new(&config);

        while let Some(job) = rx.recv().await {
            let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                break;
            };
            pacer.admit().await;

            tokio::spawn(async move {
                job.await;
                drop(permit);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_rejects_zero_limits() {
        assert_eq!(
            QueueConfig::new(0, Duration::from_secs(1), 1),
            Err(QueueConfigError::ZeroConcurrency)
        );
        assert_eq!(
            QueueConfig::new(1, Duration::ZERO, 1),
            Err(QueueConfigError::ZeroInterval)
        );
        assert_eq!(
            QueueConfig::new(1, Duration::from_secs(1), 0),
            Err(QueueConfigError::ZeroIntervalCap)
        );
    }

    #[test]
    fn test_default_config() {
        let config = QueueConfig::default();
        assert_eq!(config.concurrency(), 2);
        assert_eq!(config.interval(), Duration::from_secs(1));
        assert_eq!(config.interval_cap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacer_opens_new_window_after_interval() {
        let config = QueueConfig::new(1, Duration::from_secs(1), 2).unwrap();
        let mut pacer = Pacer::new(&config);
        let start = Instant::now();

        pacer.admit().await;
        pacer.admit().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        pacer.admit().await;
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_count_tracks_work() {
        let queue = BoundedQueue::new(QueueConfig::default());
        assert_eq!(queue.pending(), 0);

        let a = queue.add(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            1
        });
        let b = queue.add(async { 2 });
        assert_eq!(queue.pending(), 2);

        queue.on_idle().await;
        assert_eq!(queue.pending(), 0);
        assert_eq!(a.await, Ok(1));
        assert_eq!(b.await, Ok(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_idle_returns_immediately_when_empty() {
        let queue = BoundedQueue::new(QueueConfig::default());
        queue.on_idle().await;
        assert_eq!(queue.pending(), 0);
    }
}
