//! Batch submission of independent write operations.
//!
//! [`BatchSubmitter::run`] builds `total` tasks from a factory, releases them
//! in bursts of at most `burst_size` with a fixed delay between bursts, and
//! pushes every task through a [`BoundedQueue`]. Before sending, each task
//! paces itself with the [`CostTracker`] using the most recent
//! [`RateSignal`] reported by any task (last write wins).
//!
//! Every index gets exactly one [`BatchResult`], whatever happens:
//!
//! - a failed submission records [`Outcome::Failure`] with the error message
//! - a panicking submitter records `"task aborted"`
//! - after a fatal auth error no further bursts are released, queued tasks
//!   that have not started record `"skipped: ..."`, running tasks drain, and
//!   [`BatchReport::halted`] carries the reason
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_data::batch::{BatchConfig, BatchSubmitter};
//! use shopify_data::throttle::CostTracker;
//!
//! let submitter = BatchSubmitter::new(BatchConfig::default(), CostTracker::default());
//! let report = submitter
//!     .run(25, |_| generator.order_input(), Arc::new(OrderSubmitter::new(client)))
//!     .await;
//! println!("attempted {}, succeeded {}", report.attempted(), report.succeeded());
//! ```

mod ledger;

pub use ledger::{BatchReport, BatchResult, FailureEntry, Outcome, RemoteRecord, SuccessEntry};

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::queue::{BoundedQueue, QueueConfig};
use crate::throttle::{CostTracker, RateSignal};
use ledger::Ledger;

/// Burst and queue limits for a batch run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Tasks released per burst. Zero is treated as one.
    pub burst_size: usize,
    /// Pause between releasing one burst and the next.
    pub inter_batch_delay: Duration,
    /// Limits of the queue every task passes through.
    pub queue: QueueConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            burst_size: 10,
            inter_batch_delay: Duration::from_secs(1),
            queue: QueueConfig::default(),
        }
    }
}

/// One unit of work: a payload and its submission index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchTask<P> {
    /// Submission index, starting at 0.
    pub index: usize,
    /// The write payload.
    pub payload: P,
}

/// Why a submission failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitFailure {
    /// Message recorded in the ledger.
    pub reason: String,
    /// Whether the run must stop releasing work (authentication failures).
    pub fatal: bool,
}

impl SubmitFailure {
    /// A failure that only affects its own task.
    #[must_use]
    pub fn recoverable(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            fatal: false,
        }
    }

    /// A failure that halts the run.
    #[must_use]
    pub fn fatal(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            fatal: true,
        }
    }
}

/// The result of one submission plus the rate telemetry its response carried.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    /// Created record or failure.
    pub result: Result<RemoteRecord, SubmitFailure>,
    /// Rate signal from the response, if a response arrived.
    pub rate: Option<RateSignal>,
}

/// Sends one payload to the remote store.
#[async_trait]
pub trait Submit<P: Send + Sync>: Send + Sync {
    /// Submits `task` and reports the outcome. Must not panic on remote errors.
    async fn submit(&self, task: &BatchTask<P>) -> Submission;
}

/// State shared by every task of one run.
struct RunState {
    tracker: CostTracker,
    last_rate: Mutex<Option<RateSignal>>,
    ledger: Ledger,
    halt: OnceLock<String>,
}

/// Drives a fixed number of submissions to completion.
#[derive(Clone, Copy, Debug, Default)]
pub struct BatchSubmitter {
    config: BatchConfig,
    tracker: CostTracker,
}

impl BatchSubmitter {
    /// Creates a submitter.
    #[must_use]
    pub const fn new(config: BatchConfig, tracker: CostTracker) -> Self {
        Self { config, tracker }
    }

    /// Returns the batch configuration.
    #[must_use]
    pub const fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Runs `total` submissions and returns one result per index.
    ///
    /// `factory` is called once per index, in index order, when that index's
    /// burst is released. The call returns once every released task has
    /// finished.
    pub async fn run<P, F, S>(&self, total: usize, mut factory: F, submitter: Arc<S>) -> BatchReport
    where
        P: Send + Sync + 'static,
        F: FnMut(usize) -> P,
        S: Submit<P> + ?Sized + 'static,
    {
        let burst_size = self.config.burst_size.max(1);
        let queue = BoundedQueue::new(self.config.queue);
        let state = Arc::new(RunState {
            tracker: self.tracker,
            last_rate: Mutex::new(None),
            ledger: Ledger::new(total),
            halt: OnceLock::new(),
        });

        let mut handles = Vec::with_capacity(total);
        let mut batch_sizes = Vec::new();
        let mut dispatched = 0usize;
        let mut next_release = Instant::now();

        while dispatched < total {
            tokio::time::sleep_until(next_release).await;
            if state.halt.get().is_some() {
                break;
            }

            let size = burst_size.min(total - dispatched);
            batch_sizes.push(size);
            tracing::debug!(
                batch = batch_sizes.len(),
                size,
                remaining = total - dispatched - size,
                "releasing batch"
            );

            for index in dispatched..dispatched + size {
                let task = BatchTask {
                    index,
                    payload: factory(index),
                };
                let state = Arc::clone(&state);
                let submitter = Arc::clone(&submitter);
                handles.push((index, queue.add(run_task(state, submitter, task))));
            }
            dispatched += size;
            next_release = Instant::now() + self.config.inter_batch_delay;
        }

        queue.on_idle().await;

        for (index, handle) in handles {
            if handle.await.is_err() {
                tracing::error!(index, "task aborted before recording a result");
                state
                    .ledger
                    .record(index, Outcome::Failure("task aborted".to_string()))
                    .await;
            }
        }

        let halted = state.halt.get().cloned();
        if let Some(reason) = &halted {
            state
                .ledger
                .fill(dispatched..total, &Outcome::Failure(format!("skipped: {reason}")))
                .await;
        }

        BatchReport::new(state.ledger.take_results().await, batch_sizes, halted)
    }
}

async fn run_task<P, S>(state: Arc<RunState>, submitter: Arc<S>, task: BatchTask<P>)
where
    P: Send + Sync,
    S: Submit<P> + ?Sized,
{
    let index = task.index;

    if let Some(reason) = state.halt.get() {
        state
            .ledger
            .record(index, Outcome::Failure(format!("skipped: {reason}")))
            .await;
        return;
    }

    let last = *state.last_rate.lock().await;
    state.tracker.pace(last.as_ref()).await;

    let submission = submitter.submit(&task).await;
    if let Some(rate) = submission.rate {
        *state.last_rate.lock().await = Some(rate);
    }

    let outcome = match submission.result {
        Ok(record) => {
            tracing::info!(
                index,
                id = %record.remote_id,
                name = %record.display_name,
                "created record"
            );
            Outcome::Success(record)
        }
        Err(failure) => {
            tracing::error!(index, reason = %failure.reason, "task failed");
            if failure.fatal && state.halt.set(failure.reason.clone()).is_ok() {
                tracing::warn!(
                    index,
                    reason = %failure.reason,
                    "fatal error, no further batches will be released"
                );
            }
            Outcome::Failure(failure.reason)
        }
    };

    state.ledger.record(index, outcome).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::throttle::ThrottlePolicy;

    struct Echo;

    #[async_trait]
    impl Submit<u32> for Echo {
        async fn submit(&self, task: &BatchTask<u32>) -> Submission {
            Submission {
                result: Ok(RemoteRecord {
                    remote_id: format!("gid://test/{}", task.payload),
                    display_name: format!("#{}", task.index),
                }),
                rate: None,
            }
        }
    }

    fn fast_config(burst_size: usize) -> BatchConfig {
        BatchConfig {
            burst_size,
            inter_batch_delay: Duration::from_millis(100),
            queue: QueueConfig::new(8, Duration::from_millis(10), 8).unwrap(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = BatchConfig::default();
        assert_eq!(config.burst_size, 10);
        assert_eq!(config.inter_batch_delay, Duration::from_secs(1));
        assert_eq!(config.queue, QueueConfig::default());
    }

    #[test]
    fn test_submit_failure_constructors() {
        assert!(!SubmitFailure::recoverable("x").fatal);
        assert!(SubmitFailure::fatal("x").fatal);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_tasks_yields_empty_report() {
        let report = BatchSubmitter::new(fast_config(4), CostTracker::default())
            .run(0, |i| i as u32, Arc::new(Echo))
            .await;
        assert_eq!(report.attempted(), 0);
        assert!(report.batch_sizes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_burst_size_is_treated_as_one() {
        let report = BatchSubmitter::new(fast_config(0), CostTracker::default())
            .run(3, |i| i as u32, Arc::new(Echo))
            .await;
        assert_eq!(report.batch_sizes(), &[1, 1, 1]);
        assert_eq!(report.succeeded(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_factory_sees_every_index_once() {
        let mut seen = Vec::new();
        let report = BatchSubmitter::new(
            fast_config(2),
            CostTracker::new(ThrottlePolicy::default()),
        )
        .run(
            5,
            |i| {
                seen.push(i);
                (i * 10) as u32
            },
            Arc::new(Echo),
        )
        .await;

        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(report.successes()[4].remote_id, "gid://test/40");
    }
}
