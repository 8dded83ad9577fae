//! Per-index outcome ledger and the final report.

use tokio::sync::Mutex;

/// A record created on the remote store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteRecord {
    /// Global ID returned by the API.
    pub remote_id: String,
    /// Human-readable name, such as an order name or product title.
    pub display_name: String,
}

/// What happened to one task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The record was created.
    Success(RemoteRecord),
    /// The task failed; the reason is the server or transport message.
    Failure(String),
}

impl Outcome {
    /// Returns `true` for [`Outcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// The outcome recorded for one task index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchResult {
    /// Submission index, starting at 0.
    pub index: usize,
    /// The task's outcome.
    pub outcome: Outcome,
}

/// A successful task as handed to reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuccessEntry {
    /// Display name of the created record.
    pub label: String,
    /// Global ID of the created record.
    pub remote_id: String,
}

/// A failed task as handed to reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureEntry {
    /// Submission index.
    pub index: usize,
    /// Why it failed.
    pub reason: String,
}

/// Slots for every index of a run, filled as tasks finish.
///
/// Tasks complete in any order; each writes only its own slot.
#[derive(Debug)]
pub(crate) struct Ledger {
    slots: Mutex<Vec<Option<Outcome>>>,
}

impl Ledger {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            slots: Mutex::new(vec![None; total]),
        }
    }

    /// Records `outcome` for `index`. The first outcome for an index wins.
    pub(crate) async fn record(&self, index: usize, outcome: Outcome) {
        let mut slots = self.slots.lock().await;
        if let Some(slot @ None) = slots.get_mut(index) {
            *slot = Some(outcome);
        }
    }

    /// Records `outcome` for every index in `range` that has none yet.
    pub(crate) async fn fill(&self, range: std::ops::Range<usize>, outcome: &Outcome) {
        let mut slots = self.slots.lock().await;
        for slot in slots.iter_mut().skip(range.start).take(range.len()) {
            if slot.is_none() {
                *slot = Some(outcome.clone());
            }
        }
    }

    /// Takes the results in index order, leaving the ledger empty.
    pub(crate) async fn take_results(&self) -> Vec<BatchResult> {
        let slots = std::mem::take(&mut *self.slots.lock().await);
        slots
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| BatchResult {
                index,
                outcome: outcome
                    .unwrap_or_else(|| Outcome::Failure("task did not report a result".to_string())),
            })
            .collect()
    }
}

/// The full outcome of a batch run, one result per index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    results: Vec<BatchResult>,
    batch_sizes: Vec<usize>,
    halted: Option<String>,
}

impl BatchReport {
    pub(crate) const fn new(
        results: Vec<BatchResult>,
        batch_sizes: Vec<usize>,
        halted: Option<String>,
    ) -> Self {
        Self {
            results,
            batch_sizes,
            halted,
        }
    }

    /// Every result, ordered by index.
    #[must_use]
    pub fn results(&self) -> &[BatchResult] {
        &self.results
    }

    /// Sizes of the batches that were released, in release order.
    #[must_use]
    pub fn batch_sizes(&self) -> &[usize] {
        &self.batch_sizes
    }

    /// Why the run stopped early, if a fatal error halted it.
    #[must_use]
    pub fn halted(&self) -> Option<&str> {
        self.halted.as_deref()
    }

    /// Number of tasks the run was asked to perform.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    /// Number of tasks that created a record.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    /// Number of tasks that failed or were skipped.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Successful tasks in index order.
    #[must_use]
    pub fn successes(&self) -> Vec<SuccessEntry> {
        self.results
            .iter()
            .filter_map(|r| match &r.outcome {
                Outcome::Success(record) => Some(SuccessEntry {
                    label: record.display_name.clone(),
                    remote_id: record.remote_id.clone(),
                }),
                Outcome::Failure(_) => None,
            })
            .collect()
    }

    /// Failed tasks in index order.
    #[must_use]
    pub fn failures(&self) -> Vec<FailureEntry> {
        self.results
            .iter()
            .filter_map(|r| match &r.outcome {
                Outcome::Failure(reason) => Some(FailureEntry {
                    index: r.index,
                    reason: reason.clone(),
                }),
                Outcome::Success(_) => None,
            })
            .collect()
    }
}
