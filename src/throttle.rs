//! Cost tracking for the Admin API's leaky-bucket limits.
//!
//! GraphQL responses report a point budget in
//! `extensions.cost.throttleStatus`; REST responses report a call count in
//! `X-Shopify-Shop-Api-Call-Limit`. Both are folded into a [`RateSignal`],
//! and [`CostTracker::admission`] turns the most recent signal into an
//! [`Admission`] decision for the next request.
//!
//! The tracker holds no telemetry itself. Callers keep the latest
//! [`RateSignal`] and pass it in, so every decision is a pure function of
//! its inputs.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use shopify_data::throttle::{compute_wait, should_pause, ThrottleStatus};
//!
//! let status = ThrottleStatus::new(1000.0, 50.0, 50.0);
//! assert!(should_pause(&status, 100.0));
//! assert_eq!(compute_wait(&status, 100.0), Duration::from_secs(1));
//! ```

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::clients::{ApiCallLimit, HttpResponse};

/// Wait used when the restore rate is unknown or zero.
pub const RESTORE_INTERVAL: Duration = Duration::from_secs(1);

/// Remaining request budget reported by the API.
///
/// `currently_available` is always within `0..=maximum_available`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrottleStatus {
    maximum_available: f64,
    currently_available: f64,
    restore_rate: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawThrottleStatus {
    maximum_available: f64,
    currently_available: f64,
    restore_rate: f64,
}

impl ThrottleStatus {
    /// Creates a status, clamping the available budget into range.
    ///
    /// Negative or NaN capacities and rates are treated as zero.
    #[must_use]
    pub fn new(maximum_available: f64, currently_available: f64, restore_rate: f64) -> Self {
        let maximum_available = non_negative(maximum_available);
        Self {
            maximum_available,
            currently_available: non_negative(currently_available).min(maximum_available),
            restore_rate: non_negative(restore_rate),
        }
    }

    /// Parses a GraphQL `throttleStatus` object.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let raw: RawThrottleStatus = serde_json::from_value(value.clone()).ok()?;
        Some(Self::new(
            raw.maximum_available,
            raw.currently_available,
            raw.restore_rate,
        ))
    }

    /// Converts a REST call-limit header into a budget of calls.
    #[must_use]
    pub fn from_call_limit(limit: ApiCallLimit, restore_rate: f64) -> Self {
        Self::new(
            f64::from(limit.bucket_size),
            f64::from(limit.remaining()),
            restore_rate,
        )
    }

    /// Bucket capacity.
    #[must_use]
    pub const fn maximum_available(&self) -> f64 {
        self.maximum_available
    }

    /// Budget left right now.
    #[must_use]
    pub const fn currently_available(&self) -> f64 {
        self.currently_available
    }

    /// Budget restored per second.
    #[must_use]
    pub const fn restore_rate(&self) -> f64 {
        self.restore_rate
    }

    /// Returns the status after `elapsed` of replenishment, capped at the maximum.
    #[must_use]
    pub fn replenished(self, elapsed: Duration) -> Self {
        Self::new(
            self.maximum_available,
            self.restore_rate
                .mul_add(elapsed.as_secs_f64(), self.currently_available),
            self.restore_rate,
        )
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Rate telemetry carried by one response.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RateSignal {
    /// GraphQL cost telemetry.
    Cost {
        /// Budget after the request.
        status: ThrottleStatus,
        /// Points the request was estimated to cost.
        requested_cost: Option<f64>,
    },
    /// REST leaky-bucket header.
    CallLimit(ApiCallLimit),
    /// The response carried no telemetry.
    Absent,
}

impl RateSignal {
    /// Extracts the rate signal from a response.
    ///
    /// GraphQL cost telemetry wins over the REST header when both are present.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        if let Some(cost) = response.body.pointer("/extensions/cost") {
            if let Some(status) = cost.get("throttleStatus").and_then(ThrottleStatus::from_json) {
                return Self::Cost {
                    status,
                    requested_cost: cost.get("requestedQueryCost").and_then(Value::as_f64),
                };
            }
        }

        response
            .api_call_limit
            .map_or(Self::Absent, Self::CallLimit)
    }
}

/// The single safety policy shared by reads and writes.
///
/// The pause threshold for a bucket is
/// `max(requested_cost, maximum_available * safety_margin)`: keep at least
/// `safety_margin` of the bucket in reserve, and never start a request the
/// bucket cannot pay for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrottlePolicy {
    /// Fraction of the bucket to keep in reserve, in `0.0..=1.0`.
    pub safety_margin: f64,
    /// Delay between requests when a response carries no telemetry.
    pub fallback_delay: Duration,
    /// Calls restored per second for REST call-limit buckets.
    pub rest_restore_rate: f64,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            safety_margin: 0.1,
            fallback_delay: Duration::from_millis(500),
            rest_restore_rate: 2.0,
        }
    }
}

impl ThrottlePolicy {
    /// Budget that must be available before the next request is sent.
    #[must_use]
    pub fn safety_threshold(&self, status: &ThrottleStatus, requested_cost: Option<f64>) -> f64 {
        let reserve = status.maximum_available * self.safety_margin.clamp(0.0, 1.0);
        reserve.max(requested_cost.map_or(0.0, non_negative))
    }
}

/// Returns `true` when the available budget is below `safety_threshold`.
#[must_use]
pub fn should_pause(status: &ThrottleStatus, safety_threshold: f64) -> bool {
    status.currently_available < safety_threshold
}

/// Time until the bucket refills to `safety_threshold`, rounded up to whole seconds.
///
/// Never negative. A bucket with no restore rate waits one
/// [`RESTORE_INTERVAL`].
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compute_wait(status: &ThrottleStatus, safety_threshold: f64) -> Duration {
    let deficit = safety_threshold - status.currently_available;
    if deficit.is_nan() || deficit <= 0.0 {
        return Duration::ZERO;
    }
    if status.restore_rate <= 0.0 {
        return RESTORE_INTERVAL;
    }

    let seconds = (deficit / status.restore_rate).ceil();
    Duration::from_millis((seconds * 1000.0) as u64)
}

/// Whether the next request may go now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Send immediately.
    Proceed,
    /// Sleep for the given duration first.
    Wait(Duration),
}

impl Admission {
    /// Returns the wait, if any.
    #[must_use]
    pub const fn delay(&self) -> Option<Duration> {
        match self {
            Self::Proceed => None,
            Self::Wait(d) => Some(*d),
        }
    }
}

/// Turns the most recent [`RateSignal`] into an [`Admission`] decision.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CostTracker {
    policy: ThrottlePolicy,
}

impl CostTracker {
    /// Creates a tracker with the given policy.
    #[must_use]
    pub const fn new(policy: ThrottlePolicy) -> Self {
        Self { policy }
    }

    /// Returns the tracker's policy.
    #[must_use]
    pub const fn policy(&self) -> &ThrottlePolicy {
        &self.policy
    }

    /// Decides whether the next request may go, given the last response's signal.
    ///
    /// - no response yet: proceed
    /// - cost or call-limit telemetry: wait [`compute_wait`] when below the threshold
    /// - no telemetry: wait the fixed fallback delay
    #[must_use]
    pub fn admission(&self, last: Option<&RateSignal>) -> Admission {
        let Some(signal) = last else {
            return Admission::Proceed;
        };

        let (status, requested_cost) = match *signal {
            RateSignal::Cost {
                status,
                requested_cost,
            } => (status, requested_cost),
            RateSignal::CallLimit(limit) => (
                ThrottleStatus::from_call_limit(limit, self.policy.rest_restore_rate),
                Some(1.0),
            ),
            RateSignal::Absent if self.policy.fallback_delay.is_zero() => {
                return Admission::Proceed
            }
            RateSignal::Absent => return Admission::Wait(self.policy.fallback_delay),
        };

        let threshold = self.policy.safety_threshold(&status, requested_cost);
        if should_pause(&status, threshold) {
            Admission::Wait(compute_wait(&status, threshold))
        } else {
            Admission::Proceed
        }
    }

    /// Sleeps as long as [`CostTracker::admission`] requires and returns the time waited.
    pub async fn pace(&self, last: Option<&RateSignal>) -> Duration {
        match self.admission(last) {
            Admission::Proceed => Duration::ZERO,
            Admission::Wait(delay) => {
                tracing::warn!(
                    wait_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "throttle budget low, pausing before next request"
                );
                tokio::time::sleep(delay).await;
                delay
            }
        }
    }
}
