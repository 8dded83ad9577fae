//! Engine tuning read from the environment.

use std::str::FromStr;
use std::time::Duration;

use crate::batch::BatchConfig;
use crate::error::ConfigError;
use crate::queue::QueueConfig;
use crate::throttle::ThrottlePolicy;

const SAFETY_MARGIN_VAR: &str = "SHOPIFY_SAFETY_MARGIN";
const FALLBACK_DELAY_VAR: &str = "SHOPIFY_FALLBACK_DELAY_MS";
const REST_RESTORE_RATE_VAR: &str = "SHOPIFY_REST_RESTORE_RATE";
const QUEUE_CONCURRENCY_VAR: &str = "SHOPIFY_QUEUE_CONCURRENCY";
const QUEUE_INTERVAL_VAR: &str = "SHOPIFY_QUEUE_INTERVAL_MS";
const QUEUE_INTERVAL_CAP_VAR: &str = "SHOPIFY_QUEUE_INTERVAL_CAP";
const BATCH_SIZE_VAR: &str = "SHOPIFY_BATCH_SIZE";
const BATCH_DELAY_VAR: &str = "SHOPIFY_BATCH_DELAY_MS";
const LOCATION_IDS_VAR: &str = "SHOPIFY_LOCATION_IDS";
const CURRENCY_VAR: &str = "SHOPIFY_CURRENCY";

/// Currency used for generated orders when none is configured.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Pacing, batching and seed-data settings.
///
/// Every field has a default, so an empty environment yields
/// [`EngineSettings::default`].
///
/// | Variable | Default |
/// |----------|---------|
/// | `SHOPIFY_SAFETY_MARGIN` | `0.1` |
/// | `SHOPIFY_FALLBACK_DELAY_MS` | `500` |
/// | `SHOPIFY_REST_RESTORE_RATE` | `2.0` |
/// | `SHOPIFY_QUEUE_CONCURRENCY` | `2` |
/// | `SHOPIFY_QUEUE_INTERVAL_MS` | `1000` |
/// | `SHOPIFY_QUEUE_INTERVAL_CAP` | `2` |
/// | `SHOPIFY_BATCH_SIZE` | `10` |
/// | `SHOPIFY_BATCH_DELAY_MS` | `1000` |
/// | `SHOPIFY_LOCATION_IDS` | none |
/// | `SHOPIFY_CURRENCY` | `EUR` |
#[derive(Clone, Debug, PartialEq)]
pub struct EngineSettings {
    /// Cost tracker policy.
    pub throttle: ThrottlePolicy,
    /// Batch and queue limits.
    pub batch: BatchConfig,
    /// Location IDs generated orders are tagged with and fulfilled from.
    pub locations: Vec<String>,
    /// ISO currency code for generated orders.
    pub currency: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            throttle: ThrottlePolicy::default(),
            batch: BatchConfig::default(),
            locations: Vec::new(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl EngineSettings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvValue`] when a variable is set but
    /// cannot be parsed or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvValue`] for unparsable or out-of-range values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Lookup(lookup);
        let defaults = Self::default();

        let safety_margin = env.parse_or(
            SAFETY_MARGIN_VAR,
            defaults.throttle.safety_margin,
            |m: &f64| (0.0..=1.0).contains(m),
            "expected a number between 0 and 1",
        )?;
        let fallback_delay = env.millis_or(
            FALLBACK_DELAY_VAR,
            defaults.throttle.fallback_delay,
            true,
        )?;
        let rest_restore_rate = env.parse_or(
            REST_RESTORE_RATE_VAR,
            defaults.throttle.rest_restore_rate,
            |r: &f64| r.is_finite() && *r > 0.0,
            "expected a positive number",
        )?;

        let queue_defaults = defaults.batch.queue;
        let concurrency = env.positive_or(QUEUE_CONCURRENCY_VAR, queue_defaults.concurrency())?;
        let interval = env.millis_or(QUEUE_INTERVAL_VAR, queue_defaults.interval(), false)?;
        let interval_cap =
            env.positive_or(QUEUE_INTERVAL_CAP_VAR, queue_defaults.interval_cap())?;
        let queue = QueueConfig::new(concurrency, interval, interval_cap).map_err(|e| {
            ConfigError::InvalidEnvValue {
                key: QUEUE_CONCURRENCY_VAR,
                value: concurrency.to_string(),
                reason: e.to_string(),
            }
        })?;

        let burst_size = env.positive_or(BATCH_SIZE_VAR, defaults.batch.burst_size)?;
        let inter_batch_delay =
            env.millis_or(BATCH_DELAY_VAR, defaults.batch.inter_batch_delay, true)?;

        let locations = env
            .get(LOCATION_IDS_VAR)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let currency = match env.get(CURRENCY_VAR) {
            Some(raw) => {
                let code = raw.trim().to_ascii_uppercase();
                if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(ConfigError::InvalidEnvValue {
                        key: CURRENCY_VAR,
                        value: raw,
                        reason: "expected a three-letter currency code".to_string(),
                    });
                }
                code
            }
            None => defaults.currency,
        };

        Ok(Self {
            throttle: ThrottlePolicy {
                safety_margin,
                fallback_delay,
                rest_restore_rate,
            },
            batch: BatchConfig {
                burst_size,
                inter_batch_delay,
                queue,
            },
            locations,
            currency,
        })
    }
}

struct Lookup<F>(F);

impl<F> Lookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn parse_or<T, V>(
        &self,
        key: &'static str,
        default: T,
        valid: V,
        reason: &str,
    ) -> Result<T, ConfigError>
    where
        T: FromStr,
        V: Fn(&T) -> bool,
    {
        let Some(raw) = self.get(key) else {
            return Ok(default);
        };
        raw.trim()
            .parse::<T>()
            .ok()
            .filter(|v| valid(v))
            .ok_or_else(|| ConfigError::InvalidEnvValue {
                key,
                value: raw.clone(),
                reason: reason.to_string(),
            })
    }

    fn positive_or(&self, key: &'static str, default: usize) -> Result<usize, ConfigError> {
        self.parse_or(key, default, |n| *n >= 1, "expected an integer of at least 1")
    }

    fn millis_or(
        &self,
        key: &'static str,
        default: Duration,
        allow_zero: bool,
    ) -> Result<Duration, ConfigError> {
        let reason = if allow_zero {
            "expected a whole number of milliseconds"
        } else {
            "expected a positive whole number of milliseconds"
        };
        self.parse_or(
            key,
            u64::try_from(default.as_millis()).unwrap_or(u64::MAX),
            |ms| allow_zero || *ms > 0,
            reason,
        )
        .map(Duration::from_millis)
    }
}
