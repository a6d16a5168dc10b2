//! Human-like request pacing.
//!
//! A randomized delay is taken before the first attempt of every fetch and
//! between retries, where the window grows exponentially with the attempt
//! number. Actual sleeping is delegated to a `Sleeper` so tests can observe
//! the delays without waiting for them.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use rand::Rng;

use crate::config::{Config, MAX_RETRY_ATTEMPTS};
use crate::error_handling::get_retry_strategy;

/// Suspends the caller for a given duration.
///
/// Implementations must be cancel-safe: dropping the returned future abandons
/// the wait.
pub trait Sleeper: Send + Sync {
    /// Resolves once `duration` has passed.
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Delay windows used by the pacing controller.
#[derive(Debug, Clone)]
pub struct PacingSettings {
    /// Window for the delay before the first attempt
    pub initial_min: Duration,
    /// Upper bound of that window
    pub initial_max: Duration,
    /// Backoff base; failed attempt `n` waits at least `base * 2^n`
    pub retry_base: Duration,
    /// Width of the random window added above the backoff
    pub retry_jitter: Duration,
    /// Cap on the backoff lower bound
    pub retry_max: Duration,
}

impl PacingSettings {
    /// Converts the millisecond and second options of `config`.
    pub fn from_config(config: &Config) -> Self {
        PacingSettings {
            initial_min: Duration::from_millis(config.initial_delay_min_ms),
            initial_max: Duration::from_millis(config.initial_delay_max_ms),
            retry_base: Duration::from_millis(config.retry_base_delay_ms),
            retry_jitter: Duration::from_millis(config.retry_jitter_ms),
            retry_max: Duration::from_secs(config.retry_max_delay_secs),
        }
    }
}

/// Picks a uniformly random duration in `[min, max]` at millisecond granularity.
///
/// An inverted window collapses to `min`.
pub fn random_duration(min: Duration, max: Duration) -> Duration {
    let min_ms = min.as_millis() as u64;
    let max_ms = max.as_millis() as u64;
    if max_ms <= min_ms {
        return min;
    }
    Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
}

/// Inserts randomized delays in front of fetch attempts.
#[derive(Clone)]
pub struct PacingController {
    settings: PacingSettings,
    sleeper: Arc<dyn Sleeper>,
}

impl PacingController {
    /// Creates a controller that waits through `sleeper`.
    pub fn new(settings: PacingSettings, sleeper: Arc<dyn Sleeper>) -> Self {
        PacingController { settings, sleeper }
    }

    /// Suspends for a random duration in `[min, max]` and returns the duration taken.
    pub async fn delay(&self, min: Duration, max: Duration) -> Duration {
        let duration = random_duration(min, max);
        self.sleeper.sleep(duration).await;
        duration
    }

    /// Delay taken once before the first attempt of a fetch operation.
    pub async fn initial_delay(&self) -> Duration {
        let duration = self
            .delay(self.settings.initial_min, self.settings.initial_max)
            .await;
        log::debug!("Initial pacing delay: {}ms", duration.as_millis());
        duration
    }

    /// Backoff window after failed attempt `attempt` (1-based).
    pub fn backoff_window(&self, attempt: u32) -> (Duration, Duration) {
        // A fetch never makes more than MAX_RETRY_ATTEMPTS attempts
        let index = attempt.clamp(1, MAX_RETRY_ATTEMPTS) as usize - 1;
        let floor = get_retry_strategy(
            self.settings.retry_base.as_millis() as u64,
            self.settings.retry_max,
        )
        .nth(index)
        .unwrap_or(self.settings.retry_max);
        (floor, floor.saturating_add(self.settings.retry_jitter))
    }

    /// Waits out the backoff after failed attempt `attempt` (1-based).
    pub async fn backoff(&self, attempt: u32) -> Duration {
        let (min, max) = self.backoff_window(attempt);
        let duration = self.delay(min, max).await;
        log::debug!(
            "Backing off {}ms after attempt {}",
            duration.as_millis(),
            attempt
        );
        duration
    }
}
