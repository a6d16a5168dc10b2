//! Error categorization and backoff curve.
//!
//! This module provides functions to categorize transport errors and to compute
//! the exponential backoff applied between fetch attempts.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use super::types::AttemptFailure;

/// Creates the exponential backoff curve for one fetch operation.
///
/// The n-th element (0-based) is the lower bound of the wait after failed
/// attempt `n + 1`: `base * 2^(n + 1)`, capped at `max_delay`.
/// Jitter is added by the pacing controller, not here.
///
/// # Arguments
///
/// * `base_ms` - Backoff base in milliseconds
/// * `max_delay` - Upper cap for any single element
pub fn get_retry_strategy(base_ms: u64, max_delay: Duration) -> impl Iterator<Item = Duration> {
    // from_millis(2) yields 2, 4, 8, ... and factor() scales every element
    ExponentialBackoff::from_millis(2)
        .factor(base_ms)
        .max_delay(max_delay)
}

/// Categorizes a `reqwest::Error` into an `AttemptFailure`.
///
/// Status errors are not expected here (the executor inspects the status code
/// itself), but they are mapped for completeness.
///
/// # Arguments
///
/// * `error` - The `reqwest::Error` to categorize
pub fn categorize_reqwest_error(error: &reqwest::Error) -> AttemptFailure {
    if let Some(status) = error.status() {
        return AttemptFailure::Status(status.as_u16());
    }

    if error.is_timeout() {
        AttemptFailure::Timeout
    } else if error.is_connect() {
        AttemptFailure::Connect(error.to_string())
    } else if error.is_body() || error.is_decode() {
        AttemptFailure::Body(error.to_string())
    } else {
        AttemptFailure::Network(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_retry_strategy_doubles_from_base() {
        let delays: Vec<_> = get_retry_strategy(2000, Duration::from_secs(60))
            .take(3)
            .collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(4000),
                Duration::from_millis(8000),
                Duration::from_millis(16000)
            ]
        );
    }

    #[test]
    fn test_get_retry_strategy_respects_max_delay() {
        let max = Duration::from_secs(5);
        for delay in get_retry_strategy(2000, max).take(10) {
            assert!(delay <= max, "delay {:?} exceeds max {:?}", delay, max);
        }
    }

    #[test]
    fn test_get_retry_strategy_small_base() {
        let first = get_retry_strategy(1, Duration::from_secs(1)).next();
        assert_eq!(first, Some(Duration::from_millis(2)));
    }

    #[tokio::test]
    async fn test_categorize_connect_error() {
        // Port 9 (discard) on localhost is almost never listening
        let client = reqwest::Client::new();
        let err = client
            .get("http://127.0.0.1:9/")
            .send()
            .await
            .expect_err("nothing should listen on port 9");
        match categorize_reqwest_error(&err) {
            AttemptFailure::Connect(_) | AttemptFailure::Network(_) => {}
            other => panic!("unexpected category: {other:?}"),
        }
    }
}
