//! Bounded retry loop around a single page fetch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::{MAX_RESPONSE_BODY_SIZE, MAX_RETRY_ATTEMPTS};
use crate::detection::{classify, PageClass};
use crate::error_handling::{
    categorize_reqwest_error, AttemptFailure, AttemptKind, FetchError, ProcessingStats,
};
use crate::identity::{IdentityPool, RequestIdentity};
use crate::pacing::PacingController;

use super::{FetchAttempt, RawPage, ResponseSnapshot};

type AttemptResult = Result<RawPage, (AttemptFailure, Option<ResponseSnapshot>)>;

/// Performs a GET with rotation, timeout, classification and bounded retries.
///
/// Every failure consumes one attempt. Before each retry the pacing controller
/// waits out an exponentially growing window and a fresh identity is drawn.
#[derive(Clone)]
pub struct RequestExecutor {
    client: reqwest::Client,
    identities: IdentityPool,
    pacing: PacingController,
    request_timeout: Duration,
    stats: Arc<ProcessingStats>,
}

impl RequestExecutor {
    /// Creates an executor drawing from `identities` for every attempt.
    pub fn new(
        client: reqwest::Client,
        identities: IdentityPool,
        pacing: PacingController,
        request_timeout: Duration,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        RequestExecutor {
            client,
            identities,
            pacing,
            request_timeout,
            stats,
        }
    }

    /// Pacing shared with the pipeline for the initial delay
    pub fn pacing(&self) -> &PacingController {
        &self.pacing
    }

    /// Fetches `url`, making at most `max_attempts` network attempts.
    ///
    /// Only a 2xx response that the block detector classifies as clean is
    /// returned. `max_attempts` is clamped to `1..=MAX_RETRY_ATTEMPTS`.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` carrying the attempt count, the last failure and
    /// the full attempt history once every attempt has failed.
    pub async fn fetch(&self, url: &str, max_attempts: u32) -> Result<RawPage, FetchError> {
        let max_attempts = max_attempts.clamp(1, MAX_RETRY_ATTEMPTS);
        let mut history = Vec::new();
        let mut last_cause = AttemptFailure::Network("no attempt made".to_string());

        for attempt in 1..=max_attempts {
            let identity = self.identities.next();
            let start = Instant::now();
            let result = self.attempt(url, identity).await;
            let elapsed = start.elapsed();

            match result {
                Ok(page) => {
                    self.stats.record_attempt(AttemptKind::Success);
                    info!(
                        "Fetched {} (status {}, {} bytes) on attempt {}/{} in {:.2}s",
                        url,
                        page.status,
                        page.body.len(),
                        attempt,
                        max_attempts,
                        elapsed.as_secs_f64()
                    );
                    history.push(FetchAttempt {
                        attempt,
                        elapsed,
                        family: identity.family(),
                        outcome: Ok(()),
                        response: Some(ResponseSnapshot {
                            status: page.status,
                            body_bytes: page.body.len(),
                        }),
                    });
                    return Ok(page);
                }
                Err((failure, response)) => {
                    self.stats.record_attempt(failure.kind());
                    warn!(
                        "Attempt {}/{} for {} failed as {} ({:?}): {}",
                        attempt,
                        max_attempts,
                        url,
                        failure.kind(),
                        identity.family(),
                        failure
                    );
                    history.push(FetchAttempt {
                        attempt,
                        elapsed,
                        family: identity.family(),
                        outcome: Err(failure.clone()),
                        response,
                    });
                    last_cause = failure;

                    if attempt < max_attempts {
                        self.pacing.backoff(attempt).await;
                    }
                }
            }
        }

        Err(FetchError {
            attempts: max_attempts,
            last_cause,
            history,
        })
    }

    /// One network attempt: send, read the body, classify.
    async fn attempt(&self, url: &str, identity: &RequestIdentity) -> AttemptResult {
        debug!("Requesting {} as {:?}", url, identity.family());
        let request = identity
            .apply_to_request_builder(self.client.get(url))
            .timeout(self.request_timeout);

        let response = request
            .send()
            .await
            .map_err(|e| (categorize_reqwest_error(&e), None))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let final_url = response.url().to_string();

        if let Some(length) = response.content_length() {
            if length > MAX_RESPONSE_BODY_SIZE as u64 {
                return Err((
                    AttemptFailure::Body(format!(
                        "declared length {length} exceeds {MAX_RESPONSE_BODY_SIZE} bytes"
                    )),
                    Some(ResponseSnapshot {
                        status,
                        body_bytes: 0,
                    }),
                ));
            }
        }

        // reqwest decompresses gzip/deflate/br transparently
        let body = response.text().await.map_err(|e| {
            (
                categorize_reqwest_error(&e),
                Some(ResponseSnapshot {
                    status,
                    body_bytes: 0,
                }),
            )
        })?;
        let snapshot = ResponseSnapshot {
            status,
            body_bytes: body.len(),
        };
        if body.len() > MAX_RESPONSE_BODY_SIZE {
            return Err((
                AttemptFailure::Body(format!(
                    "body of {} bytes exceeds {MAX_RESPONSE_BODY_SIZE} bytes",
                    body.len()
                )),
                Some(snapshot),
            ));
        }

        let page = RawPage {
            url: final_url,
            status,
            headers,
            body,
        };

        if let PageClass::Blocked(reason) = classify(&page) {
            return Err((AttemptFailure::Blocked(reason), Some(snapshot)));
        }
        if !(200..300).contains(&status) {
            return Err((AttemptFailure::Status(status), Some(snapshot)));
        }

        Ok(page)
    }
}
