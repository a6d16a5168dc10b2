//! Block and rate-limit detection.
//!
//! Decides whether a completed response is the target refusing us (status
//! code, rate-limit headers, CAPTCHA/interstitial body) rather than a real
//! results page. A blocked page must never reach the extractor, where it would
//! be misreported as "no results".

use std::fmt;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::config::{
    HEADER_RATELIMIT_REMAINING, HEADER_RETRY_AFTER, HTTP_STATUS_SERVICE_UNAVAILABLE,
    HTTP_STATUS_TOO_MANY_REQUESTS,
};
use crate::fetch::RawPage;

/// Body phrases that only appear on block, CAPTCHA or rate-limit pages.
pub const BLOCK_INDICATORS: &[&str] = &[
    "captcha",
    "robot",
    "blocked",
    "rate limit",
    "too many requests",
    "access denied",
    "unusual traffic",
    "security check",
];

static BLOCK_INDICATOR_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    let pattern = BLOCK_INDICATORS
        .iter()
        .map(|indicator| regex::escape(indicator))
        .collect::<Vec<_>>()
        .join("|");
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::error!("Failed to compile block indicator pattern: {}", e);
            None
        }
    }
});

/// Which signal marked a page as blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// 429 or 503
    Status(u16),
    /// A Retry-After header was present
    RetryAfter,
    /// X-RateLimit-Remaining was zero
    RateLimitExhausted,
    /// The body contained one of `BLOCK_INDICATORS`
    BodyIndicator(&'static str),
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::Status(code) => write!(f, "status code {code}"),
            BlockReason::RetryAfter => f.write_str("retry-after header present"),
            BlockReason::RateLimitExhausted => f.write_str("rate limit remaining is zero"),
            BlockReason::BodyIndicator(indicator) => {
                write!(f, "page contains \"{indicator}\"")
            }
        }
    }
}

/// Classification of a fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageClass {
    /// Safe to hand to extraction
    Clean,
    /// Block, CAPTCHA or rate-limit page
    Blocked(BlockReason),
}

/// Classifies a page. Pure function of the page; the first matching rule wins:
///
/// 1. status 429 or 503
/// 2. a Retry-After header, or X-RateLimit-Remaining equal to zero
/// 3. a block indicator anywhere in the body (case-insensitive)
pub fn classify(page: &RawPage) -> PageClass {
    if page.status == HTTP_STATUS_TOO_MANY_REQUESTS || page.status == HTTP_STATUS_SERVICE_UNAVAILABLE
    {
        return PageClass::Blocked(BlockReason::Status(page.status));
    }

    if page.headers.contains_key(HEADER_RETRY_AFTER) {
        return PageClass::Blocked(BlockReason::RetryAfter);
    }

    let remaining_zero = page
        .headers
        .get(HEADER_RATELIMIT_REMAINING)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim() == "0");
    if remaining_zero {
        return PageClass::Blocked(BlockReason::RateLimitExhausted);
    }

    if let Some(indicator) = find_block_indicator(&page.body) {
        return PageClass::Blocked(BlockReason::BodyIndicator(indicator));
    }

    PageClass::Clean
}

/// Returns the first indicator (by position in the body) found in `body`.
fn find_block_indicator(body: &str) -> Option<&'static str> {
    let regex = BLOCK_INDICATOR_REGEX.as_ref()?;
    // Case-insensitive matches can lowercase to something outside the list (e.g. a long s)
    regex.find_iter(body).find_map(|m| {
        let found = m.as_str().to_lowercase();
        BLOCK_INDICATORS
            .iter()
            .copied()
            .find(|indicator| *indicator == found)
    })
}
