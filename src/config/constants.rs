//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the application,
//! including timeouts, pacing windows, retry limits and the target site layout.

/// Target storefront origin. Relative product links are resolved against it and
/// the search URL is built from it.
pub const DEFAULT_BASE_URL: &str = "https://www.amazon.com";

/// Path of the search results page (the keyword goes in the `k` query parameter)
pub const SEARCH_PATH: &str = "/s";
/// Query parameter carrying the search keyword
pub const SEARCH_QUERY_PARAM: &str = "k";

/// Path fragment every canonical product detail URL contains
pub const PRODUCT_PATH_MARKER: &str = "/dp/";

/// Per-attempt HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Caller-side ceiling for one whole scrape (initial pacing + every attempt + backoff).
/// Formula: initial delay (2s) + 3 attempts x 10s + backoff (5s + 9s) + buffer = ~60s
pub const DEFAULT_SCRAPE_TIMEOUT_SECS: u64 = 60;

// Pacing
/// Lower bound of the delay taken before the first attempt, in milliseconds
pub const INITIAL_DELAY_MIN_MS: u64 = 1000;
/// Upper bound of the delay taken before the first attempt, in milliseconds
pub const INITIAL_DELAY_MAX_MS: u64 = 2000;

// Retry strategy
/// Maximum number of attempts per fetch (including the initial attempt)
pub const RETRY_MAX_ATTEMPTS: u32 = 3;
/// Upper bound accepted for `--max-retries`
pub const MAX_RETRY_ATTEMPTS: u32 = 20;
/// Base backoff in milliseconds; attempt `n` waits at least `base * 2^n`
pub const RETRY_BASE_DELAY_MS: u64 = 2000;
/// Random jitter added on top of the backoff so concurrent callers don't synchronize
pub const RETRY_JITTER_MS: u64 = 1000;
/// Maximum backoff lower bound in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 30;

/// Redirect hops followed before a fetch attempt fails
pub const MAX_REDIRECTS: usize = 10;

// Response and body size limits
/// Maximum response body size in bytes (5MB). Search pages are large but
/// never this large; anything bigger is treated as a failed attempt.
pub const MAX_RESPONSE_BODY_SIZE: usize = 5 * 1024 * 1024;

// Error message size limits
/// Maximum error message length in characters returned to API clients
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 2000;

// HTTP server
/// Default port for the HTTP API
pub const DEFAULT_PORT: u16 = 3000;
/// Default bind address for the HTTP API
pub const DEFAULT_BIND: &str = "127.0.0.1";

// HTTP status codes (for clarity and consistency)
/// Blocked regardless of body
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;
/// Blocked regardless of body
pub const HTTP_STATUS_SERVICE_UNAVAILABLE: u16 = 503;
