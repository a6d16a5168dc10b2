//! Fetching the search results page.
//!
//! This module provides:
//! - `RawPage`, the fetched body plus response metadata
//! - Search URL construction
//! - `RequestExecutor`, the bounded retry loop with identity rotation and backoff

mod executor;
mod request;

use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::error_handling::AttemptFailure;
use crate::identity::BrowserFamily;

pub use executor::RequestExecutor;
pub use request::build_search_url;

/// A fetched page. Immutable once fetched.
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Final URL after redirects
    pub url: String,
    /// Always 2xx for a page handed to the caller
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded body, at most `MAX_RESPONSE_BODY_SIZE` bytes
    pub body: String,
}

/// What the target answered, kept for diagnostics after the body is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSnapshot {
    /// HTTP status code
    pub status: u16,
    /// Length of the body read
    pub body_bytes: usize,
}

/// One network attempt within a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchAttempt {
    /// 1-based attempt number
    pub attempt: u32,
    /// Time spent on the network, excluding the delay before it
    pub elapsed: Duration,
    /// Browser family of the identity presented
    pub family: BrowserFamily,
    /// `Ok` only for the attempt that produced the page
    pub outcome: Result<(), AttemptFailure>,
    /// Present whenever the target answered at all
    pub response: Option<ResponseSnapshot>,
}
