//! Error type definitions.
//!
//! This module defines the error enums used throughout the pipeline and the
//! counter keys tracked by `ProcessingStats`.

use std::fmt;
use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::detection::BlockReason;
use crate::fetch::FetchAttempt;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfigError(#[from] ConfigError),
}

/// Configuration values that fail validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `--max-retries 0`
    #[error("max-retries must be at least 1")]
    ZeroRetries,

    /// `--max-retries` above `MAX_RETRY_ATTEMPTS`
    #[error("max-retries must be at most {max} (got {got})")]
    TooManyRetries {
        /// Requested attempts
        got: u32,
        /// Accepted ceiling
        max: u32,
    },

    /// A timeout set to zero; carries the option name
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    /// Initial delay minimum above its maximum
    #[error("initial delay window is inverted (min {min}ms > max {max}ms)")]
    InvertedDelayWindow {
        /// Minimum in milliseconds
        min: u64,
        /// Maximum in milliseconds
        max: u64,
    },

    /// Unparseable `--base-url`; carries the input and the parser error
    #[error("invalid base URL '{0}': {1}")]
    InvalidBaseUrl(String, String),
}

/// Why a single fetch attempt failed.
///
/// Every variant is transient from the executor's point of view: each one
/// consumes an attempt and triggers backoff plus identity rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The request did not complete within the per-attempt timeout.
    Timeout,
    /// The TCP/TLS connection could not be established.
    Connect(String),
    /// Any other transport-level failure.
    Network(String),
    /// The target answered with a non-2xx status that is not a block signal.
    Status(u16),
    /// The target actively refused or rate-limited the request.
    Blocked(BlockReason),
    /// The response body could not be read or decoded.
    Body(String),
}

impl AttemptFailure {
    /// Statistics key for this failure.
    pub fn kind(&self) -> AttemptKind {
        match self {
            AttemptFailure::Timeout => AttemptKind::Timeout,
            AttemptFailure::Connect(_) | AttemptFailure::Network(_) | AttemptFailure::Body(_) => {
                AttemptKind::NetworkError
            }
            AttemptFailure::Status(_) => AttemptKind::StatusError,
            AttemptFailure::Blocked(_) => AttemptKind::Blocked,
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Timeout => f.write_str("request timed out"),
            AttemptFailure::Connect(msg) => write!(f, "connection failed: {msg}"),
            AttemptFailure::Network(msg) => write!(f, "network error: {msg}"),
            AttemptFailure::Status(code) => write!(f, "request failed with status code {code}"),
            AttemptFailure::Blocked(reason) => write!(f, "blocked by target: {reason}"),
            AttemptFailure::Body(msg) => write!(f, "failed to read response body: {msg}"),
        }
    }
}

/// Aggregated failure of one fetch operation after every attempt was used.
#[derive(Error, Debug, Clone)]
#[error("Failed to fetch data after {attempts} attempts: {last_cause}")]
pub struct FetchError {
    /// Number of network attempts made
    pub attempts: u32,
    /// Cause of the final attempt's failure
    pub last_cause: AttemptFailure,
    /// Every attempt, in order
    pub history: Vec<FetchAttempt>,
}

impl FetchError {
    /// Whether any attempt in this operation was classified as blocked.
    pub fn was_blocked(&self) -> bool {
        self.history
            .iter()
            .any(|attempt| matches!(attempt.outcome, Err(AttemptFailure::Blocked(_))))
    }
}

/// Pipeline-level failure returned by `Scraper::scrape`.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The keyword was empty after trimming. Rejected before any network activity.
    #[error("Keyword parameter is required")]
    InvalidKeyword,

    /// The search URL could not be built from the configured origin.
    #[error("Invalid search URL: {0}")]
    InvalidTarget(#[from] url::ParseError),

    /// Every fetch attempt failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The overall scrape timeout elapsed.
    #[error("Scrape timed out after {0:?}")]
    Timeout(Duration),

    /// The scraper was shut down while the scrape was in flight.
    #[error("Scrape cancelled")]
    Cancelled,
}

impl ScrapeError {
    /// True for failures caused by the caller's input rather than the target.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ScrapeError::InvalidKeyword)
    }
}

/// Outcome categories of individual fetch attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum AttemptKind {
    /// Page fetched and classified clean
    Success,
    /// No response within the request timeout
    Timeout,
    /// Connection, DNS, TLS or body read failure
    NetworkError,
    /// Non-2xx status that is not a block signal
    StatusError,
    /// Block or CAPTCHA page
    Blocked,
}

impl AttemptKind {
    /// Label used in logs and stats output.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptKind::Success => "success",
            AttemptKind::Timeout => "timeout",
            AttemptKind::NetworkError => "network error",
            AttemptKind::StatusError => "status error",
            AttemptKind::Blocked => "blocked",
        }
    }
}

impl fmt::Display for AttemptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome categories of whole scrapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ScrapeOutcome {
    /// At least one product
    Succeeded,
    /// Clean page with zero products
    Empty,
    /// Invalid keyword
    Rejected,
    /// Every attempt failed
    FetchFailed,
    /// Overall scrape timeout elapsed
    TimedOut,
    /// Shut down mid-scrape
    Cancelled,
}

impl From<&ScrapeError> for ScrapeOutcome {
    fn from(error: &ScrapeError) -> Self {
        match error {
            ScrapeError::InvalidKeyword | ScrapeError::InvalidTarget(_) => ScrapeOutcome::Rejected,
            ScrapeError::Fetch(_) => ScrapeOutcome::FetchFailed,
            ScrapeError::Timeout(_) => ScrapeOutcome::TimedOut,
            ScrapeError::Cancelled => ScrapeOutcome::Cancelled,
        }
    }
}
