//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, configuration, fetch, scrape)
//! - Transport error categorization and the backoff curve
//! - Attempt and outcome statistics
//!
//! Per-field extraction failures are not errors in this sense; they travel
//! as data in `models::FieldResult`.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, get_retry_strategy};
pub use stats::ProcessingStats;
pub use types::{
    AttemptFailure, AttemptKind, ConfigError, FetchError, InitializationError, ScrapeError,
    ScrapeOutcome,
};
