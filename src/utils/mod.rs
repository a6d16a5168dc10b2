//! Utility functions.
//!
//! This module provides:
//! - String sanitization utilities
//! - CSS selector parsing utilities

pub mod sanitize;
mod selector;

pub use sanitize::{collapse_whitespace, sanitize_and_truncate_error_message};
pub use selector::parse_selector_with_fallback;
