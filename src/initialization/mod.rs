//! Process-wide resource setup: logger and HTTP client.
//!
//! All initialization functions return `InitializationError` instead of panicking.

mod client;
mod logger;

pub use client::init_client;
pub use logger::init_logger_with;
