//! HTTP client initialization.

use reqwest::ClientBuilder;

use crate::config::{Config, MAX_REDIRECTS};
use crate::error_handling::InitializationError;

/// Builds the shared HTTP client used by every fetch.
///
/// The client carries no default user agent; each request presents the headers
/// of the identity drawn for that attempt. Response decompression (gzip,
/// brotli, deflate) is negotiated by reqwest.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if the TLS backend cannot be set up.
pub fn init_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(config.request_timeout())
        .connect_timeout(config.request_timeout())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()?;
    Ok(client)
}
