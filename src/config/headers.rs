//! HTTP header name constants.
//!
//! Response headers inspected by the block detector and the request header
//! names sent with every identity that `reqwest::header` has no constant for.

// Rate-limit signalling headers (response)
/// Retry-After header; any value means the target wants us to back off
pub const HEADER_RETRY_AFTER: &str = "retry-after";
/// X-RateLimit-Remaining header; `0` means the quota is exhausted
pub const HEADER_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";

// Fetch metadata headers (request)
/// Sec-Fetch-Dest header
pub const HEADER_SEC_FETCH_DEST: &str = "sec-fetch-dest";
/// Sec-Fetch-Mode header
pub const HEADER_SEC_FETCH_MODE: &str = "sec-fetch-mode";
/// Sec-Fetch-Site header
pub const HEADER_SEC_FETCH_SITE: &str = "sec-fetch-site";
/// Sec-Fetch-User header
pub const HEADER_SEC_FETCH_USER: &str = "sec-fetch-user";

// Client hints (request, Chromium family only)
/// Sec-CH-UA header (brand list)
pub const HEADER_SEC_CH_UA: &str = "sec-ch-ua";
/// Sec-CH-UA-Mobile header
pub const HEADER_SEC_CH_UA_MOBILE: &str = "sec-ch-ua-mobile";
/// Sec-CH-UA-Platform header
pub const HEADER_SEC_CH_UA_PLATFORM: &str = "sec-ch-ua-platform";
