//! Request identity rotation.
//!
//! Every fetch attempt draws a fresh browser identity (User-Agent plus a
//! header set consistent with that browser) from an immutable pool. The pool
//! is built once at startup and shared read-only between concurrent scrapes.

use std::sync::Arc;

use rand::Rng;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, DNT, REFERER,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};

use crate::config::{
    HEADER_SEC_CH_UA, HEADER_SEC_CH_UA_MOBILE, HEADER_SEC_CH_UA_PLATFORM, HEADER_SEC_FETCH_DEST,
    HEADER_SEC_FETCH_MODE, HEADER_SEC_FETCH_SITE, HEADER_SEC_FETCH_USER,
};

/// Built-in desktop browser identities (updated Dec 2024).
const BUILTIN_USER_AGENTS: &[&str] = &[
    // Chrome on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    // Chrome on Mac
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    // Chrome on Linux
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    // Firefox on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    // Firefox on Mac
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
    // Edge on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
    // Safari on Mac
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
];

const ACCEPT_HTML_CHROMIUM: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
const ACCEPT_HTML_GECKO: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const ACCEPT_HTML_SAFARI: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9,pt-BR;q=0.8,pt;q=0.7";

/// Browser family of an identity. Decides which headers accompany the User-Agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserFamily {
    /// Chromium-based, sends client hints
    Chrome,
    /// Chromium-based with the Edge brand
    Edge,
    /// No client hints
    Firefox,
    /// No client hints, Safari Accept value
    Safari,
    /// Unrecognized User-Agent; gets the common header set only
    Other,
}

impl BrowserFamily {
    /// Classifies a User-Agent string.
    ///
    /// Order matters: Edge UAs contain "Chrome", Chrome UAs contain "Safari".
    pub fn from_user_agent(user_agent: &str) -> Self {
        if user_agent.contains("Edg/") {
            BrowserFamily::Edge
        } else if user_agent.contains("Firefox/") {
            BrowserFamily::Firefox
        } else if user_agent.contains("Chrome/") {
            BrowserFamily::Chrome
        } else if user_agent.contains("Safari/") {
            BrowserFamily::Safari
        } else {
            BrowserFamily::Other
        }
    }

    fn is_chromium(&self) -> bool {
        matches!(self, BrowserFamily::Chrome | BrowserFamily::Edge)
    }

    fn accept(&self) -> &'static str {
        match self {
            BrowserFamily::Chrome | BrowserFamily::Edge | BrowserFamily::Other => {
                ACCEPT_HTML_CHROMIUM
            }
            BrowserFamily::Firefox => ACCEPT_HTML_GECKO,
            BrowserFamily::Safari => ACCEPT_HTML_SAFARI,
        }
    }
}

/// Platform token for the `sec-ch-ua-platform` client hint.
fn platform_hint(user_agent: &str) -> &'static str {
    if user_agent.contains("Windows") {
        "\"Windows\""
    } else if user_agent.contains("Macintosh") {
        "\"macOS\""
    } else if user_agent.contains("Linux") {
        "\"Linux\""
    } else {
        "\"Unknown\""
    }
}

/// Major version following `marker` in a User-Agent (e.g. `Chrome/131.0.0.0` -> `131`).
fn major_version<'a>(user_agent: &'a str, marker: &str) -> Option<&'a str> {
    let start = user_agent.find(marker)? + marker.len();
    user_agent[start..].split('.').next()
}

/// One browser disguise: a User-Agent and the headers that browser would send.
///
/// Immutable once built. Encoding (`Accept-Encoding`) is left to reqwest so
/// that compressed responses are always decoded.
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    user_agent: String,
    family: BrowserFamily,
    headers: HeaderMap,
}

impl RequestIdentity {
    /// Builds an identity for `user_agent`, sending `referer` as the Referer.
    ///
    /// Returns `None` when the User-Agent cannot be used as a header value.
    pub fn new(user_agent: &str, referer: &str) -> Option<Self> {
        let family = BrowserFamily::from_user_agent(user_agent);
        let mut headers = HeaderMap::new();

        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent).ok()?);
        headers.insert(ACCEPT, HeaderValue::from_static(family.accept()));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE),
        );
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        headers.insert(DNT, HeaderValue::from_static("1"));
        if let Ok(value) = HeaderValue::from_str(referer) {
            headers.insert(REFERER, value);
        }
        headers.insert(
            HeaderName::from_static(HEADER_SEC_FETCH_DEST),
            HeaderValue::from_static("document"),
        );
        headers.insert(
            HeaderName::from_static(HEADER_SEC_FETCH_MODE),
            HeaderValue::from_static("navigate"),
        );
        headers.insert(
            HeaderName::from_static(HEADER_SEC_FETCH_SITE),
            HeaderValue::from_static("none"),
        );
        headers.insert(
            HeaderName::from_static(HEADER_SEC_FETCH_USER),
            HeaderValue::from_static("?1"),
        );

        if family.is_chromium() {
            let (brand, marker) = match family {
                BrowserFamily::Edge => ("Microsoft Edge", "Edg/"),
                _ => ("Google Chrome", "Chrome/"),
            };
            let version = major_version(user_agent, marker).unwrap_or("131");
            let sec_ch_ua = format!(
                "\"{brand}\";v=\"{version}\", \"Chromium\";v=\"{version}\", \"Not_A Brand\";v=\"24\""
            );
            if let Ok(value) = HeaderValue::from_str(&sec_ch_ua) {
                headers.insert(HeaderName::from_static(HEADER_SEC_CH_UA), value);
            }
            headers.insert(
                HeaderName::from_static(HEADER_SEC_CH_UA_MOBILE),
                HeaderValue::from_static("?0"),
            );
            headers.insert(
                HeaderName::from_static(HEADER_SEC_CH_UA_PLATFORM),
                HeaderValue::from_static(platform_hint(user_agent)),
            );
        }

        Some(RequestIdentity {
            user_agent: user_agent.to_string(),
            family,
            headers,
        })
    }

    /// User-Agent header value
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Family derived from the User-Agent
    pub fn family(&self) -> BrowserFamily {
        self.family
    }

    /// Full header set sent with this identity, User-Agent included
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Applies this identity's headers to a `reqwest::RequestBuilder`.
    pub fn apply_to_request_builder(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        builder.headers(self.headers.clone())
    }
}

/// Immutable snapshot of the identities a scraper may present.
///
/// Cloning is a reference-count increment. Extending the pool produces a new
/// snapshot; pools already handed to running scrapes are never touched.
#[derive(Debug, Clone)]
pub struct IdentityPool {
    identities: Arc<[RequestIdentity]>,
}

impl IdentityPool {
    /// Builds the built-in pool with `referer` as the Referer for every identity.
    pub fn builtin(referer: &str) -> Self {
        let identities: Vec<_> = BUILTIN_USER_AGENTS
            .iter()
            .filter_map(|ua| RequestIdentity::new(ua, referer))
            .collect();
        IdentityPool {
            identities: identities.into(),
        }
    }

    /// Returns a new pool holding this pool's identities followed by `user_agents`.
    ///
    /// User agents that are not valid header values are skipped with a warning.
    pub fn with_additional<S: AsRef<str>>(&self, user_agents: &[S], referer: &str) -> Self {
        let mut identities: Vec<_> = self.identities.iter().cloned().collect();
        for ua in user_agents {
            match RequestIdentity::new(ua.as_ref(), referer) {
                Some(identity) => identities.push(identity),
                None => log::warn!("Skipping invalid User-Agent: {:?}", ua.as_ref()),
            }
        }
        IdentityPool {
            identities: identities.into(),
        }
    }

    /// Draws one identity uniformly at random, with replacement.
    pub fn next(&self) -> &RequestIdentity {
        let index = rand::rng().random_range(0..self.identities.len());
        &self.identities[index]
    }

    /// Number of identities in the pool
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Never true for a pool built by `with_defaults`
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Identities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &RequestIdentity> {
        self.identities.iter()
    }
}
