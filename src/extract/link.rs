//! Product link validation and image URL normalization.

use url::Url;

use crate::config::PRODUCT_PATH_MARKER;
use crate::models::FieldError;

const REASON_INVALID: &str = "not a valid URL";
const REASON_OFF_SITE: &str = "not on the target site";
const REASON_NOT_PRODUCT: &str = "not a product page";

/// The registrable part of the origin host used for link matching (`www.` dropped).
pub fn target_domain(origin: &Url) -> Option<String> {
    let host = origin.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").map(str::to_string).unwrap_or(host))
}

fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Resolves `href` against `origin` and accepts it only if it stays on the
/// target site and points at a product page.
///
/// # Errors
///
/// Returns `FieldError::RejectedLink` naming the link and why it was refused.
pub fn validate_product_link(href: &str, origin: &Url) -> Result<String, FieldError> {
    let reject = |reason| FieldError::RejectedLink(href.to_string(), reason);

    let resolved = origin.join(href).map_err(|_| reject(REASON_INVALID))?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return Err(reject(REASON_OFF_SITE));
    }

    let domain = target_domain(origin).ok_or_else(|| reject(REASON_INVALID))?;
    match resolved.host_str() {
        Some(host) if host_matches(host, &domain) => {}
        _ => return Err(reject(REASON_OFF_SITE)),
    }

    if !resolved.path().contains(PRODUCT_PATH_MARKER) {
        return Err(reject(REASON_NOT_PRODUCT));
    }

    Ok(resolved.to_string())
}

/// Picks the first acceptable product link among `candidates`.
///
/// Yields `NotFound` when there were no candidates and the last rejection
/// otherwise, so an off-site link is reported rather than silently dropped.
pub fn first_valid_link<I>(candidates: I, origin: &Url) -> Result<String, FieldError>
where
    I: IntoIterator<Item = String>,
{
    let mut rejection = None;
    for href in candidates {
        match validate_product_link(&href, origin) {
            Ok(url) => return Ok(url),
            Err(err) => {
                log::debug!("Skipping product link: {err}");
                rejection.get_or_insert(err);
            }
        }
    }
    Err(rejection.unwrap_or(FieldError::NotFound))
}

/// Rewrites protocol-relative image URLs to explicit HTTPS.
pub fn normalize_image_url(raw: &str) -> String {
    let raw = raw.trim();
    match raw.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => raw.to_string(),
    }
}
