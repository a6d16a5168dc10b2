//! Field extraction from a parsed search results page.
//!
//! Two levels of fallback:
//! - a container table picks the element that represents one product card;
//!   the first container locator that matches anything is used for the whole page
//! - per-field locator chains are evaluated inside each card; the first
//!   non-empty match wins and a miss becomes a `FieldError`, never an abort

mod link;
mod locator;
mod selectors;

use scraper::{ElementRef, Html};
use url::Url;

use crate::models::{FieldError, FieldResult};

use link::{first_valid_link, normalize_image_url};
use locator::Locator;
use selectors::{
    AVAILABILITY_CHAIN, CONTAINER_LOCATORS, IMAGE_CHAIN, LINK_CHAIN, ORIGINAL_PRICE_CHAIN,
    PRICE_CHAIN, RATING_CHAIN, REVIEW_COUNT_CHAIN, TITLE_CHAIN,
};

/// Raw text pulled out of one product card, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProduct {
    pub title: String,
    pub rating: FieldResult<String>,
    pub review_count: FieldResult<String>,
    /// Already normalized to an absolute URL
    pub image_url: FieldResult<String>,
    pub price: FieldResult<String>,
    /// Optional fields: `None` is plain absence, not a failure
    pub original_price: Option<String>,
    pub availability: Option<String>,
    /// Validated and resolved against the target origin
    pub product_url: FieldResult<String>,
}

fn found_or_missing(value: Option<String>) -> FieldResult<String> {
    match value {
        Some(value) => FieldResult::Found(value),
        None => FieldResult::Failed(FieldError::NotFound),
    }
}

/// Selects product cards using the first container locator that matches.
///
/// Returns the chosen locator alongside the cards, or `None` when no
/// container locator matches anything on the page.
pub fn select_containers(document: &Html) -> Option<(&'static Locator, Vec<ElementRef<'_>>)> {
    CONTAINER_LOCATORS.iter().find_map(|locator| {
        let cards: Vec<_> = document.select(locator.selector()).collect();
        (!cards.is_empty()).then_some((locator, cards))
    })
}

/// Extracts raw fields from one card, or `None` when the card has no title.
pub fn extract_card(card: ElementRef<'_>, origin: &Url) -> Option<RawProduct> {
    let title = TITLE_CHAIN.first(card)?;

    let image_url = IMAGE_CHAIN
        .first(card)
        .map(|raw| normalize_image_url(&raw))
        .filter(|url| !url.is_empty());

    Some(RawProduct {
        title,
        rating: found_or_missing(RATING_CHAIN.first(card)),
        review_count: found_or_missing(REVIEW_COUNT_CHAIN.first(card)),
        image_url: found_or_missing(image_url),
        price: found_or_missing(PRICE_CHAIN.first(card)),
        original_price: ORIGINAL_PRICE_CHAIN.first(card),
        availability: AVAILABILITY_CHAIN.first(card),
        product_url: first_valid_link(LINK_CHAIN.candidates(card), origin).into(),
    })
}

/// Extracts every titled product on the page, in document order.
///
/// A page on which no container locator matches yields an empty list; markup
/// drift degrades to "no results" rather than an error.
pub fn extract_products(document: &Html, origin: &Url) -> Vec<RawProduct> {
    let Some((locator, cards)) = select_containers(document) else {
        log::warn!("No product container locator matched; treating page as empty");
        return Vec::new();
    };
    log::info!(
        "Found {} product candidates using container locator {}",
        cards.len(),
        locator
    );

    let products: Vec<RawProduct> = cards
        .into_iter()
        .enumerate()
        .filter_map(|(index, card)| {
            let product = extract_card(card, origin);
            if product.is_none() {
                log::debug!("Dropping candidate {} without a title", index + 1);
            }
            product
        })
        .collect();

    log::debug!("Kept {} titled products", products.len());
    products
}
