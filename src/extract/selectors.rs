//! Locator tables for search result markup.
//!
//! Each table is ordered from the most specific, current markup to older or
//! looser fallbacks. Adding a locator for a markup change means adding a row.

use std::sync::LazyLock;

use super::locator::{Locator, LocatorChain};

/// One product card. The first entry that matches anything is used for the whole page.
pub static CONTAINER_LOCATORS: LazyLock<Vec<Locator>> = LazyLock::new(|| {
    vec![
        Locator::text(r#"[data-component-type="s-search-result"]"#),
        Locator::text(r#".s-result-item[data-component-type="s-search-result"]"#),
        Locator::text(".s-result-item"),
        Locator::text(r#"[data-asin]:not([data-asin=""])"#),
        Locator::text(".sg-col-inner .s-result-item"),
        Locator::text(".s-main-slot .s-result-item"),
    ]
});

pub static TITLE_CHAIN: LazyLock<LocatorChain> = LazyLock::new(|| {
    LocatorChain::new(
        "title",
        vec![
            Locator::text("h2 a span"),
            Locator::text(".a-size-medium"),
            Locator::text(".a-size-base-plus"),
            Locator::text("h2"),
            Locator::text(".a-text-normal"),
            Locator::text(r#"[data-cy="title-recipe"]"#),
        ],
    )
});

pub static IMAGE_CHAIN: LazyLock<LocatorChain> = LazyLock::new(|| {
    LocatorChain::new(
        "imageUrl",
        vec![
            Locator::attribute("img[src]", "src"),
            Locator::attribute("img[data-src]", "data-src"),
            Locator::attribute("img[data-lazy-src]", "data-lazy-src"),
            Locator::attribute("img[data-old-hires]", "data-old-hires"),
        ],
    )
});

pub static RATING_CHAIN: LazyLock<LocatorChain> = LazyLock::new(|| {
    LocatorChain::new(
        "rating",
        vec![
            Locator::text(".a-icon-alt"),
            Locator::attribute(r#"[aria-label*="stars"]"#, "aria-label"),
            Locator::text(".a-icon-star"),
            Locator::text(".a-icon-star-small"),
            Locator::text(".a-star-rating"),
        ],
    )
});

pub static REVIEW_COUNT_CHAIN: LazyLock<LocatorChain> = LazyLock::new(|| {
    LocatorChain::new(
        "reviewCount",
        vec![
            Locator::text(".a-size-base.s-underline-text"),
            Locator::attribute(r#"[aria-label*="reviews"]"#, "aria-label"),
            Locator::attribute(r#"[aria-label*="ratings"]"#, "aria-label"),
            Locator::text(".a-link-normal .a-size-base"),
            Locator::text(".a-size-base"),
        ],
    )
});

pub static PRICE_CHAIN: LazyLock<LocatorChain> = LazyLock::new(|| {
    LocatorChain::new(
        "price",
        vec![
            Locator::text(".a-price:not(.a-text-price) .a-offscreen"),
            Locator::text(".a-price-whole"),
            Locator::text(".a-price:not(.a-text-price)"),
            Locator::text(".a-price-range"),
            Locator::text(".a-color-price"),
        ],
    )
});

pub static ORIGINAL_PRICE_CHAIN: LazyLock<LocatorChain> = LazyLock::new(|| {
    LocatorChain::new(
        "originalPrice",
        vec![
            Locator::text(".a-price.a-text-price .a-offscreen"),
            Locator::text(".a-text-strike"),
        ],
    )
});

pub static AVAILABILITY_CHAIN: LazyLock<LocatorChain> = LazyLock::new(|| {
    LocatorChain::new(
        "availability",
        vec![
            Locator::text(".a-color-success"),
            Locator::text(".a-color-state"),
        ],
    )
});

pub static LINK_CHAIN: LazyLock<LocatorChain> = LazyLock::new(|| {
    LocatorChain::new(
        "productUrl",
        vec![
            Locator::attribute("h2 a", "href"),
            Locator::attribute(r#"a[href*="/dp/"]"#, "href"),
            Locator::attribute("a[data-asin]", "href"),
        ],
    )
});
