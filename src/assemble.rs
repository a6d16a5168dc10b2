//! Result assembly: ordinal ids, a shared timestamp and per-field error maps.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::models::{Field, FieldResult, ProductRecord, ScrapeResult};
use crate::normalize::NormalizedProduct;

fn take<T>(result: FieldResult<T>, field: Field, errors: &mut BTreeMap<Field, String>) -> Option<T> {
    match result {
        FieldResult::Found(value) => Some(value),
        FieldResult::Failed(err) => {
            errors.insert(field, err.to_string());
            None
        }
    }
}

/// Builds the output record for one product.
pub fn build_record(id: usize, product: NormalizedProduct, timestamp: DateTime<Utc>) -> ProductRecord {
    let mut errors = BTreeMap::new();

    let rating = take(product.rating, Field::Rating, &mut errors);
    let review_count = take(product.review_count, Field::ReviewCount, &mut errors);
    let image_url = take(product.image_url, Field::ImageUrl, &mut errors).unwrap_or_default();
    let price = take(product.price, Field::Price, &mut errors);
    let original_price = product
        .original_price
        .and_then(|result| take(result, Field::OriginalPrice, &mut errors));
    let product_url = take(product.product_url, Field::ProductUrl, &mut errors).unwrap_or_default();

    ProductRecord {
        id,
        title: product.title,
        rating,
        review_count,
        image_url,
        price,
        original_price,
        availability: product.availability,
        product_url,
        timestamp,
        errors,
    }
}

/// Assembles the final result with 1-based ids in the given (document) order.
///
/// An empty product list is still a success.
pub fn assemble(keyword: &str, products: Vec<NormalizedProduct>) -> ScrapeResult {
    assemble_at(keyword, products, Utc::now())
}

/// Like `assemble`, with an explicit batch timestamp.
pub fn assemble_at(
    keyword: &str,
    products: Vec<NormalizedProduct>,
    timestamp: DateTime<Utc>,
) -> ScrapeResult {
    let products: Vec<ProductRecord> = products
        .into_iter()
        .enumerate()
        .map(|(index, product)| build_record(index + 1, product, timestamp))
        .collect();

    let incomplete = products.iter().filter(|p| !p.errors.is_empty()).count();
    if incomplete > 0 {
        log::debug!(
            "{} of {} products have at least one missing field",
            incomplete,
            products.len()
        );
    }

    ScrapeResult {
        success: true,
        keyword: keyword.to_string(),
        total_products: products.len(),
        products,
        timestamp,
    }
}
