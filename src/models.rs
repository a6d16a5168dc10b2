//! Data structures produced by the pipeline.
//!
//! Field names and nesting of the serialized forms are consumed by the
//! rendering layer and must stay stable.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Semantic product fields that are extracted independently.
///
/// Serialized in camelCase as the keys of a record's `errors` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Star rating out of 5
    Rating,
    /// Number of customer reviews
    ReviewCount,
    /// Product image URL
    ImageUrl,
    /// Current price
    Price,
    /// List price before discount
    OriginalPrice,
    /// Absolute product page URL
    ProductUrl,
}

impl Field {
    /// Key used in the serialized `errors` map
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Rating => "rating",
            Field::ReviewCount => "reviewCount",
            Field::ImageUrl => "imageUrl",
            Field::Price => "price",
            Field::OriginalPrice => "originalPrice",
            Field::ProductUrl => "productUrl",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why one field of one product could not be produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Every locator in the field's chain came up empty.
    #[error("no matching element found")]
    NotFound,

    /// An element was found but its text holds no usable value.
    #[error("could not parse a value from \"{0}\"")]
    Unparseable(String),

    /// A numeric value was found outside the accepted range.
    #[error("value {value} outside accepted range [{min}, {max}]")]
    OutOfRange {
        /// Parsed value
        value: f64,
        /// Lowest accepted value
        min: f64,
        /// Highest accepted value
        max: f64,
    },

    /// A negative count was found.
    #[error("negative count \"{0}\"")]
    Negative(String),

    /// A link was found but points off-site or is not a product page.
    #[error("rejected link \"{0}\": {1}")]
    RejectedLink(String, &'static str),
}

/// A typed value or the reason it is missing. Never both, never neither.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldResult<T> {
    /// Extracted and parsed
    Found(T),
    /// Missing or unparseable
    Failed(FieldError),
}

impl<T> FieldResult<T> {
    /// True for `Found`.
    pub fn is_found(&self) -> bool {
        matches!(self, FieldResult::Found(_))
    }

    /// The found value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            FieldResult::Found(value) => Some(value),
            FieldResult::Failed(_) => None,
        }
    }

    /// Why the field is missing, if it is.
    pub fn error(&self) -> Option<&FieldError> {
        match self {
            FieldResult::Found(_) => None,
            FieldResult::Failed(err) => Some(err),
        }
    }

    /// Chains a fallible step onto a found value.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> FieldResult<U>) -> FieldResult<U> {
        match self {
            FieldResult::Found(value) => f(value),
            FieldResult::Failed(err) => FieldResult::Failed(err),
        }
    }

    /// Transforms a found value, keeping a failure as is.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldResult<U> {
        match self {
            FieldResult::Found(value) => FieldResult::Found(f(value)),
            FieldResult::Failed(err) => FieldResult::Failed(err),
        }
    }
}

impl<T> From<Result<T, FieldError>> for FieldResult<T> {
    fn from(result: Result<T, FieldError>) -> Self {
        match result {
            Ok(value) => FieldResult::Found(value),
            Err(err) => FieldResult::Failed(err),
        }
    }
}

/// One product as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// 1-based position among the kept products, in page order
    pub id: usize,
    /// Always present; records without a title are dropped
    pub title: String,
    /// Stars out of 5
    pub rating: Option<f64>,
    /// Review count with thousands separators removed
    pub review_count: Option<u64>,
    /// Empty when no image was found
    pub image_url: String,
    /// Formatted current price
    pub price: Option<String>,
    /// Formatted list price before discount
    pub original_price: Option<String>,
    /// Stock or delivery note, when shown
    pub availability: Option<String>,
    /// Empty when no valid product link was found
    pub product_url: String,
    /// Shared by every record of one scrape
    pub timestamp: DateTime<Utc>,
    /// Failure reason per field, only for fields that failed
    pub errors: BTreeMap<Field, String>,
}

/// Successful outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    /// Always true; failures are reported as `ErrorResponse`
    pub success: bool,
    /// Keyword as the caller passed it
    pub keyword: String,
    /// Equals `products.len()`
    pub total_products: usize,
    /// In page order
    pub products: Vec<ProductRecord>,
    /// Extraction time
    pub timestamp: DateTime<Utc>,
}

/// Failure shape returned to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Short error category
    pub error: String,
    /// Sanitized, truncated detail
    pub message: String,
    /// When the failure was reported
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Builds a failure response stamped with the current time.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorResponse {
            success: false,
            error: error.into(),
            message: crate::utils::sanitize_and_truncate_error_message(&message.into()),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_result_accessors() {
        let found: FieldResult<u64> = FieldResult::Found(12);
        assert!(found.is_found());
        assert_eq!(found.value(), Some(&12));
        assert!(found.error().is_none());

        let failed: FieldResult<u64> = FieldResult::Failed(FieldError::NotFound);
        assert!(!failed.is_found());
        assert_eq!(failed.error(), Some(&FieldError::NotFound));
        assert_eq!(failed.value(), None);
    }

    #[test]
    fn test_field_result_and_then_keeps_failure() {
        let failed: FieldResult<String> = FieldResult::Failed(FieldError::NotFound);
        let chained = failed.and_then(|s| FieldResult::Found(s.len()));
        assert_eq!(chained, FieldResult::Failed(FieldError::NotFound));
    }

    #[test]
    fn test_field_error_messages_are_readable() {
        assert_eq!(FieldError::NotFound.to_string(), "no matching element found");
        assert_eq!(
            FieldError::OutOfRange {
                value: 7.0,
                min: 0.0,
                max: 5.0
            }
            .to_string(),
            "value 7 outside accepted range [0, 5]"
        );
    }

    #[test]
    fn test_product_record_serializes_camel_case() {
        let mut errors = BTreeMap::new();
        errors.insert(Field::Price, "no matching element found".to_string());
        let record = ProductRecord {
            id: 1,
            title: "Wireless Mouse".into(),
            rating: Some(4.3),
            review_count: None,
            image_url: String::new(),
            price: None,
            original_price: None,
            availability: None,
            product_url: String::new(),
            timestamp: Utc::now(),
            errors,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "Wireless Mouse");
        assert_eq!(json["rating"], 4.3);
        assert!(json["reviewCount"].is_null());
        assert_eq!(json["imageUrl"], "");
        assert_eq!(json["errors"]["price"], "no matching element found");
        assert!(json["errors"].get("title").is_none());
    }

    #[test]
    fn test_scrape_result_shape() {
        let result = ScrapeResult {
            success: true,
            keyword: "mouse".into(),
            total_products: 0,
            products: vec![],
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["totalProducts"], 0);
        assert!(json["products"].as_array().unwrap().is_empty());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_error_response_shape() {
        let json = serde_json::to_value(ErrorResponse::new("Failed", "boom\x00")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed");
        assert_eq!(json["message"], "boom");
    }
}
