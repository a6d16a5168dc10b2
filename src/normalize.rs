//! Normalization of raw field text into typed, validated values.
//!
//! This is the single place that decides whether a value is usable; the
//! assembler never re-validates.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::CurrencyStyle;
use crate::extract::RawProduct;
use crate::models::{FieldError, FieldResult};

pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::error!("Failed to compile pattern '{}': {}", pattern, e);
            None
        }
    }
}

// Digits with embedded separators; trailing separators are trimmed afterwards
static PRICE_TOKEN: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"\d[\d.,]*"));
static RATING_TOKEN: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"-?\d+(?:[.,]\d+)?"));
static COUNT_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"-?\d{1,3}(?:[,.]\d{3})+|-?\d+"));

/// A product with every field typed, or carrying the reason it is not.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProduct {
    pub title: String,
    pub rating: FieldResult<f64>,
    pub review_count: FieldResult<u64>,
    pub image_url: FieldResult<String>,
    /// Formatted current price
    pub price: FieldResult<String>,
    /// `None` when the card shows no list price
    pub original_price: Option<FieldResult<String>>,
    pub availability: Option<String>,
    pub product_url: FieldResult<String>,
}

/// Parses the first price-like token in `text`.
///
/// Separators are resolved as follows: with both `.` and `,` present the
/// last one is the decimal mark; a single `,` or a single `.` is a decimal
/// mark; a repeated separator groups thousands.
pub fn parse_price(text: &str) -> Result<f64, FieldError> {
    let unparseable = || FieldError::Unparseable(text.to_string());
    let regex = PRICE_TOKEN.as_ref().ok_or_else(unparseable)?;
    let token = regex
        .find(text)
        .ok_or_else(unparseable)?
        .as_str()
        .trim_end_matches(['.', ',']);

    let dots = token.matches('.').count();
    let commas = token.matches(',').count();
    let canonical = match (dots, commas) {
        (0, 0) => token.to_string(),
        (_, 0) if dots == 1 => token.to_string(),
        (_, 0) => token.replace('.', ""),
        (0, 1) => token.replace(',', "."),
        (0, _) => token.replace(',', ""),
        _ => {
            let last_dot = token.rfind('.');
            let last_comma = token.rfind(',');
            if last_comma > last_dot {
                token.replace('.', "").replace(',', ".")
            } else {
                token.replace(',', "")
            }
        }
    };

    match canonical.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(unparseable()),
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats `value` as a localized currency string, rounded to cents.
pub fn format_price(value: f64, style: CurrencyStyle) -> String {
    let cents = (value * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;
    match style {
        CurrencyStyle::Brl => format!("R$\u{a0}{},{:02}", group_thousands(&whole, '.'), fraction),
        CurrencyStyle::Usd => format!("${}.{:02}", group_thousands(&whole, ','), fraction),
    }
}

/// Parses and formats a price in one step.
pub fn normalize_price(text: &str, style: CurrencyStyle) -> Result<String, FieldError> {
    parse_price(text).map(|value| format_price(value, style))
}

/// Parses a star rating such as `4.3 out of 5 stars` or `4,5 de 5 estrelas`.
///
/// Values outside `[0, 5]` are rejected, never clamped.
pub fn parse_rating(text: &str) -> Result<f64, FieldError> {
    let unparseable = || FieldError::Unparseable(text.to_string());
    let regex = RATING_TOKEN.as_ref().ok_or_else(unparseable)?;
    let token = regex.find(text).ok_or_else(unparseable)?.as_str();
    let value: f64 = token.replace(',', ".").parse().map_err(|_| unparseable())?;

    if !(RATING_MIN..=RATING_MAX).contains(&value) {
        return Err(FieldError::OutOfRange {
            value,
            min: RATING_MIN,
            max: RATING_MAX,
        });
    }
    Ok(value)
}

/// Parses a review count such as `12,345` or `(1.024)`.
pub fn parse_review_count(text: &str) -> Result<u64, FieldError> {
    let unparseable = || FieldError::Unparseable(text.to_string());
    let regex = COUNT_TOKEN.as_ref().ok_or_else(unparseable)?;
    let token = regex.find(text).ok_or_else(unparseable)?.as_str();
    if token.starts_with('-') {
        return Err(FieldError::Negative(token.to_string()));
    }
    token
        .replace([',', '.'], "")
        .parse::<u64>()
        .map_err(|_| unparseable())
}

/// Converts one raw product into typed values.
pub fn normalize(raw: RawProduct, style: CurrencyStyle) -> NormalizedProduct {
    NormalizedProduct {
        title: raw.title,
        rating: raw.rating.and_then(|text| parse_rating(&text).into()),
        review_count: raw
            .review_count
            .and_then(|text| parse_review_count(&text).into()),
        image_url: raw.image_url,
        price: raw
            .price
            .and_then(|text| normalize_price(&text, style).into()),
        original_price: raw
            .original_price
            .map(|text| normalize_price(&text, style).into()),
        availability: raw.availability,
        product_url: raw.product_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_formats() {
        assert_eq!(parse_price("$24.99").unwrap(), 24.99);
        assert_eq!(parse_price("R$ 1.234,56").unwrap(), 1234.56);
        assert_eq!(parse_price("$1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_price("129,90").unwrap(), 129.90);
        assert_eq!(parse_price("1,234,567").unwrap(), 1234567.0);
        assert_eq!(parse_price("1.234.567").unwrap(), 1234567.0);
        assert_eq!(parse_price("49").unwrap(), 49.0);
    }

    #[test]
    fn test_parse_price_takes_first_token() {
        assert_eq!(parse_price("$24.99 - $30.00").unwrap(), 24.99);
        assert_eq!(parse_price("Now 15.").unwrap(), 15.0);
    }

    #[test]
    fn test_parse_price_unparseable() {
        assert_eq!(
            parse_price("See options"),
            Err(FieldError::Unparseable("See options".to_string()))
        );
        assert!(parse_price("").is_err());
    }

    #[test]
    fn test_format_price_brl() {
        assert_eq!(format_price(1234.56, CurrencyStyle::Brl), "R$\u{a0}1.234,56");
        assert_eq!(format_price(24.9, CurrencyStyle::Brl), "R$\u{a0}24,90");
        assert_eq!(format_price(0.0, CurrencyStyle::Brl), "R$\u{a0}0,00");
    }

    #[test]
    fn test_format_price_usd() {
        assert_eq!(format_price(1234567.891, CurrencyStyle::Usd), "$1,234,567.89");
        assert_eq!(format_price(999.0, CurrencyStyle::Usd), "$999.00");
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("4.3 out of 5 stars").unwrap(), 4.3);
        assert_eq!(parse_rating("4,5 de 5 estrelas").unwrap(), 4.5);
        assert_eq!(parse_rating("5").unwrap(), 5.0);
        assert_eq!(parse_rating("0.0 out of 5").unwrap(), 0.0);
    }

    #[test]
    fn test_rating_out_of_range_is_rejected_not_clamped() {
        assert_eq!(
            parse_rating("7.5 out of 5 stars"),
            Err(FieldError::OutOfRange {
                value: 7.5,
                min: 0.0,
                max: 5.0
            })
        );
        assert!(matches!(
            parse_rating("-1 stars"),
            Err(FieldError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_rating_without_number() {
        assert!(matches!(
            parse_rating("No reviews"),
            Err(FieldError::Unparseable(_))
        ));
    }

    #[test]
    fn test_parse_review_count() {
        assert_eq!(parse_review_count("12,345").unwrap(), 12345);
        assert_eq!(parse_review_count("(1.024)").unwrap(), 1024);
        assert_eq!(parse_review_count("87 ratings").unwrap(), 87);
        assert_eq!(parse_review_count("1,234,567 reviews").unwrap(), 1234567);
    }

    #[test]
    fn test_review_count_negative_and_unparseable() {
        assert_eq!(
            parse_review_count("-12"),
            Err(FieldError::Negative("-12".to_string()))
        );
        assert!(matches!(
            parse_review_count("no reviews yet"),
            Err(FieldError::Unparseable(_))
        ));
    }

    fn raw() -> RawProduct {
        RawProduct {
            title: "Wireless Mouse".to_string(),
            rating: FieldResult::Found("4.3 out of 5 stars".to_string()),
            review_count: FieldResult::Found("1,024".to_string()),
            image_url: FieldResult::Found("https://img.example/x.jpg".to_string()),
            price: FieldResult::Failed(FieldError::NotFound),
            original_price: None,
            availability: Some("In Stock".to_string()),
            product_url: FieldResult::Failed(FieldError::NotFound),
        }
    }

    #[test]
    fn test_normalize_keeps_failures_and_types_values() {
        let product = normalize(raw(), CurrencyStyle::Brl);
        assert_eq!(product.rating, FieldResult::Found(4.3));
        assert_eq!(product.review_count, FieldResult::Found(1024));
        assert_eq!(product.price, FieldResult::Failed(FieldError::NotFound));
        assert_eq!(product.original_price, None);
        assert_eq!(product.availability.as_deref(), Some("In Stock"));
    }

    #[test]
    fn test_normalize_reports_bad_original_price() {
        let mut raw = raw();
        raw.price = FieldResult::Found("$10.00".to_string());
        raw.original_price = Some("List:".to_string());
        let product = normalize(raw, CurrencyStyle::Usd);
        assert_eq!(product.price, FieldResult::Found("$10.00".to_string()));
        assert!(matches!(
            product.original_price,
            Some(FieldResult::Failed(FieldError::Unparseable(_)))
        ));
    }

    #[test]
    fn test_normalized_rating_is_always_in_range() {
        for text in ["0", "2.5", "5.0", "5.1", "10", "99 out of 5"] {
            let mut raw = raw();
            raw.rating = FieldResult::Found(text.to_string());
            if let FieldResult::Found(value) = normalize(raw, CurrencyStyle::Brl).rating {
                assert!((0.0..=5.0).contains(&value), "{text} produced {value}");
            }
        }
    }
}
