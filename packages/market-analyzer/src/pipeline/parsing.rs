//! Best-effort parsing of free-text model answers into product records.
//!
//! Browsing models do not honor output-format instructions reliably: the
//! JSON may be wrapped in prose or a code fence, or nested under a
//! `products` key. The rules here, in order:
//!
//! 1. Take the first substring that looks like a JSON array of objects, or
//!    an object whose `products` key holds an array.
//! 2. Parse that substring, or the whole text when nothing matched.
//! 3. Unwrap a `products` key; accept a bare array as is.
//! 4. Anything else is an error.
//!
//! When a model emits several JSON fragments the greedy match can span
//! them and fail to parse. That case is reported, not repaired.

use regex::Regex;
use std::sync::LazyLock;
use serde_json::Value;
use tracing::debug;

use crate::error::{AnalyzerError, Result};
use crate::types::product::ProductRecord;

static PRODUCT_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\[\s*\{.*\}\s*\]|\{\s*"products"\s*:\s*\[.*\]\s*\}"#)
        .expect("product JSON pattern is valid")
});

/// The substring rule 1 would parse, if any.
pub fn locate_product_json(text: &str) -> Option<&str> {
    PRODUCT_JSON.find(text).map(|m| m.as_str())
}

/// Parse a model answer into records.
///
/// Elements of the array that are not JSON objects are skipped.
pub fn parse_products(text: &str) -> Result<Vec<ProductRecord>> {
    let candidate = locate_product_json(text).unwrap_or(text);
    let value: Value = serde_json::from_str(candidate)?;

    let items = match value {
        Value::Object(mut obj) if obj.contains_key("products") => obj
            .remove("products")
            .unwrap_or(Value::Null),
        other => other,
    };

    let items = match items {
        Value::Array(items) => items,
        other => {
            return Err(AnalyzerError::UnexpectedShape {
                found: json_kind(&other),
            })
        }
    };

    let total = items.len();
    let records: Vec<ProductRecord> = items.iter().filter_map(ProductRecord::from_json).collect();

    if records.len() < total {
        debug!(
            skipped = total - records.len(),
            kept = records.len(),
            "Skipped non-object product entries"
        );
    }

    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let records = parse_products(r#"[{"product_name":"X","product_price":9.99}]"#).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product_name.as_deref(), Some("X"));
        assert_eq!(records[0].product_price, Some(9.99));
        assert!(records[0].provider.is_none());
        assert!(records[0].provider_url.is_none());
        assert!(records[0].product_sku.is_none());
        assert!(records[0].price_per_unit.is_none());
        assert!(records[0].evaluation.is_none());
        assert!(records[0].product_properties.is_empty());
    }

    #[test]
    fn test_products_key() {
        let records = parse_products(r#"{"products": [{"product_name":"Y"}]}"#).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product_name.as_deref(), Some("Y"));
    }

    #[test]
    fn test_not_json() {
        let err = parse_products("not json at all").unwrap_err();
        assert!(matches!(err, AnalyzerError::JsonParse(_)));
    }

    #[test]
    fn test_array_inside_prose_and_fence() {
        let text = "Here are the prices I found:\n```json\n[\n  {\"product_name\": \"A\"},\n  {\"product_name\": \"B\"}\n]\n```\nPrices checked today.";

        let records = parse_products(text).unwrap();
        let names: Vec<_> = records.iter().filter_map(|r| r.product_name.as_deref()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_products_key_inside_prose() {
        let text = "Result: {\"products\": [{\"product_name\": \"Z\", \"product_price\": \"12,50\"}]} done";

        let records = parse_products(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product_price, Some(12.5));
    }

    #[test]
    fn test_whole_text_fallback_for_empty_array() {
        assert!(locate_product_json("[]").is_none());
        assert!(parse_products("[]").unwrap().is_empty());
    }

    #[test]
    fn test_object_without_products_is_rejected() {
        let err = parse_products(r#"{"error": "page not found"}"#).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::UnexpectedShape { found: "an object" }
        ));
    }

    #[test]
    fn test_products_key_not_an_array() {
        let err = parse_products(r#"{"products": "none found"}"#).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::UnexpectedShape { found: "a string" }
        ));
    }

    #[test]
    fn test_non_object_elements_skipped() {
        let records = parse_products(r#"[1, "two", {"product_name": "three"}, null]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product_name.as_deref(), Some("three"));
    }

    #[test]
    fn test_two_fragments_spanned_by_greedy_match() {
        let text = r#"First shop: [{"product_name": "A"}] and second shop: [{"product_name": "B"}]"#;

        let located = locate_product_json(text).unwrap();
        assert!(located.starts_with(r#"[{"product_name": "A"}]"#));
        assert!(located.ends_with(r#"[{"product_name": "B"}]"#));
        assert!(parse_products(text).is_err());
    }
}
