//! LLM prompts for URL discovery and product extraction.

use sha2::{Digest, Sha256};

use crate::types::query::PriceBasis;

/// Prompt for finding pages that show actual product prices.
pub const DISCOVERY_PROMPT: &str = r#"Find web pages that present actual prices for the product below.
INCLUDE pages of direct sellers and price aggregators.
EXCLUDE news, reviews and articles.
Return up to the top 20 relevant pages. Every item in the list must be a URL.

Product to search for:
category: {category}
product name: {product_name}
product specification: {tech_spec}

Make sure every URL works and shows a price for the product.
Check every URL for a product price before returning it."#;

/// Prompt for reading product offers off a single page.
pub const EXTRACTION_PROMPT: &str = r#"Get prices for the following product:
category: {category}
product name: {product_name}
product specification: {tech_spec}
from url = {url}

IMPORTANT: Your response MUST be formatted EXACTLY as a valid JSON array of product objects.
Each product in the array must have the following fields:

[
  {
    "provider": "Company selling the product",
    "provider_website": "Main website domain (e.g., telia.lt)",
    "provider_url": "Full URL to the specific product page",
    "product_name": "Complete product name with model",
    "product_properties": {
      "key_spec1": "value1",
      "key_spec2": "value2"
    },
    "product_sku": "Any product identifiers (SKU, UPC, model number)",
    "product_price": 299.99,
    "price_per_unit": 9.99,
    "evaluation": "Detailed assessment of how the product meets or fails each technical specification"
  }
]

DO NOT include any explanation, preamble, or additional text - ONLY provide the JSON array."#;

/// Appended to the extraction prompt when prices must be normalized.
pub const PRICE_BASIS_DIRECTIVE: &str = r#"

Also add a numeric "{field}" field to every product: the price in EUR per {basis_label}, computed from the package size shown on the page. Omit the field if the page does not state enough to compute it."#;

/// Extra line for the unit basis, naming the unit.
pub const UNIT_TYPE_DIRECTIVE: &str = r#" Add a "unit_type" field naming the unit priced (use "{unit}" when it applies)."#;

/// Format the discovery prompt.
pub fn build_discovery_prompt(category: &str, product_name: &str, tech_spec: &str) -> String {
    fill(
        DISCOVERY_PROMPT,
        &[
            ("category", category),
            ("product_name", product_name),
            ("tech_spec", tech_spec),
        ],
    )
}

/// Format the extraction prompt for one URL.
pub fn build_extraction_prompt(
    category: &str,
    product_name: &str,
    tech_spec: &str,
    url: &str,
) -> String {
    fill(
        EXTRACTION_PROMPT,
        &[
            ("category", category),
            ("product_name", product_name),
            ("tech_spec", tech_spec),
            ("url", url),
        ],
    )
}

/// Format the extraction prompt, asking for the `price_per_<basis>` field
/// when a basis is selected.
pub fn build_extraction_prompt_for_basis(
    category: &str,
    product_name: &str,
    tech_spec: &str,
    url: &str,
    basis: PriceBasis,
    unit_label: Option<&str>,
) -> String {
    let mut prompt = build_extraction_prompt(category, product_name, tech_spec, url);

    let Some(field) = basis.field_name() else {
        return prompt;
    };

    let basis_label = match basis {
        PriceBasis::Unit => unit_label.unwrap_or("unit"),
        PriceBasis::Kg => "kilogram",
        PriceBasis::Liter => "liter",
        _ => "package",
    };

    prompt.push_str(&fill(
        PRICE_BASIS_DIRECTIVE,
        &[("field", field), ("basis_label", basis_label)],
    ));

    if basis == PriceBasis::Unit {
        prompt.push_str(&fill(
            UNIT_TYPE_DIRECTIVE,
            &[("unit", unit_label.unwrap_or("unit"))],
        ));
    }

    prompt
}

/// SHA-256 of a rendered prompt, for correlating requests in logs.
pub fn prompt_fingerprint(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Substitute `{key}` placeholders in one pass.
///
/// Values are inserted verbatim and never rescanned, so user text that
/// happens to contain `{url}` stays as typed. Braces that are not a known
/// placeholder (the JSON example) pass through.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let matched = values.iter().find_map(|(key, value)| {
            after
                .strip_prefix(key)
                .and_then(|tail| tail.strip_prefix('}'))
                .map(|tail| (*value, tail))
        });

        match matched {
            Some((value, tail)) => {
                out.push_str(value);
                rest = tail;
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_prompt_contains_inputs() {
        let prompt = build_discovery_prompt("Smartphones", "iPhone 15", "128GB, 6.1 inch");

        assert!(prompt.contains("category: Smartphones"));
        assert!(prompt.contains("product name: iPhone 15"));
        assert!(prompt.contains("128GB, 6.1 inch"));
        assert!(!prompt.contains("{category}"));
    }

    #[test]
    fn test_discovery_prompt_deterministic() {
        let a = build_discovery_prompt("Vitamins", "Vitamin D", "");
        let b = build_discovery_prompt("Vitamins", "Vitamin D", "");
        assert_eq!(a, b);
        assert_eq!(prompt_fingerprint(&a), prompt_fingerprint(&b));
        assert_eq!(prompt_fingerprint(&a).len(), 64);
    }

    #[test]
    fn test_extraction_prompt_keeps_json_example() {
        let prompt = build_extraction_prompt(
            "Coffee",
            "Lavazza Qualita Oro",
            "1 kg beans",
            "https://barbora.lt/kava",
        );

        assert!(prompt.contains("from url = https://barbora.lt/kava"));
        assert!(prompt.contains(r#""product_properties": {"#));
        assert!(prompt.contains(r#""price_per_unit": 9.99"#));
        assert!(prompt.contains("ONLY provide the JSON array"));
    }

    #[test]
    fn test_placeholders_in_user_text_not_expanded() {
        let prompt = build_extraction_prompt("{url}", "{tech_spec}", "spec", "https://a.lt");

        assert!(prompt.contains("category: {url}"));
        assert!(prompt.contains("product name: {tech_spec}"));
    }

    #[test]
    fn test_basis_none_equals_plain_prompt() {
        let plain = build_extraction_prompt("Coffee", "Lavazza", "", "https://a.lt");
        let none = build_extraction_prompt_for_basis(
            "Coffee",
            "Lavazza",
            "",
            "https://a.lt",
            PriceBasis::None,
            None,
        );
        assert_eq!(plain, none);
    }

    #[test]
    fn test_basis_directives() {
        let kg = build_extraction_prompt_for_basis(
            "Coffee",
            "Lavazza",
            "",
            "https://a.lt",
            PriceBasis::Kg,
            None,
        );
        assert!(kg.contains(r#""price_per_kg""#));
        assert!(kg.contains("per kilogram"));
        assert!(!kg.contains("unit_type"));

        let unit = build_extraction_prompt_for_basis(
            "Vitamins",
            "Vitamin D",
            "",
            "https://a.lt",
            PriceBasis::Unit,
            Some("pill"),
        );
        assert!(unit.contains(r#""price_per_unit""#));
        assert!(unit.contains("per pill"));
        assert!(unit.contains(r#"use "pill""#));
    }

    #[test]
    fn test_fill_unknown_placeholder_passes_through() {
        assert_eq!(fill("{a} {b} {", &[("a", "1")]), "1 {b} {");
    }
}
