//! Product records extracted from listing pages.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::query::PriceBasis;

/// One product offer as reported by the model for a single URL.
///
/// Every field is optional: whatever the model left out stays unset.
/// Records carry no reference to the query that produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    /// Specification key/value pairs, in the order the model listed them
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub product_properties: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_sku: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_kg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_liter: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_package: Option<f64>,

    /// Unit `price_per_unit` refers to (tablet, pill, piece, ...)
    #[serde(default, alias = "unit_label", skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<String>,
}

impl ProductRecord {
    /// Coerce one element of the model's JSON array into a record.
    ///
    /// Returns `None` for anything that is not a JSON object. Numbers given
    /// as strings are parsed leniently; values of the wrong kind are dropped
    /// rather than guessed.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let text = |key: &str| obj.get(key).and_then(coerce_text);
        let number = |key: &str| obj.get(key).and_then(coerce_number);

        Some(Self {
            provider: text("provider"),
            provider_website: text("provider_website"),
            provider_url: text("provider_url"),
            product_name: text("product_name"),
            product_properties: obj
                .get("product_properties")
                .map(coerce_properties)
                .unwrap_or_default(),
            product_sku: text("product_sku"),
            product_price: number("product_price"),
            price_per_unit: number("price_per_unit"),
            price_per_kg: number("price_per_kg"),
            price_per_liter: number("price_per_liter"),
            price_per_package: number("price_per_package"),
            unit_type: text("unit_type").or_else(|| text("unit_label")),
            evaluation: text("evaluation"),
        })
    }

    /// The price normalized to `basis`, if the record carries one.
    pub fn price_for_basis(&self, basis: PriceBasis) -> Option<f64> {
        match basis {
            PriceBasis::None => None,
            PriceBasis::Unit => self.price_per_unit,
            PriceBasis::Kg => self.price_per_kg,
            PriceBasis::Liter => self.price_per_liter,
            PriceBasis::Package => self.price_per_package,
        }
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

fn coerce_properties(value: &Value) -> IndexMap<String, String> {
    let Some(obj) = value.as_object() else {
        return IndexMap::new();
    };

    obj.iter()
        .filter_map(|(key, v)| {
            let rendered = match v {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), rendered))
        })
        .collect()
}

/// Exactly one number, optionally wrapped in currency signs or words.
static DECIMAL_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^0-9]*?(-?[0-9][0-9.,\s]*)[^0-9]*$").expect("decimal token pattern is valid")
});

/// Parse a price written the way shops write them.
///
/// Accepts currency signs and words, spaces (including non-breaking) as
/// thousands separators, and either `,` or `.` as decimal mark. When both
/// marks appear the last one is the decimal mark.
///
/// Text holding more than one number ("21.99 (was 25.99)", "2 for 5.00")
/// is ambiguous and yields `None`.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let token = DECIMAL_TOKEN.captures(raw.trim())?.get(1)?.as_str();
    let kept: String = token
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .trim_end_matches(['.', ','])
        .to_string();

    let normalized = match (kept.rfind(','), kept.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => kept.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => kept.replace(',', ""),
        (Some(_), None) if kept.matches(',').count() == 1 => kept.replace(',', "."),
        (Some(_), None) => kept.replace(',', ""),
        (None, _) if kept.matches('.').count() > 1 => kept.replace('.', ""),
        _ => kept,
    };

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}
