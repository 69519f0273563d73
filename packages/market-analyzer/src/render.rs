//! Render model shared by the live results and history views.
//!
//! Pure functions from records to display strings. Front ends only decide
//! layout and colors.

use crate::stores::SearchHistory;
use crate::types::{history::SearchHistoryEntry, product::ProductRecord, query::PriceBasis, query::SearchQuery};

pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
pub const NO_EVALUATION: &str = "No evaluation available.";
pub const NO_PROPERTIES: &str = "No detailed properties available.";

/// Suffix shown after a per-basis price, e.g. `/kg`.
///
/// For the unit basis the record's own unit type wins, then the query's
/// unit label, then plain `/unit`. `None` for [`PriceBasis::None`].
pub fn unit_suffix(
    basis: PriceBasis,
    record: &ProductRecord,
    query_unit_label: Option<&str>,
) -> Option<String> {
    let suffix = match basis {
        PriceBasis::None => return None,
        PriceBasis::Unit => {
            let unit = record
                .unit_type
                .as_deref()
                .or(query_unit_label)
                .unwrap_or("unit");
            format!("/{}", unit)
        }
        PriceBasis::Kg => "/kg".to_string(),
        PriceBasis::Liter => "/L".to_string(),
        PriceBasis::Package => "/pkg".to_string(),
    };
    Some(suffix)
}

/// Euro amount, or `N/A` when missing.
///
/// At least two decimals, up to four when they carry digits, so per-unit
/// prices like `€0.094` are not rounded away.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => {
            let mut text = format!("{:.4}", p);
            while text.ends_with('0') && text.len() - text.find('.').unwrap_or(0) > 3 {
                text.pop();
            }
            format!("€{}", text)
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// A record's price normalized to the query basis.
#[derive(Debug, Clone, PartialEq)]
pub struct PerBasisPrice {
    /// e.g. "Price per Kg"
    pub label: String,
    pub amount: f64,
    pub suffix: String,
}

impl PerBasisPrice {
    /// e.g. `€4.50/kg`
    pub fn display(&self) -> String {
        format!("{}{}", format_price(Some(self.amount)), self.suffix)
    }
}

/// The per-basis price to show for `record`, if any.
///
/// Nothing is shown for basis none, even when the record carries
/// per-basis fields, nor when the record lacks the basis field.
pub fn per_basis_price(
    basis: PriceBasis,
    record: &ProductRecord,
    query_unit_label: Option<&str>,
) -> Option<PerBasisPrice> {
    let amount = record.price_for_basis(basis)?;
    let suffix = unit_suffix(basis, record, query_unit_label)?;
    Some(PerBasisPrice {
        label: format!("Price per {}", capitalize(basis.as_str())),
        amount,
        suffix,
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn or_na(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// One product, ready to print.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    /// `1. Name - €9.99 (€4.50/kg)`
    pub headline: String,
    pub name: String,
    pub provider: String,
    pub website: String,
    /// Product page, only when the record has one
    pub link: Option<String>,
    pub sku: String,
    pub price: String,
    pub per_basis: Option<PerBasisPrice>,
    /// In the order the model listed them
    pub properties: Vec<(String, String)>,
    pub evaluation: String,
}

impl ProductView {
    /// Build the view of the `index`-th (1-based) record.
    pub fn build(index: usize, record: &ProductRecord, query: &SearchQuery) -> Self {
        let name = record
            .product_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());
        let price = format_price(record.product_price);
        let per_basis = per_basis_price(query.price_basis(), record, query.unit_label());

        let mut headline = format!("{}. {} - {}", index, name, price);
        if let Some(per) = &per_basis {
            headline.push_str(&format!(" ({})", per.display()));
        }

        Self {
            headline,
            name,
            provider: or_na(&record.provider),
            website: or_na(&record.provider_website),
            link: record.provider_url.clone(),
            sku: or_na(&record.product_sku),
            price,
            per_basis,
            properties: record
                .product_properties
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            evaluation: record
                .evaluation
                .clone()
                .unwrap_or_else(|| NO_EVALUATION.to_string()),
        }
    }
}

/// Aggregated results of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    /// `Found 3 Products for Vitamin D in Vitamins category`
    pub title: String,
    pub products: Vec<ProductView>,
}

impl ResultsView {
    pub fn build(products: &[ProductRecord], query: &SearchQuery) -> Self {
        Self {
            title: format!(
                "Found {} Products for {} in {} category",
                products.len(),
                query.product_name(),
                query.category()
            ),
            products: products
                .iter()
                .enumerate()
                .map(|(i, record)| ProductView::build(i + 1, record, query))
                .collect(),
        }
    }
}

/// `<timestamp> - [<category>] <product> (Price per <basis>)`
pub fn history_title(entry: &SearchHistoryEntry) -> String {
    let query = entry.query();
    let mut title = format!(
        "{} - [{}] {}",
        entry.timestamp(),
        query.category(),
        query.product_name()
    );
    if !query.price_basis().is_none() {
        title.push_str(&format!(" (Price per {})", query.price_basis()));
    }
    title
}

/// One history entry, ready to print.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntryView {
    pub title: String,
    pub category: String,
    pub product_name: String,
    pub tech_spec: String,
    /// `Price per kg`, absent for basis none
    pub price_calculation: Option<String>,
    /// `3 products found`
    pub summary: String,
    pub results: ResultsView,
}

impl HistoryEntryView {
    pub fn build(entry: &SearchHistoryEntry) -> Self {
        let query = entry.query();
        let basis = query.price_basis();
        Self {
            title: history_title(entry),
            category: query.category().to_string(),
            product_name: query.product_name().to_string(),
            tech_spec: query.tech_spec().to_string(),
            price_calculation: (!basis.is_none()).then(|| format!("Price per {}", basis)),
            summary: format!("{} products found", entry.results().len()),
            results: ResultsView::build(entry.results(), query),
        }
    }
}

/// Views of every history entry, newest first.
pub fn history_views(history: &SearchHistory) -> Vec<HistoryEntryView> {
    history.newest_first().map(HistoryEntryView::build).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn query(basis: PriceBasis, label: Option<&str>) -> SearchQuery {
        SearchQuery::new("Vitamins", "Vitamin D", "2000 IU")
            .unwrap()
            .with_price_basis(basis, label.map(String::from))
    }

    fn record() -> ProductRecord {
        ProductRecord {
            product_name: Some("Vitamin D3 2000 IU".into()),
            product_price: Some(9.99),
            price_per_unit: Some(0.1),
            price_per_kg: Some(120.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_suffix_kg() {
        assert_eq!(unit_suffix(PriceBasis::Kg, &record(), None).as_deref(), Some("/kg"));
        assert_eq!(unit_suffix(PriceBasis::Liter, &record(), None).as_deref(), Some("/L"));
        assert_eq!(unit_suffix(PriceBasis::Package, &record(), None).as_deref(), Some("/pkg"));
    }

    #[test]
    fn test_suffix_unit_prefers_record_unit_type() {
        let mut r = record();
        r.unit_type = Some("pill".into());

        assert_eq!(unit_suffix(PriceBasis::Unit, &r, Some("tablet")).as_deref(), Some("/pill"));
        assert_eq!(
            unit_suffix(PriceBasis::Unit, &record(), Some("tablet")).as_deref(),
            Some("/tablet")
        );
        assert_eq!(unit_suffix(PriceBasis::Unit, &record(), None).as_deref(), Some("/unit"));
    }

    #[test]
    fn test_basis_none_shows_no_per_basis_price() {
        assert!(unit_suffix(PriceBasis::None, &record(), None).is_none());
        assert!(per_basis_price(PriceBasis::None, &record(), None).is_none());

        let view = ProductView::build(1, &record(), &query(PriceBasis::None, None));
        assert!(view.per_basis.is_none());
        assert_eq!(view.headline, "1. Vitamin D3 2000 IU - €9.99");
    }

    #[test]
    fn test_format_price_keeps_small_amounts() {
        assert_eq!(format_price(Some(0.094)), "€0.094");
        assert_eq!(format_price(Some(0.0125)), "€0.0125");
        assert_eq!(format_price(Some(120.0)), "€120.00");
        assert_eq!(format_price(Some(9.99)), "€9.99");
        assert_eq!(format_price(Some(4.5)), "€4.50");
        assert_eq!(format_price(None), NOT_AVAILABLE);
    }

    #[test]
    fn test_per_unit_price_not_rounded_away() {
        let mut r = record();
        r.price_per_unit = Some(0.094);
        r.unit_type = Some("tablet".into());

        let per = per_basis_price(PriceBasis::Unit, &r, None).unwrap();
        assert_eq!(per.display(), "€0.094/tablet");
    }

    #[test]
    fn test_missing_basis_field_shows_nothing() {
        let r = record();
        assert!(per_basis_price(PriceBasis::Liter, &r, None).is_none());
    }

    #[test]
    fn test_product_view_with_basis() {
        let view = ProductView::build(2, &record(), &query(PriceBasis::Kg, None));

        let per = view.per_basis.clone().unwrap();
        assert_eq!(per.label, "Price per Kg");
        assert_eq!(per.display(), "€120.00/kg");
        assert_eq!(view.headline, "2. Vitamin D3 2000 IU - €9.99 (€120.00/kg)");
    }

    #[test]
    fn test_product_view_placeholders() {
        let view = ProductView::build(1, &ProductRecord::default(), &query(PriceBasis::None, None));

        assert_eq!(view.name, UNKNOWN_PRODUCT);
        assert_eq!(view.price, NOT_AVAILABLE);
        assert_eq!(view.provider, NOT_AVAILABLE);
        assert_eq!(view.website, NOT_AVAILABLE);
        assert_eq!(view.sku, NOT_AVAILABLE);
        assert_eq!(view.evaluation, NO_EVALUATION);
        assert!(view.link.is_none());
        assert!(view.properties.is_empty());
    }

    #[test]
    fn test_results_title() {
        let view = ResultsView::build(&[record(), record()], &query(PriceBasis::None, None));
        assert_eq!(view.title, "Found 2 Products for Vitamin D in Vitamins category");
        assert_eq!(view.products.len(), 2);
        assert!(view.products[1].headline.starts_with("2. "));
    }

    #[test]
    fn test_history_title_and_order() {
        let mut history = SearchHistory::new();
        let t0 = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        history.record_at(t0, query(PriceBasis::None, None), vec![record()]);
        history.record_at(
            t0 + chrono::Duration::seconds(5),
            query(PriceBasis::Kg, None),
            vec![record()],
        );

        let views = history_views(&history);

        assert_eq!(views[0].title, "2025-03-01 10:00:05 - [Vitamins] Vitamin D (Price per kg)");
        assert_eq!(views[1].title, "2025-03-01 10:00:00 - [Vitamins] Vitamin D");
        assert_eq!(views[0].price_calculation.as_deref(), Some("Price per kg"));
        assert_eq!(views[1].summary, "1 products found");
    }
}
