//! Search query and price basis.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AnalyzerError, Result};

/// Normalization unit for comparing prices across products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceBasis {
    /// Standard price only
    #[default]
    None,
    Unit,
    Kg,
    Liter,
    Package,
}

impl PriceBasis {
    /// Every basis, in selector order.
    pub const ALL: [PriceBasis; 5] = [
        PriceBasis::None,
        PriceBasis::Unit,
        PriceBasis::Kg,
        PriceBasis::Liter,
        PriceBasis::Package,
    ];

    /// Lower-case keyword ("none", "unit", "kg", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Unit => "unit",
            Self::Kg => "kg",
            Self::Liter => "liter",
            Self::Package => "package",
        }
    }

    /// Record field carrying the per-basis price, `price_per_<basis>`.
    pub fn field_name(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Unit => Some("price_per_unit"),
            Self::Kg => Some("price_per_kg"),
            Self::Liter => Some("price_per_liter"),
            Self::Package => Some("price_per_package"),
        }
    }

    /// Human description shown in the selector.
    pub fn description(&self) -> &'static str {
        match self {
            Self::None => "No special calculation (standard price)",
            Self::Unit => "Price per unit (e.g., per item)",
            Self::Kg => "Price per kilogram",
            Self::Liter => "Price per liter",
            Self::Package => "Price per package",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for PriceBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceBasis {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == wanted)
            .ok_or_else(|| AnalyzerError::InvalidQuery {
                reason: format!(
                    "unknown price basis '{}' (expected none, unit, kg, liter or package)",
                    s
                ),
            })
    }
}

/// What the user is looking for.
///
/// Immutable once built; a run borrows it for discovery, extraction and the
/// history entry it produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    category: String,
    product_name: String,
    tech_spec: String,
    price_basis: PriceBasis,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit_label: Option<String>,
}

impl SearchQuery {
    /// Build a query with no price basis.
    ///
    /// Fails when category or product name is blank.
    pub fn new(
        category: impl Into<String>,
        product_name: impl Into<String>,
        tech_spec: impl Into<String>,
    ) -> Result<Self> {
        let category = category.into().trim().to_string();
        let product_name = product_name.into().trim().to_string();

        if category.is_empty() {
            return Err(AnalyzerError::InvalidQuery {
                reason: "product category is required".into(),
            });
        }
        if product_name.is_empty() {
            return Err(AnalyzerError::InvalidQuery {
                reason: "product name is required".into(),
            });
        }

        Ok(Self {
            category,
            product_name,
            tech_spec: tech_spec.into().trim().to_string(),
            price_basis: PriceBasis::None,
            unit_label: None,
        })
    }

    /// Set the price basis. The unit label is kept only for the unit basis.
    pub fn with_price_basis(mut self, basis: PriceBasis, unit_label: Option<String>) -> Self {
        self.price_basis = basis;
        self.unit_label = match basis {
            PriceBasis::Unit => unit_label
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            _ => None,
        };
        self
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn tech_spec(&self) -> &str {
        &self.tech_spec
    }

    pub fn price_basis(&self) -> PriceBasis {
        self.price_basis
    }

    pub fn unit_label(&self) -> Option<&str> {
        self.unit_label.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_category_rejected() {
        let err = SearchQuery::new("  ", "Vitamin D", "").unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidQuery { .. }));
    }

    #[test]
    fn test_blank_product_name_rejected() {
        assert!(SearchQuery::new("Vitamins", "", "2000 IU").is_err());
    }

    #[test]
    fn test_fields_trimmed() {
        let q = SearchQuery::new(" Vitamins ", " Vitamin D ", " 2000 IU\n").unwrap();
        assert_eq!(q.category(), "Vitamins");
        assert_eq!(q.product_name(), "Vitamin D");
        assert_eq!(q.tech_spec(), "2000 IU");
        assert_eq!(q.price_basis(), PriceBasis::None);
    }

    #[test]
    fn test_unit_label_only_for_unit_basis() {
        let base = SearchQuery::new("Vitamins", "Vitamin D", "").unwrap();

        let unit = base
            .clone()
            .with_price_basis(PriceBasis::Unit, Some("tablet".into()));
        assert_eq!(unit.unit_label(), Some("tablet"));

        let kg = base
            .clone()
            .with_price_basis(PriceBasis::Kg, Some("tablet".into()));
        assert_eq!(kg.unit_label(), None);

        let blank = base.with_price_basis(PriceBasis::Unit, Some("  ".into()));
        assert_eq!(blank.unit_label(), None);
    }

    #[test]
    fn test_price_basis_parsing() {
        assert_eq!("KG".parse::<PriceBasis>().unwrap(), PriceBasis::Kg);
        assert_eq!(" liter ".parse::<PriceBasis>().unwrap(), PriceBasis::Liter);
        assert!("gallon".parse::<PriceBasis>().is_err());
    }

    #[test]
    fn test_field_names() {
        assert_eq!(PriceBasis::None.field_name(), None);
        assert_eq!(PriceBasis::Package.field_name(), Some("price_per_package"));
        for basis in PriceBasis::ALL.iter().skip(1) {
            assert_eq!(
                basis.field_name().unwrap(),
                format!("price_per_{}", basis.as_str())
            );
        }
    }
}
