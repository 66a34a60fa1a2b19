//! Entity vocabulary shared across the client, orchestrator, and logger,
//! plus small helpers for reading typed values out of loosely-shaped
//! JSON records returned by the API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// The record types the remote store can list and (for most of them)
/// create. String form is the plural snake_case name, which doubles as
/// the API path segment and the key used in the operation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Brands,
    Suppliers,
    Outlets,
    Registers,
    Users,
    Taxes,
    PaymentTypes,
    Products,
    Customers,
    Sales,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brands => "brands",
            Self::Suppliers => "suppliers",
            Self::Outlets => "outlets",
            Self::Registers => "registers",
            Self::Users => "users",
            Self::Taxes => "taxes",
            Self::PaymentTypes => "payment_types",
            Self::Products => "products",
            Self::Customers => "customers",
            Self::Sales => "sales",
        }
    }

    /// Parse a kind string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "brands" => Some(Self::Brands),
            "suppliers" => Some(Self::Suppliers),
            "outlets" => Some(Self::Outlets),
            "registers" => Some(Self::Registers),
            "users" => Some(Self::Users),
            "taxes" => Some(Self::Taxes),
            "payment_types" => Some(Self::PaymentTypes),
            "products" => Some(Self::Products),
            "customers" => Some(Self::Customers),
            "sales" => Some(Self::Sales),
            _ => None,
        }
    }

    /// All kinds, in clone dependency order.
    pub const ALL: &'static [EntityKind] = &[
        Self::Brands,
        Self::Suppliers,
        Self::Outlets,
        Self::Registers,
        Self::Users,
        Self::Taxes,
        Self::PaymentTypes,
        Self::Products,
        Self::Customers,
        Self::Sales,
    ];
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Pricing mode
// ---------------------------------------------------------------------------

/// Whether an account's displayed prices include tax. Decides which of
/// the two mutually exclusive product price fields survives transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingMode {
    Inclusive,
    Exclusive,
}

impl PricingMode {
    /// Derive the mode from the retailer's `tax_exclusive` flag.
    pub fn from_tax_exclusive(tax_exclusive: bool) -> Self {
        if tax_exclusive {
            Self::Exclusive
        } else {
            Self::Inclusive
        }
    }

    /// The product price field this mode keeps.
    pub fn price_field(&self) -> &'static str {
        match self {
            Self::Inclusive => "price_including_tax",
            Self::Exclusive => "price_excluding_tax",
        }
    }
}

// ---------------------------------------------------------------------------
// Record helpers
// ---------------------------------------------------------------------------

/// Read a string field out of a JSON record, if present and non-empty.
pub fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Read a numeric field out of a JSON record.
pub fn f64_field(record: &Value, key: &str) -> Option<f64> {
    record.get(key).and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_str(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn kind_unknown_returns_none() {
        assert!(EntityKind::from_str("invoices").is_none());
    }

    #[test]
    fn kind_display_matches_as_str() {
        assert_eq!(format!("{}", EntityKind::PaymentTypes), "payment_types");
    }

    #[test]
    fn pricing_mode_from_retailer_flag() {
        assert_eq!(
            PricingMode::from_tax_exclusive(false),
            PricingMode::Inclusive
        );
        assert_eq!(
            PricingMode::from_tax_exclusive(true),
            PricingMode::Exclusive
        );
    }

    #[test]
    fn str_field_skips_empty_and_wrong_type() {
        let record = json!({ "name": "Main Store", "id": "", "version": 3 });
        assert_eq!(str_field(&record, "name"), Some("Main Store"));
        assert_eq!(str_field(&record, "id"), None);
        assert_eq!(str_field(&record, "version"), None);
        assert_eq!(str_field(&record, "missing"), None);
    }

    #[test]
    fn f64_field_reads_numbers() {
        let record = json!({ "quantity": 2, "price": 19.99 });
        assert_eq!(f64_field(&record, "quantity"), Some(2.0));
        assert_eq!(f64_field(&record, "price"), Some(19.99));
        assert_eq!(f64_field(&record, "missing"), None);
    }
}
