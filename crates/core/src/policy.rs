//! Field policies: the read-shape to write-shape projection.
//!
//! Records come back from the API in their read shape, carrying
//! system-managed fields (`id`, `version`, timestamps, computed values)
//! that the create endpoints reject. A [`FieldPolicy`] describes which
//! fields survive: either an explicit allow-list or a strip-list.
//! Null-valued fields never survive in either mode -- the destination
//! API treats absent and null as equivalent but rejects some null types.

use serde_json::{Map, Value};

/// How fields move from a record's read shape to its write shape.
/// Exactly one mode governs a given entity type.
#[derive(Debug, Clone, Copy)]
pub enum FieldPolicy {
    /// Only listed fields pass through.
    Allow(&'static [&'static str]),
    /// All fields pass through except listed ones.
    Strip(&'static [&'static str]),
}

impl FieldPolicy {
    /// Whether a field with the given name passes this policy.
    pub fn keeps(&self, key: &str) -> bool {
        match self {
            Self::Allow(fields) => fields.contains(&key),
            Self::Strip(fields) => !fields.contains(&key),
        }
    }
}

/// Fields accepted by `POST /products`. Whitelist approach: the read
/// shape carries far more (variant metadata, image URLs, inventory)
/// than the create endpoint accepts.
pub const PRODUCT_FIELDS: FieldPolicy = FieldPolicy::Allow(&[
    "name",
    "description",
    "handle",
    "sku",
    "product_codes",
    "source",
    "source_id",
    "source_variant_id",
    "is_active",
    "price_including_tax",
    "price_excluding_tax",
    "supply_price",
    "supplier_id",
    "supplier_code",
    "product_suppliers",
    "product_type_id",
    "product_category_id",
    "brand_id",
    "tag_ids",
    "account_code_sale",
    "account_code_purchase",
    "loyalty_amount",
    "weight",
    "weight_unit",
    "length",
    "width",
    "height",
    "dimensions_unit",
    "all_outlets_tax",
    "outlet_taxes",
]);

/// System-managed fields removed before `POST /customers`. Strip
/// approach: the customer write shape is the read shape minus these.
pub const CUSTOMER_FIELDS: FieldPolicy = FieldPolicy::Strip(&[
    "id",
    "version",
    "created_at",
    "updated_at",
    "deleted_at",
    "customer_code",
    "year_to_date",
    "balance",
    "loyalty_balance",
    "loyalty_email_sent",
    "custom_field_1",
    "custom_field_2",
    "custom_field_3",
    "custom_field_4",
]);

/// Project a record through a field policy.
///
/// Returns a new object containing the fields the policy keeps, with
/// null-valued fields excluded regardless of policy mode. Projection is
/// idempotent: projecting an already-projected record again yields the
/// same result.
pub fn project(record: &Map<String, Value>, policy: &FieldPolicy) -> Map<String, Value> {
    record
        .iter()
        .filter(|(key, value)| policy.keeps(key) && !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
