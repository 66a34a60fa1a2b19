//! Per-entity record transformers.
//!
//! Each transformer takes a record in the source account's read shape
//! and produces a payload valid for creation on the destination:
//! field projection, foreign-key substitution through the identity
//! maps, and the entity-specific hard requirements. Products and
//! customers stay open JSON objects (their write shape is a filtered
//! view of whatever the source returned); sales and inventory levels
//! are rebuilt as typed payloads because their write shape is fixed.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::entity::{f64_field, str_field, PricingMode};
use crate::mapping::IdMap;
use crate::policy::{project, CUSTOMER_FIELDS, PRODUCT_FIELDS};

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Transform a product read from the source into a `POST /products`
/// payload for the destination.
///
/// Applies the product allow-list, then:
/// - `brand_id` / `supplier_id` are substituted through the owned-entity
///   maps; an unmapped ID drops the field entirely rather than erroring.
/// - Nested `product_codes` keep only non-null `type`/`code`; empty
///   elements are dropped without affecting their siblings.
/// - Nested `product_suppliers` keep `price` and `code`, plus
///   `supplier_id` only when it maps; elements left empty are dropped.
/// - A source `active` field is renamed to `is_active` when the
///   projected output has no `is_active` of its own.
/// - When both tax-inclusive and tax-exclusive prices are present,
///   exactly the one matching `mode` survives.
pub fn transform_product(
    product: &Map<String, Value>,
    mode: PricingMode,
    brands: &IdMap,
    suppliers: &IdMap,
) -> Map<String, Value> {
    let mut out = Map::new();

    for (key, value) in product {
        if !PRODUCT_FIELDS.keeps(key) || value.is_null() {
            continue;
        }

        match key.as_str() {
            "brand_id" => {
                if let Some(dest_id) = value.as_str().and_then(|id| brands.get(id)) {
                    out.insert(key.clone(), Value::String(dest_id.to_string()));
                }
            }
            "supplier_id" => {
                if let Some(dest_id) = value.as_str().and_then(|id| suppliers.get(id)) {
                    out.insert(key.clone(), Value::String(dest_id.to_string()));
                }
            }
            "product_codes" => {
                if let Some(codes) = value.as_array() {
                    let cleaned = clean_product_codes(codes);
                    if !cleaned.is_empty() {
                        out.insert(key.clone(), Value::Array(cleaned));
                    }
                }
            }
            "product_suppliers" => {
                if let Some(links) = value.as_array() {
                    let cleaned = clean_product_suppliers(links, suppliers);
                    if !cleaned.is_empty() {
                        out.insert(key.clone(), Value::Array(cleaned));
                    }
                }
            }
            _ => {
                out.insert(key.clone(), value.clone());
            }
        }
    }

    // Read-shape `active` vs write-shape `is_active` drift.
    if !out.contains_key("is_active") {
        if let Some(active) = product.get("active").filter(|v| !v.is_null()) {
            out.insert("is_active".to_string(), active.clone());
        }
    }

    // The API rejects payloads carrying both price fields.
    if out.contains_key("price_including_tax") && out.contains_key("price_excluding_tax") {
        match mode {
            PricingMode::Inclusive => out.remove("price_excluding_tax"),
            PricingMode::Exclusive => out.remove("price_including_tax"),
        };
    }

    out
}

/// Keep only non-null `type` and `code` from each code record.
fn clean_product_codes(codes: &[Value]) -> Vec<Value> {
    codes
        .iter()
        .filter_map(|code| {
            let obj = code.as_object()?;
            let cleaned: Map<String, Value> = obj
                .iter()
                .filter(|(k, v)| matches!(k.as_str(), "type" | "code") && !v.is_null())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            (!cleaned.is_empty()).then_some(Value::Object(cleaned))
        })
        .collect()
}

/// Keep `price` and `code` from each supplier link, substituting
/// `supplier_id` only when it resolves; elements that end up empty
/// (e.g. an unmapped supplier with nothing else) are dropped.
fn clean_product_suppliers(links: &[Value], suppliers: &IdMap) -> Vec<Value> {
    links
        .iter()
        .filter_map(|link| {
            let obj = link.as_object()?;
            let mut cleaned = Map::new();
            for (k, v) in obj {
                if v.is_null() {
                    continue;
                }
                match k.as_str() {
                    "supplier_id" => {
                        if let Some(dest_id) = v.as_str().and_then(|id| suppliers.get(id)) {
                            cleaned.insert(k.clone(), Value::String(dest_id.to_string()));
                        }
                    }
                    "price" | "code" => {
                        cleaned.insert(k.clone(), v.clone());
                    }
                    _ => {}
                }
            }
            (!cleaned.is_empty()).then_some(Value::Object(cleaned))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

/// Transform a customer read from the source into a `POST /customers`
/// payload. Strips system-managed fields; the nested `customer_group`
/// reference is always dropped because no mapping exists for it.
pub fn transform_customer(customer: &Map<String, Value>) -> Map<String, Value> {
    let mut out = project(customer, &CUSTOMER_FIELDS);
    out.remove("customer_group");
    out
}

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

/// Identity maps needed to rebuild a sale against the destination
/// account. Reference maps are read-only, built once per stage; the
/// product and customer maps come out of the earlier clone stages.
pub struct SaleMaps<'a> {
    pub products: &'a IdMap,
    pub customers: &'a IdMap,
    pub registers: &'a IdMap,
    pub users: &'a IdMap,
    pub taxes: &'a IdMap,
    pub payment_types: &'a IdMap,
}

/// A sale rebuilt for `POST /register_sales`. Cloned sales are always
/// created as closed historical sales regardless of source status.
#[derive(Debug, Clone, Serialize)]
pub struct SalePayload {
    pub register_id: String,
    pub user_id: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub register_sale_products: Vec<SaleLineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_sale_payments: Option<Vec<SalePayment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tax: Option<f64>,
}

/// One line of a rebuilt sale.
#[derive(Debug, Clone, Serialize)]
pub struct SaleLineItem {
    pub product_id: String,
    pub quantity: f64,
    pub price: f64,
    pub discount: f64,
    pub loyalty_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
}

/// One payment of a rebuilt sale.
#[derive(Debug, Clone, Serialize)]
pub struct SalePayment {
    pub payment_type_id: String,
    pub amount: f64,
}

/// Status every cloned sale is created with.
const CLONED_SALE_STATUS: &str = "CLOSED";

/// Transform a sale read from the source into a destination payload.
///
/// Returns `None` ("no result") when the sale cannot be expressed on
/// the destination at all:
/// - its register or user has no entry in the respective map, or
/// - no line item survives product-mapping (a sale with no resolvable
///   products is meaningless).
///
/// Everything else degrades field by field: unmapped line-item products
/// drop that item only, an unmapped tax drops the item's tax field, an
/// unmapped payment type drops that payment, a missing or unmapped
/// customer is simply omitted.
pub fn transform_sale(sale: &Value, maps: &SaleMaps<'_>) -> Option<SalePayload> {
    let register_id = str_field(sale, "register_id")
        .and_then(|id| maps.registers.get(id))?
        .to_string();
    let user_id = str_field(sale, "user_id")
        .and_then(|id| maps.users.get(id))?
        .to_string();

    let customer_id = str_field(sale, "customer_id")
        .and_then(|id| maps.customers.get(id))
        .map(str::to_string);

    let mut line_items = Vec::new();
    if let Some(items) = sale.get("register_sale_products").and_then(Value::as_array) {
        for item in items {
            let Some(product_id) = str_field(item, "product_id")
                .and_then(|id| maps.products.get(id))
            else {
                continue; // Product was not cloned; drop this item only.
            };

            line_items.push(SaleLineItem {
                product_id: product_id.to_string(),
                quantity: f64_field(item, "quantity").unwrap_or(1.0),
                price: f64_field(item, "price").unwrap_or(0.0),
                discount: f64_field(item, "discount").unwrap_or(0.0),
                loyalty_value: f64_field(item, "loyalty_value").unwrap_or(0.0),
                tax_id: str_field(item, "tax_id")
                    .and_then(|id| maps.taxes.get(id))
                    .map(str::to_string),
            });
        }
    }
    if line_items.is_empty() {
        return None;
    }

    let mut payments = Vec::new();
    if let Some(entries) = sale.get("register_sale_payments").and_then(Value::as_array) {
        for payment in entries {
            let Some(payment_type_id) = str_field(payment, "payment_type_id")
                .and_then(|id| maps.payment_types.get(id))
            else {
                continue;
            };
            payments.push(SalePayment {
                payment_type_id: payment_type_id.to_string(),
                amount: f64_field(payment, "amount").unwrap_or(0.0),
            });
        }
    }

    Some(SalePayload {
        register_id,
        user_id,
        status: CLONED_SALE_STATUS,
        sale_date: str_field(sale, "sale_date").map(str::to_string),
        customer_id,
        register_sale_products: line_items,
        register_sale_payments: (!payments.is_empty()).then_some(payments),
        note: str_field(sale, "note").map(str::to_string),
        short_code: str_field(sale, "short_code").map(str::to_string),
        total_price: f64_field(sale, "total_price"),
        total_tax: f64_field(sale, "total_tax"),
    })
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// A stock level for one destination outlet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryLevel {
    pub outlet_id: String,
    pub current_amount: f64,
}

/// Rewrite source stock records against destination outlet IDs.
///
/// Records whose outlet has no mapping are dropped, not defaulted; a
/// missing `current_amount` defaults to zero.
pub fn transform_inventory(records: &[Value], outlets: &IdMap) -> Vec<InventoryLevel> {
    records
        .iter()
        .filter_map(|record| {
            let dest_outlet = str_field(record, "outlet_id").and_then(|id| outlets.get(id))?;
            Some(InventoryLevel {
                outlet_id: dest_outlet.to_string(),
                current_amount: f64_field(record, "current_amount").unwrap_or(0.0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    fn id_map(pairs: &[(&str, &str)]) -> IdMap {
        pairs
            .iter()
            .map(|(s, d)| (s.to_string(), d.to_string()))
            .collect()
    }

    fn empty_maps() -> (IdMap, IdMap) {
        (IdMap::new(), IdMap::new())
    }

    // -- transform_product ----------------------------------------------------

    #[test]
    fn product_strips_system_fields() {
        let (brands, suppliers) = empty_maps();
        let product = as_map(json!({
            "id": "uuid-1",
            "version": 5,
            "created_at": "2024-01-01",
            "has_variants": true,
            "name": "Test Product",
            "sku": "TEST-001",
        }));

        let out = transform_product(&product, PricingMode::Inclusive, &brands, &suppliers);
        assert!(!out.contains_key("id"));
        assert!(!out.contains_key("version"));
        assert!(!out.contains_key("created_at"));
        assert!(!out.contains_key("has_variants"));
        assert_eq!(out["name"], "Test Product");
        assert_eq!(out["sku"], "TEST-001");
    }

    #[test]
    fn product_substitutes_mapped_brand_and_drops_unmapped_supplier() {
        let brands = id_map(&[("brand-src", "brand-dst")]);
        let suppliers = IdMap::new();
        let product = as_map(json!({
            "name": "P",
            "brand_id": "brand-src",
            "supplier_id": "supplier-src",
        }));

        let out = transform_product(&product, PricingMode::Inclusive, &brands, &suppliers);
        assert_eq!(out["brand_id"], "brand-dst");
        assert!(!out.contains_key("supplier_id"));
    }

    #[test]
    fn product_cleans_nested_codes() {
        let (brands, suppliers) = empty_maps();
        let product = as_map(json!({
            "name": "P",
            "product_codes": [
                { "id": "code-1", "type": "CUSTOM", "code": "ABC", "created_at": "x" },
                { "id": "code-2", "type": null, "code": null },
            ],
        }));

        let out = transform_product(&product, PricingMode::Inclusive, &brands, &suppliers);
        let codes = out["product_codes"].as_array().unwrap();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0], json!({ "type": "CUSTOM", "code": "ABC" }));
    }

    #[test]
    fn product_cleans_supplier_links_elementwise() {
        let brands = IdMap::new();
        let suppliers = id_map(&[("sup-src", "sup-dst")]);
        let product = as_map(json!({
            "name": "P",
            "product_suppliers": [
                { "id": "link-1", "supplier_id": "sup-src", "price": 4.5 },
                { "supplier_id": "sup-unmapped", "code": "C-2" },
                { "supplier_id": "sup-unmapped" },
            ],
        }));

        let out = transform_product(&product, PricingMode::Inclusive, &brands, &suppliers);
        let links = out["product_suppliers"].as_array().unwrap();
        // Third element had nothing left after dropping its unmapped id.
        assert_eq!(links.len(), 2);
        assert_eq!(links[0], json!({ "supplier_id": "sup-dst", "price": 4.5 }));
        assert_eq!(links[1], json!({ "code": "C-2" }));
    }

    #[test]
    fn product_renames_active_to_is_active() {
        let (brands, suppliers) = empty_maps();
        let product = as_map(json!({ "name": "P", "active": false }));

        let out = transform_product(&product, PricingMode::Inclusive, &brands, &suppliers);
        assert_eq!(out["is_active"], json!(false));
        assert!(!out.contains_key("active"));
    }

    #[test]
    fn product_existing_is_active_wins_over_rename() {
        let (brands, suppliers) = empty_maps();
        let product = as_map(json!({ "name": "P", "active": false, "is_active": true }));

        let out = transform_product(&product, PricingMode::Inclusive, &brands, &suppliers);
        assert_eq!(out["is_active"], json!(true));
    }

    #[test]
    fn product_keeps_one_price_field_per_mode() {
        let (brands, suppliers) = empty_maps();
        let product = as_map(json!({
            "name": "P",
            "price_including_tax": 29.99,
            "price_excluding_tax": 26.08,
        }));

        let out = transform_product(&product, PricingMode::Inclusive, &brands, &suppliers);
        assert_eq!(out["price_including_tax"], json!(29.99));
        assert!(!out.contains_key("price_excluding_tax"));

        let out = transform_product(&product, PricingMode::Exclusive, &brands, &suppliers);
        assert_eq!(out["price_excluding_tax"], json!(26.08));
        assert!(!out.contains_key("price_including_tax"));
    }

    #[test]
    fn product_single_price_field_survives_either_mode() {
        let (brands, suppliers) = empty_maps();
        let product = as_map(json!({ "name": "P", "price_including_tax": 9.99 }));

        let out = transform_product(&product, PricingMode::Exclusive, &brands, &suppliers);
        assert_eq!(out["price_including_tax"], json!(9.99));
    }

    // -- transform_customer ---------------------------------------------------

    #[test]
    fn customer_strips_system_fields_and_group() {
        let customer = as_map(json!({
            "id": "uuid-2",
            "version": 3,
            "customer_code": "C-001",
            "balance": 50.0,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "customer_group": { "id": "group-1", "name": "VIP" },
        }));

        let out = transform_customer(&customer);
        assert!(!out.contains_key("id"));
        assert!(!out.contains_key("customer_code"));
        assert!(!out.contains_key("balance"));
        assert!(!out.contains_key("customer_group"));
        assert_eq!(out["first_name"], "Ada");
        assert_eq!(out["email"], "ada@example.com");
    }

    // -- transform_sale -------------------------------------------------------

    fn sale_maps<'a>(
        products: &'a IdMap,
        customers: &'a IdMap,
        registers: &'a IdMap,
        users: &'a IdMap,
        taxes: &'a IdMap,
        payment_types: &'a IdMap,
    ) -> SaleMaps<'a> {
        SaleMaps {
            products,
            customers,
            registers,
            users,
            taxes,
            payment_types,
        }
    }

    #[test]
    fn sale_with_unmapped_register_is_rejected() {
        let products = id_map(&[("prod-src-1", "prod-dst-1")]);
        let customers = IdMap::new();
        let registers = id_map(&[("reg-src-1", "reg-dst-1")]);
        let users = id_map(&[("user-src-1", "user-dst-1")]);
        let taxes = IdMap::new();
        let payment_types = IdMap::new();
        let maps = sale_maps(&products, &customers, &registers, &users, &taxes, &payment_types);

        let sale = json!({
            "register_id": "unmapped-register",
            "user_id": "user-src-1",
            "register_sale_products": [{ "product_id": "prod-src-1" }],
        });
        assert!(transform_sale(&sale, &maps).is_none());
    }

    #[test]
    fn sale_with_unmapped_user_is_rejected() {
        let products = id_map(&[("prod-src-1", "prod-dst-1")]);
        let customers = IdMap::new();
        let registers = id_map(&[("reg-src-1", "reg-dst-1")]);
        let users = id_map(&[("user-src-1", "user-dst-1")]);
        let taxes = IdMap::new();
        let payment_types = IdMap::new();
        let maps = sale_maps(&products, &customers, &registers, &users, &taxes, &payment_types);

        let sale = json!({
            "register_id": "reg-src-1",
            "user_id": "someone-else",
            "register_sale_products": [{ "product_id": "prod-src-1" }],
        });
        assert!(transform_sale(&sale, &maps).is_none());
    }

    #[test]
    fn sale_keeps_only_mapped_line_items() {
        let products = id_map(&[("prod-src-1", "prod-dst-1"), ("prod-src-2", "prod-dst-2")]);
        let customers = IdMap::new();
        let registers = id_map(&[("reg-src-1", "reg-dst-1")]);
        let users = id_map(&[("user-src-1", "user-dst-1")]);
        let taxes = IdMap::new();
        let payment_types = IdMap::new();
        let maps = sale_maps(&products, &customers, &registers, &users, &taxes, &payment_types);

        let sale = json!({
            "register_id": "reg-src-1",
            "user_id": "user-src-1",
            "register_sale_products": [
                { "product_id": "prod-src-1", "quantity": 2, "price": 10.0 },
                { "product_id": "unmapped-product", "quantity": 1 },
                { "product_id": "prod-src-2", "quantity": 1, "price": 5.0 },
            ],
        });

        let payload = transform_sale(&sale, &maps).unwrap();
        assert_eq!(payload.register_sale_products.len(), 2);
        assert_eq!(payload.register_sale_products[0].product_id, "prod-dst-1");
        assert_eq!(payload.register_sale_products[1].product_id, "prod-dst-2");
        assert_eq!(payload.status, "CLOSED");
    }

    #[test]
    fn sale_with_zero_surviving_items_is_rejected() {
        let products = IdMap::new();
        let customers = id_map(&[("cust-src", "cust-dst")]);
        let registers = id_map(&[("reg-src-1", "reg-dst-1")]);
        let users = id_map(&[("user-src-1", "user-dst-1")]);
        let taxes = IdMap::new();
        let payment_types = IdMap::new();
        let maps = sale_maps(&products, &customers, &registers, &users, &taxes, &payment_types);

        let sale = json!({
            "register_id": "reg-src-1",
            "user_id": "user-src-1",
            "customer_id": "cust-src",
            "register_sale_products": [{ "product_id": "never-cloned" }],
        });
        assert!(transform_sale(&sale, &maps).is_none());
    }

    #[test]
    fn sale_tax_substituted_when_mapped_else_omitted_from_item() {
        let products = id_map(&[("prod-src-1", "prod-dst-1"), ("prod-src-2", "prod-dst-2")]);
        let customers = IdMap::new();
        let registers = id_map(&[("reg-src-1", "reg-dst-1")]);
        let users = id_map(&[("user-src-1", "user-dst-1")]);
        let taxes = id_map(&[("tax-src", "tax-dst")]);
        let payment_types = IdMap::new();
        let maps = sale_maps(&products, &customers, &registers, &users, &taxes, &payment_types);

        let sale = json!({
            "register_id": "reg-src-1",
            "user_id": "user-src-1",
            "register_sale_products": [
                { "product_id": "prod-src-1", "tax_id": "tax-src" },
                { "product_id": "prod-src-2", "tax_id": "tax-unknown" },
            ],
        });

        let payload = transform_sale(&sale, &maps).unwrap();
        assert_eq!(
            payload.register_sale_products[0].tax_id.as_deref(),
            Some("tax-dst")
        );
        assert!(payload.register_sale_products[1].tax_id.is_none());
        // The item with the unmapped tax is kept.
        assert_eq!(payload.register_sale_products.len(), 2);
    }

    #[test]
    fn sale_unmapped_payments_dropped_without_rejecting() {
        let products = id_map(&[("prod-src-1", "prod-dst-1")]);
        let customers = IdMap::new();
        let registers = id_map(&[("reg-src-1", "reg-dst-1")]);
        let users = id_map(&[("user-src-1", "user-dst-1")]);
        let taxes = IdMap::new();
        let payment_types = id_map(&[("pay-src", "pay-dst")]);
        let maps = sale_maps(&products, &customers, &registers, &users, &taxes, &payment_types);

        let sale = json!({
            "register_id": "reg-src-1",
            "user_id": "user-src-1",
            "register_sale_products": [{ "product_id": "prod-src-1" }],
            "register_sale_payments": [
                { "payment_type_id": "pay-src", "amount": 20.0 },
                { "payment_type_id": "pay-unknown", "amount": 5.0 },
            ],
        });

        let payload = transform_sale(&sale, &maps).unwrap();
        let payments = payload.register_sale_payments.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].payment_type_id, "pay-dst");
        assert_eq!(payments[0].amount, 20.0);
    }

    #[test]
    fn sale_with_no_resolvable_payments_keeps_payload_without_payments() {
        let products = id_map(&[("prod-src-1", "prod-dst-1")]);
        let customers = IdMap::new();
        let registers = id_map(&[("reg-src-1", "reg-dst-1")]);
        let users = id_map(&[("user-src-1", "user-dst-1")]);
        let taxes = IdMap::new();
        let payment_types = IdMap::new();
        let maps = sale_maps(&products, &customers, &registers, &users, &taxes, &payment_types);

        let sale = json!({
            "register_id": "reg-src-1",
            "user_id": "user-src-1",
            "register_sale_products": [{ "product_id": "prod-src-1" }],
            "register_sale_payments": [{ "payment_type_id": "pay-unknown" }],
        });

        let payload = transform_sale(&sale, &maps).unwrap();
        assert!(payload.register_sale_payments.is_none());
        let wire = serde_json::to_value(&payload).unwrap();
        assert!(wire.get("register_sale_payments").is_none());
    }

    #[test]
    fn sale_customer_optional_and_unmapped_customer_omitted() {
        let products = id_map(&[("prod-src-1", "prod-dst-1")]);
        let customers = id_map(&[("cust-src", "cust-dst")]);
        let registers = id_map(&[("reg-src-1", "reg-dst-1")]);
        let users = id_map(&[("user-src-1", "user-dst-1")]);
        let taxes = IdMap::new();
        let payment_types = IdMap::new();
        let maps = sale_maps(&products, &customers, &registers, &users, &taxes, &payment_types);

        let mapped = json!({
            "register_id": "reg-src-1",
            "user_id": "user-src-1",
            "customer_id": "cust-src",
            "register_sale_products": [{ "product_id": "prod-src-1" }],
        });
        let payload = transform_sale(&mapped, &maps).unwrap();
        assert_eq!(payload.customer_id.as_deref(), Some("cust-dst"));

        let unmapped = json!({
            "register_id": "reg-src-1",
            "user_id": "user-src-1",
            "customer_id": "walk-in-stranger",
            "register_sale_products": [{ "product_id": "prod-src-1" }],
        });
        let payload = transform_sale(&unmapped, &maps).unwrap();
        assert!(payload.customer_id.is_none());
    }

    #[test]
    fn sale_copies_descriptive_fields_when_present() {
        let products = id_map(&[("prod-src-1", "prod-dst-1")]);
        let customers = IdMap::new();
        let registers = id_map(&[("reg-src-1", "reg-dst-1")]);
        let users = id_map(&[("user-src-1", "user-dst-1")]);
        let taxes = IdMap::new();
        let payment_types = IdMap::new();
        let maps = sale_maps(&products, &customers, &registers, &users, &taxes, &payment_types);

        let sale = json!({
            "register_id": "reg-src-1",
            "user_id": "user-src-1",
            "sale_date": "2024-03-01T12:30:00Z",
            "note": "gift wrap",
            "short_code": "a1b2c3",
            "total_price": 42.0,
            "total_tax": 4.2,
            "register_sale_products": [
                { "product_id": "prod-src-1", "quantity": 3, "price": 14.0 },
            ],
        });

        let payload = transform_sale(&sale, &maps).unwrap();
        assert_eq!(payload.sale_date.as_deref(), Some("2024-03-01T12:30:00Z"));
        assert_eq!(payload.note.as_deref(), Some("gift wrap"));
        assert_eq!(payload.short_code.as_deref(), Some("a1b2c3"));
        assert_eq!(payload.total_price, Some(42.0));
        assert_eq!(payload.total_tax, Some(4.2));
        assert_eq!(payload.register_sale_products[0].quantity, 3.0);
        assert_eq!(payload.register_sale_products[0].price, 14.0);
        // Unstated line-item fields fall back to their defaults.
        assert_eq!(payload.register_sale_products[0].discount, 0.0);
        assert_eq!(payload.register_sale_products[0].loyalty_value, 0.0);
    }

    #[test]
    fn sale_wire_shape_uses_api_field_names() {
        let products = id_map(&[("prod-src-1", "prod-dst-1")]);
        let customers = IdMap::new();
        let registers = id_map(&[("reg-src-1", "reg-dst-1")]);
        let users = id_map(&[("user-src-1", "user-dst-1")]);
        let taxes = IdMap::new();
        let payment_types = IdMap::new();
        let maps = sale_maps(&products, &customers, &registers, &users, &taxes, &payment_types);

        let sale = json!({
            "register_id": "reg-src-1",
            "user_id": "user-src-1",
            "register_sale_products": [{ "product_id": "prod-src-1" }],
        });

        let wire = serde_json::to_value(transform_sale(&sale, &maps).unwrap()).unwrap();
        assert_eq!(wire["register_id"], "reg-dst-1");
        assert_eq!(wire["user_id"], "user-dst-1");
        assert_eq!(wire["status"], "CLOSED");
        assert!(wire["register_sale_products"].is_array());
        // Absent optionals must not serialize as null.
        assert!(wire.get("customer_id").is_none());
        assert!(wire.get("note").is_none());
    }

    // -- transform_inventory --------------------------------------------------

    #[test]
    fn inventory_maps_outlets_and_defaults_quantity() {
        let outlets = id_map(&[("out-src-1", "out-dst-1")]);
        let records = vec![
            json!({ "outlet_id": "out-src-1", "current_amount": 12.0 }),
            json!({ "outlet_id": "out-unmapped", "current_amount": 7.0 }),
            json!({ "outlet_id": "out-src-1" }),
        ];

        let levels = transform_inventory(&records, &outlets);
        assert_eq!(
            levels,
            vec![
                InventoryLevel {
                    outlet_id: "out-dst-1".to_string(),
                    current_amount: 12.0,
                },
                InventoryLevel {
                    outlet_id: "out-dst-1".to_string(),
                    current_amount: 0.0,
                },
            ]
        );
    }

    #[test]
    fn inventory_empty_inputs() {
        let outlets = id_map(&[("out-src-1", "out-dst-1")]);
        assert!(transform_inventory(&[], &outlets).is_empty());

        let records = vec![json!({ "outlet_id": "out-src-1" })];
        assert!(transform_inventory(&records, &IdMap::new()).is_empty());
    }
}
