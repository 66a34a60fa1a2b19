//! Synthetic sale payloads.
//!
//! Sales are generated against records that already exist on the target
//! account: the caller passes the created products and customers plus
//! the register, user, payment type, and tax to charge everything
//! against. Payloads use the sale-endpoint wire shape, which differs
//! from the listing shape (payments carry `retailer_payment_type_id`,
//! and the state field is lowercase).

use chrono::{Duration, Timelike, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::{json, Value};

/// Oldest generated sale, in days before now.
const MAX_DAYS_BACK: i64 = 90;

/// Fallback line price when a product was created without one.
const FALLBACK_PRICE: f64 = 50.0;

/// Share of sales assigned to a customer (the rest are walk-ins).
const CUSTOMER_SHARE: f64 = 0.8;

/// A product available to sell: its ID on the target account and its
/// retail price.
#[derive(Debug, Clone)]
pub struct SellableProduct {
    pub product_id: String,
    pub price: f64,
}

/// The fixed references every generated sale is charged against.
#[derive(Debug, Clone)]
pub struct SaleContext {
    pub register_id: String,
    pub user_id: String,
    pub payment_type_id: String,
    pub tax_id: String,
}

/// Produce one create-ready sale payload, or `None` when there is
/// nothing to sell.
pub fn generate_sale(
    rng: &mut impl Rng,
    products: &[SellableProduct],
    customers: &[String],
    context: &SaleContext,
) -> Option<Value> {
    if products.is_empty() {
        return None;
    }

    let item_count = rng.random_range(1..=products.len().min(3));
    let mut line_items = Vec::with_capacity(item_count);
    let mut total = 0.0;
    for product in products.choose_multiple(rng, item_count) {
        let quantity = rng.random_range(1..=3u32);
        let price = if product.price > 0.0 {
            product.price
        } else {
            FALLBACK_PRICE
        };
        total += price * f64::from(quantity);

        line_items.push(json!({
            "product_id": product.product_id,
            "quantity": quantity,
            "price": price,
            "tax": 0,
            "tax_id": context.tax_id,
        }));
    }

    let mut sale = json!({
        "register_id": context.register_id,
        "user_id": context.user_id,
        "state": "closed",
        "sale_date": generate_sale_date(rng),
        "register_sale_products": line_items,
        "register_sale_payments": [{
            "retailer_payment_type_id": context.payment_type_id,
            "amount": round2(total),
        }],
    });

    if !customers.is_empty() && rng.random_bool(CUSTOMER_SHARE) {
        if let Some(customer_id) = customers.choose(rng) {
            sale["customer_id"] = Value::String(customer_id.clone());
        }
    }
    Some(sale)
}

/// Produce up to `count` sale payloads.
pub fn generate_sales(
    rng: &mut impl Rng,
    products: &[SellableProduct],
    customers: &[String],
    context: &SaleContext,
    count: usize,
) -> Vec<Value> {
    (0..count)
        .filter_map(|_| generate_sale(rng, products, customers, context))
        .collect()
}

/// A timestamp within the past [`MAX_DAYS_BACK`] days, snapped to
/// business hours (8am to 8pm).
fn generate_sale_date(rng: &mut impl Rng) -> String {
    let day = Utc::now() - Duration::days(rng.random_range(0..=MAX_DAYS_BACK));
    let stamped = day
        .with_hour(rng.random_range(8..=20))
        .and_then(|t| t.with_minute(rng.random_range(0..60)))
        .and_then(|t| t.with_second(0))
        .unwrap_or(day);
    stamped.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
