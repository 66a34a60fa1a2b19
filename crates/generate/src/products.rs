//! Synthetic product payloads per retail vertical.

use std::collections::HashSet;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::{json, Value};

use posdemo_core::PricingMode;

use crate::vertical::Vertical;

/// Attempts at a fresh name before falling back to a numeric suffix.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Generates unique products for one vertical. Uniqueness state (SKUs
/// and names handed out so far) lives on the generator, not in any
/// shared cache.
pub struct ProductGenerator {
    vertical: &'static Vertical,
    mode: PricingMode,
    used_skus: HashSet<String>,
    used_names: HashSet<String>,
}

impl ProductGenerator {
    pub fn new(vertical: &'static Vertical, mode: PricingMode) -> Self {
        Self {
            vertical,
            mode,
            used_skus: HashSet::new(),
            used_names: HashSet::new(),
        }
    }

    /// Produce one create-ready product payload.
    pub fn generate(&mut self, rng: &mut impl Rng) -> Value {
        let (min, max) = self.vertical.price_range;
        let retail = price_with_retail_ending(rng, min, max);
        let (margin_min, margin_max) = self.vertical.supply_margin;
        let supply = round2(retail * rng.random_range(margin_min..margin_max));

        json!({
            "name": self.next_name(rng),
            "sku": self.next_sku(rng),
            (self.mode.price_field()): retail,
            "supply_price": supply,
            "is_active": true,
        })
    }

    /// Produce `count` payloads.
    pub fn generate_many(&mut self, rng: &mut impl Rng, count: usize) -> Vec<Value> {
        (0..count).map(|_| self.generate(rng)).collect()
    }

    fn next_sku(&mut self, rng: &mut impl Rng) -> String {
        loop {
            let sku = format!("{}-{}", self.vertical.prefix, rng.random_range(10000..=99999));
            if self.used_skus.insert(sku.clone()) {
                return sku;
            }
        }
    }

    fn next_name(&mut self, rng: &mut impl Rng) -> String {
        let mut name = self.compose_name(rng);
        for _ in 0..MAX_NAME_ATTEMPTS {
            if self.used_names.insert(name.clone()) {
                return name;
            }
            name = self.compose_name(rng);
        }
        // Word pools exhausted; disambiguate with a numeric suffix.
        let name = format!("{name} #{}", rng.random_range(1000..=9999));
        self.used_names.insert(name.clone());
        name
    }

    fn compose_name(&self, rng: &mut impl Rng) -> String {
        let product = self.vertical.products.choose(rng).copied().unwrap_or("Item");
        let adjective = self.vertical.adjectives.choose(rng).copied().unwrap_or("");

        if let Some(brand) = self.vertical.brands.choose(rng) {
            format!("{brand} {adjective} {product}")
        } else if let Some(material) = self.vertical.materials.choose(rng) {
            if rng.random_bool(0.5) {
                format!("{adjective} {material} {product}")
            } else {
                format!("{material} {product}")
            }
        } else {
            format!("{adjective} {product}")
        }
    }
}

/// A price in `[min, max)` with a retail `.95` or `.99` ending.
fn price_with_retail_ending(rng: &mut impl Rng, min: f64, max: f64) -> f64 {
    let whole = rng.random_range(min..max).trunc();
    let ending = if rng.random_bool(0.5) { 0.95 } else { 0.99 };
    round2(whole + ending)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
