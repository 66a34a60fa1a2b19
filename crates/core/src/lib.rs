//! `posdemo-core` -- pure types and transformation logic for the demo-data
//! and account-cloning tool.
//!
//! This crate has no I/O and no async: it holds the entity vocabulary,
//! the read-shape to write-shape field policies, the cross-account
//! identity maps, the per-entity record transformers, and the error
//! taxonomy used when reporting failed writes. The HTTP client and the
//! clone orchestrator build on top of it.

pub mod classify;
pub mod entity;
pub mod mapping;
pub mod policy;
pub mod transform;

pub use classify::{classify, ErrorKind};
pub use entity::{EntityKind, PricingMode};
pub use mapping::{map_by_name, name_index_ci, IdMap};
pub use policy::{project, FieldPolicy, CUSTOMER_FIELDS, PRODUCT_FIELDS};
pub use transform::{
    transform_customer, transform_inventory, transform_product, transform_sale, InventoryLevel,
    SaleLineItem, SaleMaps, SalePayload, SalePayment,
};
