//! `posdemo-generate` -- synthetic demo-data generators.
//!
//! Produces realistic-looking but entirely fictional retail data:
//! products for one of five verticals, customers with reserved-domain
//! contact details, and closed sales against records that already
//! exist on the target account.

pub mod customers;
pub mod products;
pub mod sales;
pub mod vertical;

pub use customers::{generate_customer, generate_customers};
pub use products::ProductGenerator;
pub use sales::{generate_sale, generate_sales, SaleContext, SellableProduct};
pub use vertical::{vertical_by_prefix, Vertical, VERTICALS};
