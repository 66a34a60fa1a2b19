//! `posdemo-client` -- HTTP client for the retail POS REST API.
//!
//! Wraps the platform's REST endpoints (listing, creation, inventory
//! updates) using [`reqwest`], with rate-limit handling and retry with
//! exponential backoff. The [`RecordStore`] trait is the seam the clone
//! orchestrator consumes; [`AccountClient`] is the real implementation,
//! one per (domain, token) pair.

pub mod client;
pub mod outcome;
pub mod store;

pub use client::{AccountClient, RemoteError, RetailerInfo};
pub use outcome::ApiOutcome;
pub use store::{Created, RecordStore};
