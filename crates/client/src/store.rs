//! The remote record store seam.
//!
//! The clone orchestrator never talks to [`AccountClient`] directly; it
//! consumes this trait, which lets the clone crate's tests drive a full
//! run against an in-memory store.

use async_trait::async_trait;
use serde_json::Value;

use posdemo_core::{EntityKind, InventoryLevel, PricingMode};

use crate::client::{AccountClient, RemoteError};

/// A record successfully created on the destination.
#[derive(Debug, Clone)]
pub struct Created {
    /// Created IDs. Product creation can return several (one per
    /// variant); the first is the primary record.
    pub ids: Vec<String>,
    /// HTTP status of the create response.
    pub status: u16,
}

impl Created {
    pub fn primary_id(&self) -> Option<&str> {
        self.ids.first().map(String::as_str)
    }
}

/// One tenant account's records, read and written.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Human-readable account label (the domain prefix) for logs.
    fn label(&self) -> &str;

    /// Fetch all records of a kind.
    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Value>, RemoteError>;

    /// Fetch per-outlet stock levels for one product.
    async fn fetch_inventory(&self, product_id: &str) -> Result<Vec<Value>, RemoteError>;

    /// Create a record from a write-shape payload.
    async fn create(&self, kind: EntityKind, payload: &Value) -> Result<Created, RemoteError>;

    /// Replace a product's per-outlet stock levels.
    async fn update_inventory(
        &self,
        product_id: &str,
        levels: &[InventoryLevel],
    ) -> Result<(), RemoteError>;

    /// Whether this account prices include or exclude tax.
    async fn pricing_mode(&self) -> Result<PricingMode, RemoteError>;
}

#[async_trait]
impl RecordStore for AccountClient {
    fn label(&self) -> &str {
        self.domain()
    }

    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Value>, RemoteError> {
        self.list(kind).await
    }

    async fn fetch_inventory(&self, product_id: &str) -> Result<Vec<Value>, RemoteError> {
        self.product_inventory(product_id).await
    }

    async fn create(&self, kind: EntityKind, payload: &Value) -> Result<Created, RemoteError> {
        let (ids, status) = AccountClient::create(self, kind, payload).await?;
        Ok(Created { ids, status })
    }

    async fn update_inventory(
        &self,
        product_id: &str,
        levels: &[InventoryLevel],
    ) -> Result<(), RemoteError> {
        AccountClient::update_inventory(self, product_id, levels).await
    }

    async fn pricing_mode(&self) -> Result<PricingMode, RemoteError> {
        Ok(self.retailer().await?.pricing_mode())
    }
}
