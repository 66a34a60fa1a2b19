//! The per-account HTTP client.
//!
//! One [`AccountClient`] per (domain, token) pair. All requests funnel
//! through [`AccountClient::request_with_retry`], which pattern-matches
//! the [`ApiOutcome`] of each exchange: client errors surface
//! immediately, rate limits wait out the server-suggested delay, and
//! server/network errors retry with exponential backoff.

use std::time::Duration;

use chrono::Utc;
use reqwest::Method;
use serde_json::Value;

use posdemo_core::{EntityKind, InventoryLevel, PricingMode};

use crate::outcome::{read_outcome, ApiOutcome};

/// Retries after a server or network error (1s, 2s, 4s).
const MAX_RETRIES: u32 = 3;

/// Wait applied when rate-limited without a `Retry-After` header.
const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// Request timeout for every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Page size for cursor-paginated listings.
const PAGE_SIZE: u32 = 200;

/// A failed exchange with the remote store, carrying everything the
/// operation logger wants: status code (absent for network-level
/// failures), message, and the raw response body when one was readable.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    pub status: Option<u16>,
    pub message: String,
    pub body: Option<Value>,
}

impl RemoteError {
    fn network(message: String) -> Self {
        Self {
            status: None,
            message,
            body: None,
        }
    }
}

/// Account-level settings read from `GET /retailer`.
#[derive(Debug, Clone)]
pub struct RetailerInfo {
    pub name: String,
    /// True when the account displays prices excluding tax.
    pub tax_exclusive: bool,
}

impl RetailerInfo {
    pub fn pricing_mode(&self) -> PricingMode {
        PricingMode::from_tax_exclusive(self.tax_exclusive)
    }
}

/// HTTP client for one tenant account.
pub struct AccountClient {
    http: reqwest::Client,
    domain: String,
    token: String,
    base_url: String,
}

impl AccountClient {
    /// Create a client for `{domain}.retail.lightspeed.app` using a
    /// personal access token.
    pub fn new(domain: impl Into<String>, token: impl Into<String>) -> Self {
        let domain = domain.into();
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        let base_url = format!("https://{domain}.retail.lightspeed.app/api/2.0");
        Self {
            http,
            domain,
            token: token.into(),
            base_url,
        }
    }

    /// The account's domain prefix.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Fetch the retailer record: account name and tax setting. Also
    /// serves as the credential check before a run.
    pub async fn retailer(&self) -> Result<RetailerInfo, RemoteError> {
        let (_, body) = self
            .request_with_retry(Method::GET, format!("{}/retailer", self.base_url), None)
            .await?;
        let data = body.get("data").unwrap_or(&body);
        Ok(RetailerInfo {
            name: data
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
            tax_exclusive: data
                .get("tax_exclusive")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }

    /// List every record of a kind, following the `after` version
    /// cursor until a page comes back empty.
    pub async fn list(&self, kind: EntityKind) -> Result<Vec<Value>, RemoteError> {
        let path = format!("{}/{}", self.base_url, kind.as_str());
        let mut records: Vec<Value> = Vec::new();
        let mut after: Option<i64> = None;

        loop {
            let url = match after {
                Some(cursor) => format!("{path}?after={cursor}&page_size={PAGE_SIZE}"),
                None => format!("{path}?page_size={PAGE_SIZE}"),
            };
            let (_, body) = self.request_with_retry(Method::GET, url, None).await?;

            // Older endpoints return a bare array instead of a data page.
            let page = match body.get("data") {
                Some(Value::Array(items)) => items.clone(),
                None if body.is_array() => body.as_array().cloned().unwrap_or_default(),
                _ => Vec::new(),
            };
            if page.is_empty() {
                break;
            }
            records.extend(page);

            let max = body
                .get("version")
                .and_then(|v| v.get("max"))
                .and_then(Value::as_i64);
            match max {
                // A stuck cursor would loop forever.
                Some(cursor) if Some(cursor) != after => after = Some(cursor),
                _ => break,
            }
        }

        tracing::debug!(kind = %kind, count = records.len(), domain = %self.domain, "Listed records");
        Ok(records)
    }

    /// Fetch per-outlet stock levels for one product.
    pub async fn product_inventory(&self, product_id: &str) -> Result<Vec<Value>, RemoteError> {
        let url = format!("{}/products/{product_id}/inventory", self.base_url);
        let (_, body) = self.request_with_retry(Method::GET, url, None).await?;
        Ok(body
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// Create a record, returning the created IDs and the HTTP status.
    ///
    /// Product creation returns a list of IDs (one per variant); other
    /// kinds return a single object. Sales go to the legacy 0.9
    /// endpoint, which nests the result under `register_sale`.
    pub async fn create(
        &self,
        kind: EntityKind,
        payload: &Value,
    ) -> Result<(Vec<String>, u16), RemoteError> {
        let url = match kind {
            EntityKind::Sales => {
                format!("https://{}.retail.lightspeed.app/api/register_sales", self.domain)
            }
            _ => format!("{}/{}", self.base_url, kind.as_str()),
        };
        let (status, body) = self
            .request_with_retry(Method::POST, url, Some(payload))
            .await?;

        let ids = extract_created_ids(kind, &body);
        if ids.is_empty() {
            return Err(RemoteError {
                status: Some(status),
                message: "Response did not contain a created id".to_string(),
                body: Some(body),
            });
        }
        Ok((ids, status))
    }

    /// Set per-outlet stock levels via the 2.1 product endpoint.
    /// `track_inventory` must be enabled in the same call because the
    /// 2.0 create endpoint ignores that field.
    pub async fn update_inventory(
        &self,
        product_id: &str,
        levels: &[InventoryLevel],
    ) -> Result<(), RemoteError> {
        let url = format!(
            "https://{}.retail.lightspeed.app/api/2.1/products/{product_id}",
            self.domain
        );
        let payload = serde_json::json!({
            "common": { "track_inventory": true },
            "details": { "inventory": levels },
        });
        self.request_with_retry(Method::PUT, url, Some(&payload))
            .await?;
        Ok(())
    }

    /// Issue a request, retrying transient failures.
    ///
    /// - Success returns `(status, body)`.
    /// - Rate limits sleep until `Retry-After` (or a fixed 60s) and try
    ///   again.
    /// - Server and network errors back off exponentially.
    /// - Client errors return immediately; retrying bad input is futile.
    async fn request_with_retry(
        &self,
        method: Method,
        url: String,
        body: Option<&Value>,
    ) -> Result<(u16, Value), RemoteError> {
        let mut attempt: u32 = 0;

        loop {
            let mut request = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(&self.token);
            if let Some(json) = body {
                request = request.json(json);
            }

            match read_outcome(request.send().await).await {
                ApiOutcome::Success { status, body } => return Ok((status, body)),
                ApiOutcome::ClientError {
                    status,
                    message,
                    body,
                } => {
                    return Err(RemoteError {
                        status: Some(status),
                        message,
                        body,
                    });
                }
                ApiOutcome::RateLimited { retry_after } => {
                    if attempt >= MAX_RETRIES {
                        return Err(RemoteError::network("Rate limit retries exhausted".into()));
                    }
                    let wait = retry_after
                        .and_then(|at| (at - Utc::now()).to_std().ok())
                        .unwrap_or(DEFAULT_RATE_LIMIT_WAIT);
                    tracing::warn!(wait_secs = wait.as_secs(), url = %url, "Rate limited, waiting");
                    tokio::time::sleep(wait).await;
                }
                ApiOutcome::ServerError { status, message } => {
                    if attempt >= MAX_RETRIES {
                        return Err(RemoteError {
                            status: Some(status),
                            message,
                            body: None,
                        });
                    }
                    let backoff = Duration::from_secs(1 << attempt);
                    tracing::warn!(status, backoff_secs = backoff.as_secs(), url = %url, "Server error, retrying");
                    tokio::time::sleep(backoff).await;
                }
                ApiOutcome::NetworkError(message) => {
                    if attempt >= MAX_RETRIES {
                        return Err(RemoteError::network(message));
                    }
                    let backoff = Duration::from_secs(1 << attempt);
                    tracing::warn!(error = %message, backoff_secs = backoff.as_secs(), "Network error, retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
            attempt += 1;
        }
    }
}

/// Pull the created ID(s) out of a successful create response.
fn extract_created_ids(kind: EntityKind, body: &Value) -> Vec<String> {
    match kind {
        EntityKind::Sales => body
            .get("register_sale")
            .or(Some(body))
            .and_then(|sale| sale.get("id"))
            .and_then(Value::as_str)
            .map(|id| vec![id.to_string()])
            .unwrap_or_default(),
        _ => match body.get("data") {
            // Product creation: array of variant IDs.
            Some(Value::Array(ids)) => ids
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(data) => data
                .get("id")
                .and_then(Value::as_str)
                .map(|id| vec![id.to_string()])
                .unwrap_or_default(),
            None => body
                .get("id")
                .and_then(Value::as_str)
                .map(|id| vec![id.to_string()])
                .unwrap_or_default(),
        },
    }
}
