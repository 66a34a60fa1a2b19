//! Explicit outcome type for API responses.
//!
//! Every response collapses into an [`ApiOutcome`] so the retry loop in
//! the client can pattern-match instead of threading exceptions through
//! control flow: success, rate-limited (with the server-suggested wait),
//! client error (never retried), server error (retried with backoff),
//! or a network-level failure with no status at all.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// The result of one HTTP exchange with the POS API.
#[derive(Debug)]
pub enum ApiOutcome {
    /// 2xx with a parsed (possibly empty) JSON body.
    Success { status: u16, body: Value },
    /// 429; `retry_after` is decoded from the `Retry-After` header when
    /// present (either delta-seconds or an HTTP-date).
    RateLimited { retry_after: Option<DateTime<Utc>> },
    /// 4xx other than 429. Not retriable.
    ClientError {
        status: u16,
        message: String,
        body: Option<Value>,
    },
    /// 5xx, potentially transient.
    ServerError { status: u16, message: String },
    /// The request itself failed (DNS, TLS, connection reset, timeout).
    NetworkError(String),
}

/// Collapse a `reqwest` send result into an [`ApiOutcome`].
pub async fn read_outcome(result: Result<reqwest::Response, reqwest::Error>) -> ApiOutcome {
    let response = match result {
        Ok(response) => response,
        Err(e) => return ApiOutcome::NetworkError(e.to_string()),
    };

    let status = response.status().as_u16();

    if status == 429 {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        return ApiOutcome::RateLimited { retry_after };
    }

    let text = response.text().await.unwrap_or_default();
    let body: Option<Value> = if text.is_empty() {
        None
    } else {
        serde_json::from_str(&text).ok()
    };

    if (200..300).contains(&status) {
        // Some endpoints (the 2.1 inventory PUT) return an empty body.
        return ApiOutcome::Success {
            status,
            body: body.unwrap_or_else(|| Value::Object(Default::default())),
        };
    }

    if status >= 500 {
        return ApiOutcome::ServerError {
            status,
            message: "Server error - please try again".to_string(),
        };
    }

    let message = match status {
        401 => "Invalid or expired token".to_string(),
        403 => "Insufficient permissions - check token scopes".to_string(),
        _ => body
            .as_ref()
            .map(extract_error_message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| text.clone()),
    };

    ApiOutcome::ClientError {
        status,
        message,
        body,
    }
}

/// Decode a `Retry-After` header value: either a number of seconds or
/// an RFC 2822 HTTP-date.
fn parse_retry_after(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(seconds) = value.trim().parse::<i64>() {
        return Some(Utc::now() + Duration::seconds(seconds));
    }
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Pull a human-readable message out of an error body.
///
/// The API reports a top-level `error` string, sometimes elaborated by
/// `details` (a list) or `fields` (a map of field-level errors, where
/// keys ending in `_id` are internal references worth hiding).
fn extract_error_message(body: &Value) -> String {
    let mut message = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let details = body.get("details").or_else(|| body.get("fields"));
    let elaboration = match details {
        Some(Value::Array(items)) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join("; "),
        Some(Value::Object(fields)) => fields
            .iter()
            .filter(|(k, _)| !k.ends_with("_id"))
            .map(|(k, v)| format!("{k}: {}", value_to_text(v)))
            .collect::<Vec<_>>()
            .join("; "),
        Some(other) if !other.is_null() => value_to_text(other),
        _ => String::new(),
    };

    if !elaboration.is_empty() {
        if message.is_empty() {
            message = elaboration;
        } else {
            message = format!("{message}: {elaboration}");
        }
    }
    message
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
