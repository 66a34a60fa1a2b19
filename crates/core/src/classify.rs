//! Error taxonomy for failed remote writes.
//!
//! Failed create attempts are bucketed by category so the operation log
//! can build a per-entity error histogram. Classification works from the
//! HTTP status code and message text alone, in a fixed priority order.

use serde::{Deserialize, Serialize};

/// Category of a failed write, in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Authentication or authorization failure (401/403).
    Permission,
    /// Remote-side failure, potentially transient (5xx).
    Server,
    /// The record already exists on the destination.
    Duplicate,
    /// A referenced entity is missing -- either reported by the API or
    /// because a required identity mapping could not be resolved before
    /// any network call was made.
    NotFound,
    /// Generic bad-input status with no more specific signal (400/422).
    Validation,
    /// Nothing determinable, including network-level failures with no
    /// status code at all.
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permission => "permission",
            Self::Server => "server",
            Self::Duplicate => "duplicate",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a kind string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "permission" => Some(Self::Permission),
            "server" => Some(Self::Server),
            "duplicate" => Some(Self::Duplicate),
            "not_found" => Some(Self::NotFound),
            "validation" => Some(Self::Validation),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// All valid kind values.
    pub const ALL: &'static [&'static str] = &[
        "permission",
        "server",
        "duplicate",
        "not_found",
        "validation",
        "unknown",
    ];
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a failed write from its status code and error message.
///
/// Message substring checks are case-insensitive and take precedence
/// over the generic 400/422/404 status fallbacks, so a 400 whose body
/// says "already exists" classifies as [`ErrorKind::Duplicate`] rather
/// than [`ErrorKind::Validation`].
pub fn classify(status_code: Option<u16>, error_message: &str) -> ErrorKind {
    let Some(status) = status_code else {
        return ErrorKind::Unknown;
    };

    if status == 401 || status == 403 {
        return ErrorKind::Permission;
    }
    if status >= 500 {
        return ErrorKind::Server;
    }

    let msg = error_message.to_lowercase();
    if msg.contains("already exists") || msg.contains("duplicate") {
        return ErrorKind::Duplicate;
    }
    if msg.contains("not found") {
        return ErrorKind::NotFound;
    }

    if status == 400 || status == 422 {
        return ErrorKind::Validation;
    }
    if status == 404 {
        return ErrorKind::NotFound;
    }

    ErrorKind::Unknown
}
