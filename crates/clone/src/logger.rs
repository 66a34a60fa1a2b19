//! Incremental operation logger for clone runs.
//!
//! The external API is neither transactional nor idempotent: every
//! record created on the destination is permanent the moment the call
//! returns. [`CloneLogger`] therefore records every attempted write --
//! success or failure, with the exact request payload and raw response
//! body on failure -- and mirrors the whole document to disk
//! synchronously after every append. A crash mid-run loses at most the
//! in-flight entry; everything completed before it is on disk and
//! diagnosable.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use posdemo_core::{ErrorKind, IdMap};

/// Failures while persisting the log document.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Failed to write operation log: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize operation log: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Overall status of a clone run, stored in the log metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Success/failure tally for one entity type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub success: u32,
    pub failed: u32,
}

/// One attempted write, appended exactly once and never mutated.
#[derive(Debug, Clone, Serialize)]
struct OperationEntry {
    timestamp: String,
    entity_type: String,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_body: Option<Value>,
}

#[derive(Debug, Serialize)]
struct Metadata {
    source: String,
    destination: String,
    started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<String>,
    status: RunStatus,
}

#[derive(Debug, Default, Serialize)]
struct EntityResults {
    created: Vec<Value>,
    failed: Vec<Value>,
}

#[derive(Debug, Default, Clone, Copy, Serialize)]
struct InventoryCounts {
    updated: u32,
    failed: u32,
}

#[derive(Debug, Serialize)]
struct LogDocument {
    metadata: Metadata,
    summary: BTreeMap<String, EntityCounts>,
    error_types: BTreeMap<String, BTreeMap<String, u32>>,
    inventory: InventoryCounts,
    results: BTreeMap<String, EntityResults>,
    operations: Vec<OperationEntry>,
}

/// Durable, append-as-you-go log of one clone run.
pub struct CloneLogger {
    path: PathBuf,
    doc: LogDocument,
}

impl CloneLogger {
    /// Create the log file immediately, named from the two account
    /// labels and the start timestamp. The file exists from this point
    /// on, so even a run that crashes on its first write leaves a
    /// readable document behind.
    pub fn create(logs_dir: &Path, source: &str, destination: &str) -> Result<Self, LoggerError> {
        fs::create_dir_all(logs_dir)?;

        let started = Utc::now();
        let filename = format!(
            "clone-{source}-to-{destination}-{}.json",
            started.format("%Y-%m-%d-%H%M%S")
        );

        let logger = Self {
            path: logs_dir.join(filename),
            doc: LogDocument {
                metadata: Metadata {
                    source: source.to_string(),
                    destination: destination.to_string(),
                    started_at: started.to_rfc3339(),
                    completed_at: None,
                    status: RunStatus::Running,
                },
                summary: BTreeMap::new(),
                error_types: BTreeMap::new(),
                inventory: InventoryCounts::default(),
                results: BTreeMap::new(),
                operations: Vec::new(),
            },
        };
        logger.persist()?;
        Ok(logger)
    }

    /// Where the log document lives.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a successful create. `extra` fields (name, total, ...)
    /// are merged into the per-entity result entry.
    pub fn log_success(
        &mut self,
        entity_type: &str,
        source_id: Option<&str>,
        new_id: &str,
        status_code: u16,
        identifier: Option<&str>,
        extra: Option<Value>,
    ) -> Result<(), LoggerError> {
        self.doc.operations.push(OperationEntry {
            timestamp: Utc::now().to_rfc3339(),
            entity_type: entity_type.to_string(),
            outcome: "success",
            status_code: Some(status_code),
            source_id: source_id.map(str::to_string),
            new_id: Some(new_id.to_string()),
            identifier: identifier.map(str::to_string),
            error_message: None,
            error_type: None,
            request_payload: None,
            response_body: None,
        });

        let mut entry = serde_json::Map::new();
        if let Some(id) = source_id {
            entry.insert("source_id".to_string(), Value::String(id.to_string()));
        }
        entry.insert("new_id".to_string(), Value::String(new_id.to_string()));
        if let Some(ident) = identifier {
            entry.insert("identifier".to_string(), Value::String(ident.to_string()));
        }
        if let Some(Value::Object(extra_fields)) = extra {
            entry.extend(extra_fields);
        }
        self.doc
            .results
            .entry(entity_type.to_string())
            .or_default()
            .created
            .push(Value::Object(entry));

        self.doc
            .summary
            .entry(entity_type.to_string())
            .or_default()
            .success += 1;

        self.persist()
    }

    /// Record a failed create with enough context to retry or diagnose
    /// it later: the exact request payload sent and the raw response
    /// body, when either exists.
    #[allow(clippy::too_many_arguments)]
    pub fn log_failure(
        &mut self,
        entity_type: &str,
        source_id: Option<&str>,
        status_code: Option<u16>,
        error_message: &str,
        error: ErrorKind,
        request_payload: Option<Value>,
        response_body: Option<Value>,
        identifier: Option<&str>,
    ) -> Result<(), LoggerError> {
        self.doc.operations.push(OperationEntry {
            timestamp: Utc::now().to_rfc3339(),
            entity_type: entity_type.to_string(),
            outcome: "failure",
            status_code,
            source_id: source_id.map(str::to_string),
            new_id: None,
            identifier: identifier.map(str::to_string),
            error_message: Some(error_message.to_string()),
            error_type: Some(error.as_str().to_string()),
            request_payload,
            response_body,
        });

        let mut entry = serde_json::Map::new();
        if let Some(id) = source_id {
            entry.insert("source_id".to_string(), Value::String(id.to_string()));
        }
        if let Some(ident) = identifier {
            entry.insert("identifier".to_string(), Value::String(ident.to_string()));
        }
        entry.insert(
            "reason".to_string(),
            Value::String(error_message.to_string()),
        );
        entry.insert(
            "error_type".to_string(),
            Value::String(error.as_str().to_string()),
        );
        self.doc
            .results
            .entry(entity_type.to_string())
            .or_default()
            .failed
            .push(Value::Object(entry));

        self.doc
            .summary
            .entry(entity_type.to_string())
            .or_default()
            .failed += 1;

        *self
            .doc
            .error_types
            .entry(entity_type.to_string())
            .or_default()
            .entry(error.as_str().to_string())
            .or_default() += 1;

        self.persist()
    }

    /// Record the inventory update tallies (tracked per run, not as a
    /// regular entity).
    pub fn set_inventory_counts(&mut self, updated: u32, failed: u32) -> Result<(), LoggerError> {
        self.doc.inventory = InventoryCounts { updated, failed };
        self.persist()
    }

    /// Mark the run finished with the given status.
    pub fn complete(&mut self, status: RunStatus) -> Result<(), LoggerError> {
        self.doc.metadata.status = status;
        self.doc.metadata.completed_at = Some(Utc::now().to_rfc3339());
        self.persist()
    }

    // -- pure reads -----------------------------------------------------------

    /// Success/failure counts for one entity type.
    pub fn entity_counts(&self, entity_type: &str) -> EntityCounts {
        self.doc
            .summary
            .get(entity_type)
            .copied()
            .unwrap_or_default()
    }

    /// Error-kind histogram for one entity type.
    pub fn error_histogram(&self, entity_type: &str) -> Option<&BTreeMap<String, u32>> {
        self.doc.error_types.get(entity_type)
    }

    /// Build a source-id -> destination-id map from the created result
    /// entries of one entity type. This is how the sales stage learns
    /// the product and customer IDs minted by earlier stages -- the log
    /// is the single source of truth.
    pub fn created_id_map(&self, entity_type: &str) -> IdMap {
        let mut map = IdMap::new();
        if let Some(results) = self.doc.results.get(entity_type) {
            for entry in &results.created {
                if let (Some(source_id), Some(new_id)) = (
                    entry.get("source_id").and_then(Value::as_str),
                    entry.get("new_id").and_then(Value::as_str),
                ) {
                    map.insert(source_id, new_id);
                }
            }
        }
        map
    }

    /// Number of entries in the raw operation timeline.
    pub fn operation_count(&self) -> usize {
        self.doc.operations.len()
    }

    /// The current in-memory document as JSON, for comparison against
    /// what is on disk.
    pub fn document(&self) -> Result<Value, LoggerError> {
        Ok(serde_json::to_value(&self.doc)?)
    }

    /// Mirror the document to disk. Serialized to a temp file first and
    /// renamed into place, so a crash mid-write leaves the previous
    /// complete document rather than a torn one.
    fn persist(&self) -> Result<(), LoggerError> {
        let json = serde_json::to_vec_pretty(&self.doc)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
