//! Durability and bookkeeping tests for the clone run log.

use serde_json::{json, Value};
use tempfile::TempDir;

use posdemo_clone::{CloneLogger, EntityCounts, RunStatus};
use posdemo_core::ErrorKind;

fn new_logger(dir: &TempDir) -> CloneLogger {
    CloneLogger::create(dir.path(), "demo-src", "demo-dst").expect("logger creation")
}

#[test]
fn file_exists_immediately_and_tracks_every_write() {
    let dir = TempDir::new().unwrap();
    let mut logger = new_logger(&dir);
    assert!(logger.path().exists(), "log file is created up front");

    for i in 0..4 {
        let source_id = format!("src-{i}");
        let sku = format!("SKU-{i}");
        logger
            .log_success(
                "products",
                Some(source_id.as_str()),
                &format!("dst-{i}"),
                201,
                Some(sku.as_str()),
                Some(json!({ "name": format!("Product {i}") })),
            )
            .unwrap();
    }
    logger
        .log_failure(
            "products",
            Some("src-9"),
            Some(422),
            "SKU must be unique",
            ErrorKind::Duplicate,
            Some(json!({ "sku": "SKU-0" })),
            Some(json!({ "error": "SKU must be unique" })),
            Some("SKU-0"),
        )
        .unwrap();
    logger
        .log_failure(
            "products",
            Some("src-10"),
            Some(500),
            "Server error - please try again",
            ErrorKind::Server,
            None,
            None,
            None,
        )
        .unwrap();

    assert_eq!(
        logger.entity_counts("products"),
        EntityCounts {
            success: 4,
            failed: 2
        }
    );
    assert_eq!(logger.operation_count(), 6);

    // Every mutation was written through; disk matches memory without
    // any explicit flush.
    let on_disk: Value =
        serde_json::from_str(&std::fs::read_to_string(logger.path()).unwrap()).unwrap();
    assert_eq!(on_disk, logger.document().unwrap());
}

#[test]
fn error_histogram_partitions_failures() {
    let dir = TempDir::new().unwrap();
    let mut logger = new_logger(&dir);

    let failures = [
        (Some(422), "SKU must be unique", ErrorKind::Duplicate),
        (Some(422), "name is required", ErrorKind::Validation),
        (Some(403), "Insufficient permissions - check token scopes", ErrorKind::Permission),
        (Some(422), "Product code already exists", ErrorKind::Duplicate),
        (None, "connection reset by peer", ErrorKind::Unknown),
    ];
    for (status, message, kind) in failures {
        logger
            .log_failure("products", None, status, message, kind, None, None, None)
            .unwrap();
    }

    let histogram = logger.error_histogram("products").expect("histogram exists");
    assert_eq!(histogram.get("duplicate"), Some(&2));
    assert_eq!(histogram.get("validation"), Some(&1));
    assert_eq!(histogram.get("permission"), Some(&1));
    assert_eq!(histogram.get("unknown"), Some(&1));
    assert_eq!(histogram.values().sum::<u32>(), 5);
    assert_eq!(
        logger.entity_counts("products"),
        EntityCounts {
            success: 0,
            failed: 5
        }
    );
}

#[test]
fn created_entries_resolve_back_into_an_id_map() {
    let dir = TempDir::new().unwrap();
    let mut logger = new_logger(&dir);

    logger
        .log_success("customers", Some("c-1"), "n-1", 200, Some("a@example.com"), None)
        .unwrap();
    logger
        .log_success("customers", Some("c-2"), "n-2", 200, Some("b@example.com"), None)
        .unwrap();
    // No source id recorded: cannot participate in a mapping.
    logger
        .log_success("customers", None, "n-3", 200, None, None)
        .unwrap();

    let map = logger.created_id_map("customers");
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("c-1"), Some("n-1"));
    assert_eq!(map.get("c-2"), Some("n-2"));
    assert!(logger.created_id_map("products").is_empty());
}

#[test]
fn completion_stamps_metadata() {
    let dir = TempDir::new().unwrap();
    let mut logger = new_logger(&dir);
    logger.set_inventory_counts(7, 1).unwrap();
    logger.complete(RunStatus::Completed).unwrap();

    let on_disk: Value =
        serde_json::from_str(&std::fs::read_to_string(logger.path()).unwrap()).unwrap();
    assert_eq!(on_disk["metadata"]["status"], "completed");
    assert!(on_disk["metadata"]["completed_at"].is_string());
    assert_eq!(on_disk["inventory"]["updated"], 7);
    assert_eq!(on_disk["inventory"]["failed"], 1);

    // No temp file left behind by the atomic rename.
    assert!(!logger.path().with_extension("json.tmp").exists());
}
