//! `posdemo-clone` -- account-to-account cloning.
//!
//! Copies catalog data (brands, suppliers, products, inventory),
//! customers, and optionally sales from one account to another,
//! remapping every cross-account foreign key and recording each
//! operation in a durable, crash-resumable JSON log.

pub mod logger;
pub mod orchestrator;

pub use logger::{CloneLogger, EntityCounts, LoggerError, RunStatus};
pub use orchestrator::{run_clone, CloneError, CloneOptions};
