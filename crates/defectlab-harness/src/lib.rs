//! # defectlab-harness
//!
//! Audit tooling for the defect catalog: runs each demonstrated flow against
//! a fresh ledger, checks that every cataloged defect is actually observable,
//! and emits a versioned JSON report plus a structured JSONL log.
//!
//! The harness itself is ordinary production Rust — explicit errors, no
//! unsafe — in deliberate contrast to the catalog it audits. A finding of
//! "defect observed" is the passing state here; a defect that *failed to
//! reproduce* is what fails an audit.

pub mod error;
pub mod report;
pub mod runner;
pub mod sample;
pub mod structured_log;
pub mod verify;

pub use error::HarnessError;
pub use report::DefectReport;
pub use runner::{CatalogObservations, CatalogRunner};
pub use verify::{ClassVerdict, DefectClass, verify};
