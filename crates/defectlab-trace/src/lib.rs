//! # defectlab-trace
//!
//! Raw, unchecked allocation primitive with full accounting.
//!
//! The ledger hands out raw byte buffers the way `malloc` does and accepts
//! releases the way `free` does, but it never refuses a call and never guards
//! a misuse. Instead, every grant and release is recorded, each buffer is
//! bracketed by a stamp header, a trailing canary, and a poisoned redzone,
//! and an audit pass can later report what actually happened: buffers written
//! past their capacity, buffers never released, buffers released twice.
//!
//! Memory is returned to the system only when a ledger is dropped. A ledger
//! that lives for the whole process therefore carries genuine leaks.

pub mod audit;
pub mod ledger;
pub mod stamp;

pub use audit::{LedgerSnapshot, SlotAudit};
pub use ledger::{AllocationLedger, EventKind, LedgerEvent, ReleaseOutcome};
pub use stamp::{CANARY_SIZE, REDZONE_SIZE, STAMP_SIZE};
