//! Process-global ledger backing the `sample` binary.

use std::sync::OnceLock;

use defectlab_trace::AllocationLedger;

static LEDGER: OnceLock<AllocationLedger> = OnceLock::new();

/// The ledger shared by the whole process.
///
/// Never dropped, so buffers the catalog leaks stay leaked for the process
/// lifetime. Tests should construct their own [`AllocationLedger`] instead.
pub fn process_ledger() -> &'static AllocationLedger {
    LEDGER.get_or_init(AllocationLedger::new)
}
