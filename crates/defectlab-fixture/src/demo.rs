//! Safe entry points for each demonstrated flow.
//!
//! The `sample` binary and the audit harness both drive the catalog through
//! these wrappers, so all unsafe stays inside this crate and the harness can
//! keep `unsafe_code = "forbid"`.

use defectlab_trace::AllocationLedger;

use crate::buffers::{create_buffer, memory_problem_example};
use crate::complexity::complex_function;
use crate::copy::unsafe_string_copy;

/// Capacity of the destination buffer in the sample flow.
pub const SAMPLE_DEST_CAPACITY: usize = 10;

/// Source string the sample flow copies, NUL terminator included.
pub const SAMPLE_INPUT: &[u8] = b"This is a very long string that will overflow the buffer\0";

/// Size passed to the leaking allocator in the sample flow.
pub const SAMPLE_LEAK_SIZE: usize = 1000;

/// Inputs fed to [`complex_function`] by the sample flow.
pub const SAMPLE_BRANCH_INPUTS: (i32, i32, i32, i32) = (5, 10, 15, 20);

/// Runs the same sequence as the `sample` binary's entry point against
/// `ledger` and returns the value the binary prints.
///
/// Three defects fire along the way: the copy overruns the 10-byte
/// destination, the created buffer is discarded without a release, and no
/// failure is surfaced for either.
pub fn run_sample_flow(ledger: &AllocationLedger) -> i32 {
    let buffer = ledger.grant(SAMPLE_DEST_CAPACITY);

    // SAFETY: SAMPLE_INPUT is NUL-terminated. The destination holds 10
    // bytes; the copy does not know that and writes all 57.
    unsafe { unsafe_string_copy(buffer, SAMPLE_INPUT.as_ptr()) };

    // SAFETY: the leak size comfortably holds the greeting.
    let leaked_memory = unsafe { create_buffer(ledger, SAMPLE_LEAK_SIZE) };
    let _ = leaked_memory;

    let (a, b, c, d) = SAMPLE_BRANCH_INPUTS;
    complex_function(a, b, c, d)
}

/// Runs the release-pattern demonstrator against `ledger`.
pub fn run_release_pattern_flow(ledger: &AllocationLedger) {
    memory_problem_example(ledger);
}

/// Runs the leaking allocator once against `ledger` and reports the grant
/// sequence number of the buffer it abandoned.
pub fn run_leak_flow(ledger: &AllocationLedger, size: usize) -> u32 {
    let before = ledger.grant_count() as u32;
    // SAFETY: callers pass sizes at least as large as the greeting.
    let _ = unsafe { create_buffer(ledger, size) };
    before + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_flow_returns_branch_result() {
        let ledger = AllocationLedger::new();
        assert_eq!(run_sample_flow(&ledger), -325);
    }

    #[test]
    fn sample_flow_leaves_two_live_buffers_and_a_smashed_canary() {
        let ledger = AllocationLedger::new();
        run_sample_flow(&ledger);

        let snap = ledger.snapshot();
        assert_eq!(snap.slots.len(), 2);
        assert_eq!(snap.live_count, 2);

        let dest = &snap.slots[0];
        assert!(!dest.canary_intact);
        assert_eq!(dest.overrun_bytes, SAMPLE_INPUT.len() - SAMPLE_DEST_CAPACITY);

        let leaked = &snap.slots[1];
        assert!(leaked.live);
        assert_eq!(leaked.release_calls, 0);
        assert_eq!(leaked.user_size, SAMPLE_LEAK_SIZE);
    }

    #[test]
    fn leak_flow_reports_the_abandoned_slot() {
        let ledger = AllocationLedger::new();
        let seq = run_leak_flow(&ledger, 64);
        assert_eq!(seq, 1);
        let bytes = ledger.leading_bytes(seq, 5).expect("slot exists");
        assert_eq!(bytes, b"Hello");
    }
}
