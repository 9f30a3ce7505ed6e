//! Buffer lifecycle defects: the unchecked leaking allocator and the
//! free-one-twice release pattern.

use defectlab_trace::AllocationLedger;

/// Fixed message written into every created buffer, terminator included.
pub const BUFFER_MESSAGE: &[u8] = b"Hello\0";

/// Grants a buffer of `size` bytes, writes the fixed greeting into it, and
/// hands the only pointer to the caller.
///
/// The grant result is never null-checked; a failed grant is written to as
/// if it had succeeded. No release obligation is stated or enforced, and no
/// caller in the demonstrated flows ever releases the result.
///
/// # Safety
///
/// `size` must be at least [`BUFFER_MESSAGE`]`.len()`; nothing here checks
/// that it is, and nothing checks the grant result either.
pub unsafe fn create_buffer(ledger: &AllocationLedger, size: usize) -> *mut u8 {
    let buffer = ledger.grant(size);
    // no null check
    // SAFETY: the pointer is used as-is; the caller vouches for the size.
    unsafe {
        std::ptr::copy_nonoverlapping(BUFFER_MESSAGE.as_ptr(), buffer, BUFFER_MESSAGE.len());
    }
    buffer
    // never released
}

/// Grants three buffers and releases them badly: the first and third are
/// released, the second never is, and the third is released a second time.
pub fn memory_problem_example(ledger: &AllocationLedger) {
    let ptr1 = ledger.grant(100);
    let ptr2 = ledger.grant(200);
    let ptr3 = ledger.grant(300);

    // only ptr1 and ptr3 are released; ptr2 leaks
    let _ = ledger.release(ptr1);
    let _ = ledger.release(ptr3);

    // ptr3 released a second time
    let _ = ledger.release(ptr3);

    let _ = ptr2;
}
