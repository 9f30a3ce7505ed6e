//! The unbounded string copy.

/// Copies the NUL-terminated byte sequence at `src` into `dest`, terminator
/// included.
///
/// The destination's capacity is never consulted. When the source is at
/// least as long as the destination, the copy keeps writing past the end and
/// corrupts whatever lies there.
///
/// # Safety
///
/// `src` must point to a readable NUL-terminated sequence. `dest` must be
/// valid for writes of the full source length plus one; nothing here checks
/// that it is.
pub unsafe fn unsafe_string_copy(dest: *mut u8, src: *const u8) {
    let mut i = 0usize;
    // SAFETY: caller guarantees src is NUL-terminated and readable. The
    // destination bound is deliberately not checked.
    unsafe {
        while *src.add(i) != 0 {
            *dest.add(i) = *src.add(i);
            i += 1;
        }
        *dest.add(i) = 0;
    }
}
