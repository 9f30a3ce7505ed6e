//! The allocation ledger: grant/release with full event accounting.
//!
//! `grant` and `release` mirror the `malloc`/`free` calling shapes. Neither
//! guards a misuse: a double release is classified and counted, then ignored;
//! a pointer the ledger has never seen is classified as foreign; a buffer
//! that is never released simply stays live. Underlying memory is reclaimed
//! only when the ledger itself is dropped, so release ordering mistakes stay
//! observable instead of becoming undefined behavior.

use parking_lot::Mutex;
use std::collections::HashMap;

use crate::stamp::{
    CANARY_SIZE, REDZONE_BYTE, REDZONE_SIZE, RELEASE_POISON, STAMP_SIZE, SlotStamp,
};

/// Alignment of every raw allocation (covers the 16-byte stamp header).
const SLOT_ALIGN: usize = 16;

/// Classification of a single release call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// First release of a live slot.
    Released,
    /// Release of a slot that was already released.
    DoubleRelease,
    /// Pointer the ledger never granted (includes null).
    Foreign,
}

/// Lifecycle state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotState {
    Live,
    Released,
}

/// Metadata for one granted allocation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LedgerSlot {
    /// Base of the raw allocation (stamp header included).
    pub(crate) raw_base: usize,
    /// User-visible base (past the stamp header).
    pub(crate) user_base: usize,
    /// User-requested size.
    pub(crate) user_size: usize,
    /// Grant sequence number, starting at 1.
    pub(crate) seq: u32,
    /// Current lifecycle state.
    pub(crate) state: SlotState,
    /// Number of release calls aimed at this slot.
    pub(crate) release_calls: u32,
}

/// One recorded grant or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEvent {
    /// Sequence number of the slot involved, if the pointer resolved to one.
    pub slot: Option<u32>,
    /// What happened.
    pub kind: EventKind,
}

/// Event payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A buffer was granted.
    Grant {
        /// User-requested size.
        size: usize,
    },
    /// A release call was made.
    Release {
        /// How the call was classified.
        outcome: ReleaseOutcome,
    },
}

pub(crate) struct LedgerInner {
    pub(crate) slots: Vec<LedgerSlot>,
    /// Map from user base address to slot index.
    pub(crate) addr_to_slot: HashMap<usize, usize>,
    pub(crate) events: Vec<LedgerEvent>,
    pub(crate) next_seq: u32,
}

/// Accounting ledger over a set of raw allocations.
///
/// Thread-safe via a single `parking_lot::Mutex`; the flows this crate
/// serves are single-threaded, so sharding would buy nothing.
pub struct AllocationLedger {
    pub(crate) inner: Mutex<LedgerInner>,
}

impl AllocationLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LedgerInner {
                slots: Vec::new(),
                addr_to_slot: HashMap::new(),
                events: Vec::new(),
                next_seq: 1,
            }),
        }
    }

    /// Grant a buffer of `size` bytes.
    ///
    /// Returns the user-visible pointer. The user region is uninitialized,
    /// matching `malloc` semantics. Returns null only if the system allocator
    /// fails; the ledger itself never refuses a grant.
    pub fn grant(&self, size: usize) -> *mut u8 {
        let total = STAMP_SIZE + size + CANARY_SIZE + REDZONE_SIZE;
        let Ok(layout) = std::alloc::Layout::from_size_align(total, SLOT_ALIGN) else {
            return std::ptr::null_mut();
        };

        // SAFETY: layout has nonzero size (header + canary + redzone).
        let raw_ptr = unsafe { std::alloc::alloc(layout) };
        if raw_ptr.is_null() {
            return std::ptr::null_mut();
        }

        let raw_base = raw_ptr as usize;
        let user_base = raw_base + STAMP_SIZE;

        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq = inner.next_seq.wrapping_add(1);

        let stamp = SlotStamp::compute(user_base, size as u32, seq);

        // SAFETY: the raw allocation is valid for `total` bytes; header,
        // canary, and redzone all sit inside it.
        unsafe {
            let header = stamp.to_bytes();
            std::ptr::copy_nonoverlapping(header.as_ptr(), raw_ptr, STAMP_SIZE);

            let canary = stamp.canary().to_bytes();
            let canary_ptr = (user_base as *mut u8).add(size);
            std::ptr::copy_nonoverlapping(canary.as_ptr(), canary_ptr, CANARY_SIZE);

            let redzone_ptr = canary_ptr.add(CANARY_SIZE);
            std::ptr::write_bytes(redzone_ptr, REDZONE_BYTE, REDZONE_SIZE);
        }

        let idx = inner.slots.len();
        inner.slots.push(LedgerSlot {
            raw_base,
            user_base,
            user_size: size,
            seq,
            state: SlotState::Live,
            release_calls: 0,
        });
        inner.addr_to_slot.insert(user_base, idx);
        inner.events.push(LedgerEvent {
            slot: Some(seq),
            kind: EventKind::Grant { size },
        });

        user_base as *mut u8
    }

    /// Release a previously granted buffer.
    ///
    /// Never returns memory to the system and never refuses the call. The
    /// first release poison-fills the user region and marks the slot
    /// released; any further release of the same pointer is classified as
    /// [`ReleaseOutcome::DoubleRelease`], counted, and otherwise ignored.
    pub fn release(&self, ptr: *mut u8) -> ReleaseOutcome {
        let user_base = ptr as usize;
        let mut inner = self.inner.lock();

        let Some(&idx) = inner.addr_to_slot.get(&user_base) else {
            inner.events.push(LedgerEvent {
                slot: None,
                kind: EventKind::Release {
                    outcome: ReleaseOutcome::Foreign,
                },
            });
            return ReleaseOutcome::Foreign;
        };

        let slot = &mut inner.slots[idx];
        slot.release_calls += 1;
        let seq = slot.seq;

        let outcome = match slot.state {
            SlotState::Released => ReleaseOutcome::DoubleRelease,
            SlotState::Live => {
                slot.state = SlotState::Released;
                // SAFETY: the slot's user region stays allocated until the
                // ledger is dropped.
                unsafe {
                    std::ptr::write_bytes(slot.user_base as *mut u8, RELEASE_POISON, slot.user_size);
                }
                ReleaseOutcome::Released
            }
        };

        inner.events.push(LedgerEvent {
            slot: Some(seq),
            kind: EventKind::Release { outcome },
        });
        outcome
    }

    /// All recorded events in order.
    #[must_use]
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.inner.lock().events.clone()
    }

    /// Number of grants made so far.
    #[must_use]
    pub fn grant_count(&self) -> usize {
        self.inner.lock().slots.len()
    }

    /// Read up to `len` leading bytes of the slot granted as `seq`.
    ///
    /// Returns `None` for an unknown sequence number. The read is clamped to
    /// the slot's user size, so this is safe to expose to callers that are
    /// themselves forbidden from unsafe code.
    #[must_use]
    pub fn leading_bytes(&self, seq: u32, len: usize) -> Option<Vec<u8>> {
        let inner = self.inner.lock();
        let slot = inner.slots.iter().find(|s| s.seq == seq)?;
        let count = len.min(slot.user_size);
        let mut out = vec![0u8; count];
        // SAFETY: the slot's user region stays allocated until the ledger is
        // dropped, and `count` never exceeds its size.
        unsafe {
            std::ptr::copy_nonoverlapping(slot.user_base as *const u8, out.as_mut_ptr(), count);
        }
        Some(out)
    }
}

impl Default for AllocationLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AllocationLedger {
    fn drop(&mut self) {
        let inner = self.inner.get_mut();
        for slot in &inner.slots {
            let total = STAMP_SIZE + slot.user_size + CANARY_SIZE + REDZONE_SIZE;
            let Ok(layout) = std::alloc::Layout::from_size_align(total, SLOT_ALIGN) else {
                continue;
            };
            // SAFETY: each slot's raw allocation was produced by `grant` with
            // exactly this layout and has not been deallocated elsewhere.
            unsafe {
                std::alloc::dealloc(slot.raw_base as *mut u8, layout);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stamp::RELEASE_POISON;

    #[test]
    fn grant_returns_distinct_live_buffers() {
        let ledger = AllocationLedger::new();
        let a = ledger.grant(32);
        let b = ledger.grant(32);
        assert!(!a.is_null());
        assert!(!b.is_null());
        assert_ne!(a, b);
        assert_eq!(ledger.grant_count(), 2);
    }

    #[test]
    fn first_release_is_classified_released() {
        let ledger = AllocationLedger::new();
        let ptr = ledger.grant(16);
        assert_eq!(ledger.release(ptr), ReleaseOutcome::Released);
    }

    #[test]
    fn second_release_is_classified_double() {
        let ledger = AllocationLedger::new();
        let ptr = ledger.grant(16);
        ledger.release(ptr);
        assert_eq!(ledger.release(ptr), ReleaseOutcome::DoubleRelease);
        assert_eq!(ledger.release(ptr), ReleaseOutcome::DoubleRelease);
    }

    #[test]
    fn unknown_pointer_is_classified_foreign() {
        let ledger = AllocationLedger::new();
        let mut local = 0u8;
        assert_eq!(
            ledger.release(std::ptr::addr_of_mut!(local)),
            ReleaseOutcome::Foreign
        );
        assert_eq!(ledger.release(std::ptr::null_mut()), ReleaseOutcome::Foreign);
    }

    #[test]
    fn release_poisons_user_region() {
        let ledger = AllocationLedger::new();
        let ptr = ledger.grant(8);
        // SAFETY: ptr is a live 8-byte grant.
        unsafe { std::ptr::write_bytes(ptr, 0x11, 8) };
        ledger.release(ptr);
        let bytes = ledger.leading_bytes(1, 8).expect("slot 1 exists");
        assert!(bytes.iter().all(|&b| b == RELEASE_POISON));
    }

    #[test]
    fn events_record_grant_and_release_order() {
        let ledger = AllocationLedger::new();
        let ptr = ledger.grant(4);
        ledger.release(ptr);
        ledger.release(ptr);
        let events = ledger.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind, EventKind::Grant { size: 4 });
        assert_eq!(
            events[1].kind,
            EventKind::Release {
                outcome: ReleaseOutcome::Released
            }
        );
        assert_eq!(
            events[2].kind,
            EventKind::Release {
                outcome: ReleaseOutcome::DoubleRelease
            }
        );
        assert!(events.iter().all(|e| e.slot == Some(1) || e.slot.is_none()));
    }

    #[test]
    fn leading_bytes_clamps_to_user_size() {
        let ledger = AllocationLedger::new();
        let ptr = ledger.grant(4);
        // SAFETY: ptr is a live 4-byte grant.
        unsafe { std::ptr::write_bytes(ptr, 0x42, 4) };
        let bytes = ledger.leading_bytes(1, 64).expect("slot 1 exists");
        assert_eq!(bytes, vec![0x42; 4]);
    }
}
