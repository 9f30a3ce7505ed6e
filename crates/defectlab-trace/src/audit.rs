//! Post-hoc inspection of a ledger: overruns, leaks, release misuse.
//!
//! The audit never trusts bytes in memory for slot identity; the expected
//! stamp and canary are recomputed from ledger metadata, so a slot whose
//! header or canary was overwritten is still attributed correctly.

use crate::ledger::{AllocationLedger, EventKind, ReleaseOutcome, SlotState};
use crate::stamp::{CANARY_SIZE, REDZONE_BYTE, REDZONE_SIZE, SlotStamp};

/// Audit findings for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAudit {
    /// Grant sequence number.
    pub seq: u32,
    /// User-requested size.
    pub user_size: usize,
    /// Whether the slot was never released.
    pub live: bool,
    /// Total release calls aimed at this slot.
    pub release_calls: u32,
    /// Whether the trailing canary still matches.
    pub canary_intact: bool,
    /// How many bytes past the user region were overwritten (0 if none).
    pub overrun_bytes: usize,
}

/// Whole-ledger audit summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// Per-slot findings, in grant order.
    pub slots: Vec<SlotAudit>,
    /// Slots never released.
    pub live_count: usize,
    /// Bytes held by never-released slots.
    pub live_bytes: usize,
    /// Release calls classified as double releases.
    pub double_release_count: usize,
    /// Release calls on pointers the ledger never granted.
    pub foreign_release_count: usize,
    /// Total recorded events.
    pub event_count: usize,
}

impl AllocationLedger {
    /// Inspect every slot for overruns and lifecycle state.
    #[must_use]
    pub fn audit_slots(&self) -> Vec<SlotAudit> {
        let inner = self.inner.lock();
        inner
            .slots
            .iter()
            .map(|slot| {
                let stamp = SlotStamp::compute(slot.user_base, slot.user_size as u32, slot.seq);
                let expected_canary = stamp.canary().to_bytes();

                let mut tail = [0u8; CANARY_SIZE + REDZONE_SIZE];
                // SAFETY: the canary and redzone sit inside the slot's raw
                // allocation, which stays live until the ledger is dropped.
                unsafe {
                    let tail_ptr = (slot.user_base as *const u8).add(slot.user_size);
                    std::ptr::copy_nonoverlapping(tail_ptr, tail.as_mut_ptr(), tail.len());
                }

                let overrun_bytes = tail
                    .iter()
                    .enumerate()
                    .rev()
                    .find(|&(i, &b)| {
                        let expected = if i < CANARY_SIZE {
                            expected_canary[i]
                        } else {
                            REDZONE_BYTE
                        };
                        b != expected
                    })
                    .map_or(0, |(i, _)| i + 1);

                let canary_intact = tail[..CANARY_SIZE] == expected_canary;

                SlotAudit {
                    seq: slot.seq,
                    user_size: slot.user_size,
                    live: slot.state == SlotState::Live,
                    release_calls: slot.release_calls,
                    canary_intact,
                    overrun_bytes,
                }
            })
            .collect()
    }

    /// Build the whole-ledger audit summary.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        let slots = self.audit_slots();
        let live_count = slots.iter().filter(|s| s.live).count();
        let live_bytes = slots.iter().filter(|s| s.live).map(|s| s.user_size).sum();

        let inner = self.inner.lock();
        let mut double_release_count = 0;
        let mut foreign_release_count = 0;
        for event in &inner.events {
            if let EventKind::Release { outcome } = event.kind {
                match outcome {
                    ReleaseOutcome::DoubleRelease => double_release_count += 1,
                    ReleaseOutcome::Foreign => foreign_release_count += 1,
                    ReleaseOutcome::Released => {}
                }
            }
        }
        let event_count = inner.events.len();
        drop(inner);

        LedgerSnapshot {
            slots,
            live_count,
            live_bytes,
            double_release_count,
            foreign_release_count,
            event_count,
        }
    }
}
