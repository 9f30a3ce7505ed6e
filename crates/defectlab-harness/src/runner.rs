//! Flow execution engine: drives each catalog flow on a fresh ledger and
//! collects raw observations for verification.

use defectlab_fixture::demo;
use defectlab_fixture::geometry::calculate_area;
use defectlab_trace::AllocationLedger;

use crate::error::HarnessError;

/// What the audit saw after the unbounded copy ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyObservation {
    /// Declared capacity of the destination buffer.
    pub dest_capacity: usize,
    /// Length of the copied source, terminator included.
    pub source_len: usize,
    /// Whether the destination's trailing canary survived.
    pub canary_intact: bool,
    /// Bytes written past the destination's capacity.
    pub overrun_bytes: usize,
}

/// What the audit saw after the leaking allocator ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeakObservation {
    /// Leading bytes of the abandoned buffer.
    pub leading: Vec<u8>,
    /// Release calls aimed at the abandoned buffer.
    pub release_calls: u32,
    /// Whether the buffer is still live after the flow.
    pub live: bool,
}

/// What the audit saw after the release-pattern demonstrator ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseObservation {
    /// Release calls per slot, in grant order.
    pub release_calls: Vec<u32>,
    /// Live flags per slot, in grant order.
    pub live: Vec<bool>,
    /// Release calls classified as double releases.
    pub double_releases: usize,
}

/// Results of probing the literal bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsObservation {
    /// Area for a typical in-range request.
    pub typical: i32,
    /// Area exactly at both limits.
    pub at_limit: i32,
    /// Result for a width one past its limit.
    pub over_width: i32,
    /// Result for a height one past its limit.
    pub over_height: i32,
}

/// One observation per defect class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogObservations {
    /// Branch-maze result for the sample inputs.
    pub branch_result: i32,
    pub copy: CopyObservation,
    pub leak: LeakObservation,
    pub releases: ReleaseObservation,
    pub bounds: BoundsObservation,
}

/// Runs the catalog flows and gathers observations.
pub struct CatalogRunner {
    /// Name of the audit campaign, carried into the report.
    pub campaign: String,
}

impl CatalogRunner {
    /// Create a runner for a named campaign.
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    /// Execute every flow on its own fresh ledger and collect observations.
    pub fn observe(&self) -> Result<CatalogObservations, HarnessError> {
        // Sample flow: covers the branch maze, the unbounded copy, and the
        // leaking allocator in one pass, exactly as the binary runs them.
        let sample_ledger = AllocationLedger::new();
        let branch_result = demo::run_sample_flow(&sample_ledger);
        let snap = sample_ledger.snapshot();

        if snap.slots.len() != 2 {
            return Err(HarnessError::Contract(format!(
                "sample flow granted {} buffers, expected 2",
                snap.slots.len()
            )));
        }
        let dest = &snap.slots[0];

        let copy = CopyObservation {
            dest_capacity: dest.user_size,
            source_len: demo::SAMPLE_INPUT.len(),
            canary_intact: dest.canary_intact,
            overrun_bytes: dest.overrun_bytes,
        };

        // Leaking allocator probed on its own ledger as well, so the
        // observation is about exactly one abandoned buffer.
        let leak_ledger = AllocationLedger::new();
        let abandoned_seq = demo::run_leak_flow(&leak_ledger, demo::SAMPLE_LEAK_SIZE);
        let leading = leak_ledger.leading_bytes(abandoned_seq, 5).ok_or_else(|| {
            HarnessError::Contract("abandoned buffer disappeared from the ledger".into())
        })?;
        let leak_snap = leak_ledger.snapshot();
        let abandoned = leak_snap
            .slots
            .iter()
            .find(|s| s.seq == abandoned_seq)
            .ok_or_else(|| {
                HarnessError::Contract("abandoned buffer missing from the audit".into())
            })?;
        let leak = LeakObservation {
            leading,
            release_calls: abandoned.release_calls,
            live: abandoned.live,
        };

        // Release pattern on its own ledger so slot ordering is exact.
        let release_ledger = AllocationLedger::new();
        demo::run_release_pattern_flow(&release_ledger);
        let release_snap = release_ledger.snapshot();
        let releases = ReleaseObservation {
            release_calls: release_snap.slots.iter().map(|s| s.release_calls).collect(),
            live: release_snap.slots.iter().map(|s| s.live).collect(),
            double_releases: release_snap.double_release_count,
        };

        let bounds = BoundsObservation {
            typical: calculate_area(800, 600),
            at_limit: calculate_area(1920, 1080),
            over_width: calculate_area(1921, 1080),
            over_height: calculate_area(1920, 1081),
        };

        Ok(CatalogObservations {
            branch_result,
            copy,
            leak,
            releases,
            bounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_collects_one_observation_per_class() {
        let obs = CatalogRunner::new("unit").observe().expect("flows run");
        assert_eq!(obs.branch_result, -325);
        assert_eq!(obs.copy.dest_capacity, 10);
        assert_eq!(obs.copy.source_len, 57);
        assert_eq!(obs.leak.leading, b"Hello");
        assert_eq!(obs.releases.release_calls, vec![1, 0, 2]);
        assert_eq!(obs.bounds.at_limit, 2_073_600);
    }
}
