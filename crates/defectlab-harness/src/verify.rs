//! Fixed expectations for every defect class, and the comparison against
//! what the runner observed.

use serde::{Deserialize, Serialize};

use crate::runner::CatalogObservations;

/// Branch-maze result for the sample inputs (5, 10, 15, 20).
pub const EXPECTED_BRANCH_RESULT: i32 = -325;

/// Exact stdout the sample binary must produce.
pub const EXPECTED_SAMPLE_STDOUT: &str = "Result: -325\n";

/// The cataloged defect classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectClass {
    /// Copy with no destination bound check.
    UnboundedCopy,
    /// Allocation with no null check and no release.
    UncheckedAllocation,
    /// Deeply nested branch-and-loop function.
    BranchMaze,
    /// One buffer released twice, another never.
    ReleasePattern,
    /// Bounds check built from bare literals.
    LiteralBounds,
}

impl DefectClass {
    /// Stable snake_case name, matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DefectClass::UnboundedCopy => "unbounded_copy",
            DefectClass::UncheckedAllocation => "unchecked_allocation",
            DefectClass::BranchMaze => "branch_maze",
            DefectClass::ReleasePattern => "release_pattern",
            DefectClass::LiteralBounds => "literal_bounds",
        }
    }
}

/// Verdict for one defect class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassVerdict {
    /// Class under audit.
    pub class: DefectClass,
    /// Whether the observation matched the expectation.
    pub passed: bool,
    /// Human-readable expectation.
    pub expected: String,
    /// Human-readable observation.
    pub actual: String,
}

/// Compare observations against the fixed expectations, one verdict per
/// class. Observing the defect is what passes; a defect that failed to
/// reproduce fails.
#[must_use]
pub fn verify(obs: &CatalogObservations) -> Vec<ClassVerdict> {
    let expected_overrun = obs.copy.source_len.saturating_sub(obs.copy.dest_capacity);

    vec![
        ClassVerdict {
            class: DefectClass::UnboundedCopy,
            passed: !obs.copy.canary_intact && obs.copy.overrun_bytes == expected_overrun,
            expected: format!(
                "canary smashed, {} bytes written past a {}-byte destination",
                expected_overrun, obs.copy.dest_capacity
            ),
            actual: format!(
                "canary {}, {} bytes past capacity",
                if obs.copy.canary_intact {
                    "intact"
                } else {
                    "smashed"
                },
                obs.copy.overrun_bytes
            ),
        },
        ClassVerdict {
            class: DefectClass::UncheckedAllocation,
            passed: obs.leak.leading == b"Hello" && obs.leak.release_calls == 0 && obs.leak.live,
            expected: "live buffer with leading bytes \"Hello\" and zero release calls".into(),
            actual: format!(
                "leading bytes {:?}, {} release calls, {}",
                String::from_utf8_lossy(&obs.leak.leading),
                obs.leak.release_calls,
                if obs.leak.live { "live" } else { "released" }
            ),
        },
        ClassVerdict {
            class: DefectClass::BranchMaze,
            passed: obs.branch_result == EXPECTED_BRANCH_RESULT,
            expected: EXPECTED_BRANCH_RESULT.to_string(),
            actual: obs.branch_result.to_string(),
        },
        ClassVerdict {
            class: DefectClass::ReleasePattern,
            passed: obs.releases.release_calls == [1, 0, 2]
                && obs.releases.live == [false, true, false]
                && obs.releases.double_releases == 1,
            expected: "release calls (1, 0, 2) with the second buffer leaked and one double release"
                .into(),
            actual: format!(
                "release calls {:?}, live {:?}, {} double release(s)",
                obs.releases.release_calls, obs.releases.live, obs.releases.double_releases
            ),
        },
        ClassVerdict {
            class: DefectClass::LiteralBounds,
            passed: obs.bounds.typical == 480_000
                && obs.bounds.at_limit == 2_073_600
                && obs.bounds.over_width == -1
                && obs.bounds.over_height == -1,
            expected: "areas 480000 and 2073600 in range, -1 past either limit".into(),
            actual: format!(
                "typical {}, at limit {}, over width {}, over height {}",
                obs.bounds.typical, obs.bounds.at_limit, obs.bounds.over_width,
                obs.bounds.over_height
            ),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CatalogRunner;

    #[test]
    fn all_classes_pass_against_the_real_catalog() {
        let obs = CatalogRunner::new("unit").observe().expect("flows run");
        let verdicts = verify(&obs);
        assert_eq!(verdicts.len(), 5);
        for verdict in &verdicts {
            assert!(
                verdict.passed,
                "{} failed: expected {}, got {}",
                verdict.class.as_str(),
                verdict.expected,
                verdict.actual
            );
        }
    }

    #[test]
    fn a_repaired_copy_fails_the_audit() {
        let obs = CatalogRunner::new("unit").observe().expect("flows run");
        let mut repaired = obs.clone();
        repaired.copy.canary_intact = true;
        repaired.copy.overrun_bytes = 0;
        let verdict = verify(&repaired)
            .into_iter()
            .find(|v| v.class == DefectClass::UnboundedCopy)
            .expect("copy verdict present");
        assert!(!verdict.passed);
    }

    #[test]
    fn class_names_are_stable() {
        assert_eq!(DefectClass::UnboundedCopy.as_str(), "unbounded_copy");
        assert_eq!(
            serde_json::to_string(&DefectClass::ReleasePattern).expect("serializes"),
            "\"release_pattern\""
        );
    }
}
