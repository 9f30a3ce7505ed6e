//! Versioned JSON defect report.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::structured_log::Outcome;
use crate::verify::{ClassVerdict, DefectClass};

/// Current report schema version.
pub const REPORT_SCHEMA_VERSION: &str = "v1";

/// One audited defect class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Class under audit.
    pub class: DefectClass,
    /// Audit outcome (`pass` means the defect reproduced).
    pub outcome: Outcome,
    /// Human-readable expectation.
    pub expected: String,
    /// Human-readable observation.
    pub actual: String,
}

/// Aggregate counts over all findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total classes audited.
    pub total: usize,
    /// Classes whose defect reproduced.
    pub passed: usize,
    /// Classes whose defect failed to reproduce.
    pub failed: usize,
}

/// The full audit report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefectReport {
    /// Schema version.
    pub schema_version: String,
    /// Audit campaign name.
    pub campaign: String,
    /// One finding per defect class.
    pub findings: Vec<Finding>,
    /// Aggregate counts.
    pub summary: ReportSummary,
}

impl DefectReport {
    /// Build a report from verdicts.
    #[must_use]
    pub fn from_verdicts(campaign: impl Into<String>, verdicts: Vec<ClassVerdict>) -> Self {
        let findings: Vec<Finding> = verdicts
            .into_iter()
            .map(|v| Finding {
                class: v.class,
                outcome: if v.passed { Outcome::Pass } else { Outcome::Fail },
                expected: v.expected,
                actual: v.actual,
            })
            .collect();
        let passed = findings
            .iter()
            .filter(|f| f.outcome == Outcome::Pass)
            .count();
        let summary = ReportSummary {
            total: findings.len(),
            passed,
            failed: findings.len() - passed,
        };
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            campaign: campaign.into(),
            findings,
            summary,
        }
    }

    /// Whether every defect reproduced.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.summary.failed == 0
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Write pretty JSON to a file.
    pub fn write_to(&self, path: &Path) -> Result<(), crate::HarnessError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Lookup a finding by class.
    #[must_use]
    pub fn finding(&self, class: DefectClass) -> Option<&Finding> {
        self.findings.iter().find(|f| f.class == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::ClassVerdict;

    fn sample_verdicts() -> Vec<ClassVerdict> {
        vec![
            ClassVerdict {
                class: DefectClass::BranchMaze,
                passed: true,
                expected: "-325".into(),
                actual: "-325".into(),
            },
            ClassVerdict {
                class: DefectClass::UnboundedCopy,
                passed: false,
                expected: "canary smashed".into(),
                actual: "canary intact".into(),
            },
        ]
    }

    #[test]
    fn summary_counts_pass_and_fail() {
        let report = DefectReport::from_verdicts("unit", sample_verdicts());
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.passed, 1);
        assert_eq!(report.summary.failed, 1);
        assert!(!report.all_passed());
    }

    #[test]
    fn json_roundtrip_preserves_findings() {
        let report = DefectReport::from_verdicts("unit", sample_verdicts());
        let json = report.to_json().expect("serializes");
        let parsed = DefectReport::from_json(&json).expect("parses");
        assert_eq!(parsed.schema_version, REPORT_SCHEMA_VERSION);
        assert_eq!(parsed.campaign, "unit");
        assert_eq!(parsed.findings.len(), 2);
        let copy = parsed.finding(DefectClass::UnboundedCopy).expect("present");
        assert_eq!(copy.outcome, Outcome::Fail);
    }
}
