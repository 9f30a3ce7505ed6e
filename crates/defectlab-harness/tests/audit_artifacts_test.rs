// End-to-end audit CLI run: report, structured log, and artifact index are
// written, internally consistent, and digest-verified.

use std::path::PathBuf;
use std::process::Command;

use sha2::{Digest, Sha256};

use defectlab_harness::report::DefectReport;
use defectlab_harness::structured_log::validate_log_file;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("defectlab-{}-{}", tag, std::process::id()));
    std::fs::create_dir_all(&dir).expect("scratch dir creates");
    dir
}

fn sha256_hex(path: &PathBuf) -> String {
    let bytes = std::fs::read(path).expect("artifact readable");
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    format!("{:x}", hasher.finalize())
}

#[test]
fn audit_writes_consistent_artifacts() {
    let dir = scratch_dir("audit");
    let report_path = dir.join("defect_report.v1.json");
    let log_path = dir.join("audit.jsonl");
    let index_path = dir.join("artifact_index.v1.json");

    let output = Command::new(env!("CARGO_BIN_EXE_harness"))
        .args([
            "audit",
            "--output",
            report_path.to_str().unwrap(),
            "--log",
            log_path.to_str().unwrap(),
            "--artifact-index",
            index_path.to_str().unwrap(),
            "--campaign",
            "artifact-smoke",
        ])
        .output()
        .expect("harness spawns");
    assert!(
        output.status.success(),
        "audit failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );

    // Report: schema, campaign, and a clean pass.
    let report_json = std::fs::read_to_string(&report_path).expect("report written");
    let report = DefectReport::from_json(&report_json).expect("report parses");
    assert_eq!(report.schema_version, "v1");
    assert_eq!(report.campaign, "artifact-smoke");
    assert_eq!(report.summary.total, 5);
    assert!(report.all_passed());

    // Log: one line per class plus the summary line, all schema-valid.
    let valid_lines = validate_log_file(&log_path).expect("log validates");
    assert_eq!(valid_lines, 6);

    // Artifact index: digests match the bytes on disk.
    let index_json = std::fs::read_to_string(&index_path).expect("index written");
    let index: serde_json::Value = serde_json::from_str(&index_json).expect("index parses");
    let entries = index["entries"].as_array().expect("entries array");
    assert_eq!(entries.len(), 2);
    for entry in entries {
        let path = PathBuf::from(entry["path"].as_str().expect("path string"));
        let recorded = entry["sha256"].as_str().expect("digest string");
        assert_eq!(recorded, sha256_hex(&path), "digest mismatch for {path:?}");
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn audit_without_output_prints_report_to_stdout() {
    let output = Command::new(env!("CARGO_BIN_EXE_harness"))
        .args(["audit", "--campaign", "stdout-smoke"])
        .output()
        .expect("harness spawns");
    assert!(output.status.success());

    let report =
        DefectReport::from_json(&String::from_utf8_lossy(&output.stdout)).expect("report parses");
    assert_eq!(report.campaign, "stdout-smoke");
    assert!(report.all_passed());
}
