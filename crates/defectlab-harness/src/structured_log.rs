//! Structured logging contract for audit workflows.
//!
//! Provides:
//! - [`LogEntry`]: canonical JSONL log record with required + optional fields.
//! - [`LogEmitter`]: writes JSONL lines to a file or stdout.
//! - [`ArtifactIndex`]: links logs to emitted artifacts with SHA-256 integrity.
//! - [`validate_log_line`]: validates a single JSONL line against the schema.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Severity level for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Audit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
    Error,
}

/// Canonical structured log entry.
///
/// Required fields: `timestamp`, `trace_id`, `level`, `event`. Optional
/// fields carry per-class audit context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    // Required
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    // Optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create an entry with the required fields, stamped now.
    #[must_use]
    pub fn new(level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: unix_timestamp(),
            trace_id: next_trace_id(),
            level,
            event: event.into(),
            case: None,
            outcome: None,
            details: None,
        }
    }

    /// Attach a case name.
    #[must_use]
    pub fn with_case(mut self, case: impl Into<String>) -> Self {
        self.case = Some(case.into());
        self
    }

    /// Attach an outcome.
    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Attach free-form details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Seconds since the Unix epoch, as a string.
fn unix_timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

/// Process-unique trace id.
fn next_trace_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("trace-{}-{}", std::process::id(), n)
}

/// Writes JSONL log lines.
pub struct LogEmitter {
    out: Box<dyn Write + Send>,
}

impl LogEmitter {
    /// Emit to a file, truncating any existing content.
    pub fn to_file(path: &Path) -> Result<Self, crate::HarnessError> {
        let file = std::fs::File::create(path)?;
        Ok(Self {
            out: Box::new(file),
        })
    }

    /// Emit to stdout.
    #[must_use]
    pub fn to_stdout() -> Self {
        Self {
            out: Box::new(std::io::stdout()),
        }
    }

    /// Write one entry as a JSONL line.
    pub fn emit(&mut self, entry: &LogEntry) -> Result<(), crate::HarnessError> {
        let line = serde_json::to_string(entry)?;
        writeln!(self.out, "{line}")?;
        Ok(())
    }
}

/// Validate a single JSONL line against the log schema.
pub fn validate_log_line(line: &str) -> Result<LogEntry, String> {
    let entry: LogEntry =
        serde_json::from_str(line).map_err(|e| format!("invalid log line: {e}"))?;
    if entry.timestamp.is_empty() {
        return Err("empty timestamp".into());
    }
    if entry.trace_id.is_empty() {
        return Err("empty trace_id".into());
    }
    if entry.event.is_empty() {
        return Err("empty event".into());
    }
    Ok(entry)
}

/// Validate an entire JSONL file; returns the number of valid lines.
pub fn validate_log_file(path: &Path) -> Result<usize, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("unreadable log: {e}"))?;
    let mut count = 0;
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        validate_log_line(line).map_err(|e| format!("line {}: {e}", idx + 1))?;
        count += 1;
    }
    Ok(count)
}

/// One artifact referenced by a log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEntry {
    /// Logical artifact name.
    pub name: String,
    /// Path the artifact was written to.
    pub path: String,
    /// Hex SHA-256 digest of the artifact contents.
    pub sha256: String,
}

/// Index linking a log to its artifacts with content digests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactIndex {
    /// Indexed artifacts.
    pub entries: Vec<ArtifactEntry>,
}

impl ArtifactIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Digest a file on disk and add it to the index.
    pub fn push_file(
        &mut self,
        name: impl Into<String>,
        path: &Path,
    ) -> Result<(), crate::HarnessError> {
        let bytes = std::fs::read(path)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hasher.finalize();
        self.entries.push(ArtifactEntry {
            name: name.into(),
            path: path.display().to_string(),
            sha256: format!("{digest:x}"),
        });
        Ok(())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON to a file.
    pub fn write_to(&self, path: &Path) -> Result<(), crate::HarnessError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
