//! External-contract check for the sample binary.
//!
//! The binary's observable surface is deliberately narrow: one stdout line,
//! nothing on stderr, exit status 0 no matter what was corrupted or leaked
//! internally. The check spawns the binary and asserts exactly that.

use std::path::Path;
use std::process::Command;

use crate::error::HarnessError;
use crate::verify::EXPECTED_SAMPLE_STDOUT;

/// Result of spawning the sample binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCheck {
    /// Captured stdout.
    pub stdout: String,
    /// Captured stderr.
    pub stderr: String,
    /// Process exit code, if the process exited normally.
    pub exit_code: Option<i32>,
    /// Whether the external contract held.
    pub passed: bool,
}

/// Spawn the sample binary at `bin` and check its external contract.
pub fn check_sample(bin: &Path) -> Result<SampleCheck, HarnessError> {
    let output = Command::new(bin)
        .output()
        .map_err(|source| HarnessError::Spawn {
            program: bin.display().to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let exit_code = output.status.code();
    let passed = exit_code == Some(0) && stdout == EXPECTED_SAMPLE_STDOUT && stderr.is_empty();

    Ok(SampleCheck {
        stdout,
        stderr,
        exit_code,
        passed,
    })
}
