//! CLI entrypoint for the defectlab audit harness.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use defectlab_harness::report::DefectReport;
use defectlab_harness::runner::CatalogRunner;
use defectlab_harness::sample::check_sample;
use defectlab_harness::structured_log::{ArtifactIndex, LogEmitter, LogEntry, LogLevel, Outcome};
use defectlab_harness::verify::verify;
use defectlab_harness::HarnessError;

/// Audit tooling for the defectlab catalog.
#[derive(Debug, Parser)]
#[command(name = "defectlab-harness")]
#[command(about = "Audit harness for the defectlab defect catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run every catalog flow and write the audit report.
    Audit {
        /// Output report path (JSON). If omitted, prints to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Artifact index path (requires --output).
        #[arg(long)]
        artifact_index: Option<PathBuf>,
        /// Campaign name carried into the report.
        #[arg(long, default_value = "catalog-audit")]
        campaign: String,
    },
    /// Spawn the sample binary and verify its external contract.
    Sample {
        /// Path to the sample binary.
        #[arg(long)]
        bin: PathBuf,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("harness error: {err}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, HarnessError> {
    match cli.command {
        Command::Audit {
            output,
            log,
            artifact_index,
            campaign,
        } => run_audit(output, log, artifact_index, campaign),
        Command::Sample { bin } => run_sample(bin),
    }
}

fn run_audit(
    output: Option<PathBuf>,
    log: Option<PathBuf>,
    artifact_index: Option<PathBuf>,
    campaign: String,
) -> Result<ExitCode, HarnessError> {
    let runner = CatalogRunner::new(campaign.clone());
    let observations = runner.observe()?;
    let verdicts = verify(&observations);
    let report = DefectReport::from_verdicts(campaign, verdicts);

    let mut emitter = match &log {
        Some(path) => Some(LogEmitter::to_file(path)?),
        None => None,
    };
    if let Some(emitter) = emitter.as_mut() {
        for finding in &report.findings {
            let entry = LogEntry::new(LogLevel::Info, "class_audited")
                .with_case(finding.class.as_str())
                .with_outcome(finding.outcome)
                .with_details(finding.actual.clone());
            emitter.emit(&entry)?;
        }
        let summary = LogEntry::new(
            if report.all_passed() {
                LogLevel::Info
            } else {
                LogLevel::Error
            },
            "audit_complete",
        )
        .with_outcome(if report.all_passed() {
            Outcome::Pass
        } else {
            Outcome::Fail
        })
        .with_details(format!(
            "{}/{} classes reproduced",
            report.summary.passed, report.summary.total
        ));
        emitter.emit(&summary)?;
    }

    match &output {
        Some(path) => {
            report.write_to(path)?;
            if let Some(index_path) = &artifact_index {
                let mut index = ArtifactIndex::new();
                index.push_file("defect_report", path)?;
                if let Some(log_path) = &log {
                    index.push_file("audit_log", log_path)?;
                }
                index.write_to(index_path)?;
            }
        }
        None => println!("{}", report.to_json()?),
    }

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_sample(bin: PathBuf) -> Result<ExitCode, HarnessError> {
    let check = check_sample(&bin)?;
    if check.passed {
        println!("sample contract held: {}", check.stdout.trim_end());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "sample contract violated: exit {:?}, stdout {:?}, stderr {:?}",
            check.exit_code, check.stdout, check.stderr
        );
        Ok(ExitCode::FAILURE)
    }
}
