//! wifi-survey CLI
//!
//! Batch driver for the wifi-survey toolkit: walks a local archive of
//! per-station scan logs, decodes every beacon, and writes
//! resolved-channel and overlap-aggregate reports as CSV or JSON.
//!
//! # Usage
//!
//! ```bash
//! # Resolved channel records for one station's archive
//! wifi-survey scan -d ./logs/b8-27-eb-00-00-01 -o wifi_scan.csv
//!
//! # Overlap aggregates, JSON, to stdout
//! wifi-survey aggregate -d ./logs/b8-27-eb-00-00-01 -J
//! ```

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use wifi_survey_stats::{analyze, replicate_speedtest};

pub mod ingest;
pub mod report;

/// wifi-survey command line interface.
#[derive(Parser, Debug)]
#[command(name = "wifi-survey")]
#[command(author, version, about = "Wi-Fi field-survey telemetry reports")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode scan logs into resolved-channel records.
    Scan(ReportArgs),

    /// Compute per-test overlap aggregates and link statistics.
    Aggregate(ReportArgs),

    /// Display version information.
    Version,
}

/// Arguments shared by the reporting commands.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Local log directory to walk for scan documents.
    #[arg(short = 'd', long, default_value = "./logs")]
    pub log_dir: PathBuf,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit JSON instead of CSV.
    #[arg(short = 'J', long)]
    pub json: bool,
}

impl ReportArgs {
    fn open_output(&self) -> Result<Box<dyn Write>> {
        Ok(match &self.output {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("creating output file {}", path.display()))?,
            ),
            None => Box::new(io::stdout()),
        })
    }
}

/// Execute the `scan` command: one report row per resolved beacon.
pub fn run_scan(args: &ReportArgs) -> Result<()> {
    let documents = ingest::load_documents(&args.log_dir)?;
    let rows: Vec<report::ScanRow> = documents.iter().flat_map(report::scan_rows).collect();
    if rows.is_empty() {
        warn!(log_dir = %args.log_dir.display(), "no resolvable scan records found");
    }

    let out = args.open_output()?;
    if args.json {
        report::write_json(&rows, out)
    } else {
        report::write_csv(&rows, out)
    }
}

/// Execute the `aggregate` command: one report entry per snapshot key.
pub fn run_aggregate(args: &ReportArgs) -> Result<()> {
    let documents = ingest::load_documents(&args.log_dir)?;
    let snapshots: Vec<_> = documents
        .into_iter()
        .filter_map(ingest::ScanDocument::into_snapshot)
        .collect();
    let mut snapshots = replicate_speedtest(snapshots);
    snapshots.sort_by_key(|s| s.timestamp);
    if snapshots.is_empty() {
        warn!(log_dir = %args.log_dir.display(), "no aggregatable snapshots found");
    }

    let out = args.open_output()?;
    if args.json {
        let reports: Vec<report::AggregateReport> = snapshots
            .iter()
            .map(|s| report::aggregate_report(s, analyze(s)))
            .collect();
        report::write_json(&reports, out)
    } else {
        let rows: Vec<report::AggregateRow> = snapshots
            .iter()
            .map(|s| report::aggregate_row(s, &analyze(s)))
            .collect();
        report::write_csv(&rows, out)
    }
}
