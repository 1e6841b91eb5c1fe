//! Process command - statement PDFs straight to transaction records.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use tracing::info;

use ledgerline_core::models::config::OutputFormat;
use ledgerline_core::statement::read_stream;

use super::extract::{extract_files, parse_period_arg, resolve_inputs};
use super::load_config;
use super::output::{print_summary, render_ledger, write_output};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// PDF file, directory of PDFs, or glob pattern
    #[arg(required = true)]
    input: String,

    /// Statement period, e.g. "Dec 2023" (default: derived from each file name)
    #[arg(long)]
    period: Option<String>,

    /// Output format: semicolon, json or csv (default from config)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Print transaction count and total
    #[arg(long)]
    summary: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let files = resolve_inputs(&args.input)?;
    let period = parse_period_arg(args.period.as_deref())?;

    let stream = extract_files(&files, period, &config)?;
    let ledger = read_stream(&stream);
    info!(
        "Processed {} files into {} transactions in {:?}",
        files.len(),
        ledger.len(),
        start.elapsed()
    );

    if args.summary || config.output.summary {
        print_summary(&ledger);
    }

    let format = args.format.unwrap_or(config.output.format);
    let rendered = render_ledger(ledger, format)?;
    write_output(args.output.as_deref(), &rendered)
}
