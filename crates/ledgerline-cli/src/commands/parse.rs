//! Parse command - text stream to sorted transaction records.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use ledgerline_core::models::config::OutputFormat;
use ledgerline_core::statement::read_stream;

use super::load_config;
use super::output::{print_summary, render_ledger, write_output};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Stream file written by `extract`, or "-" for stdin
    #[arg(required = true)]
    input: String,

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

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = if args.input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        let path = PathBuf::from(&args.input);
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        std::fs::read_to_string(&path)?
    };
    debug!("Read {} bytes of statement stream", text.len());

    let ledger = read_stream(&text);
    if args.summary || config.output.summary {
        print_summary(&ledger);
    }

    let format = args.format.unwrap_or(config.output.format);
    let rendered = render_ledger(ledger, format)?;
    write_output(args.output.as_deref(), &rendered)
}
