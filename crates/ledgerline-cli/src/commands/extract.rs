//! Extract command - statement PDFs to the intermediate text stream.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use ledgerline_core::stream::{parse_period, render, statement_lines, statement_period_from_file_name};
use ledgerline_core::{
    LedgerConfig, LedgerError, PdfGeometryExtractor, StatementContext, TableExtractor,
};

use super::load_config;
use super::output::write_output;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// PDF file, directory of PDFs, or glob pattern
    #[arg(required = true)]
    input: String,

    /// Statement period, e.g. "Dec 2023" (default: derived from each file name)
    #[arg(long)]
    period: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let files = resolve_inputs(&args.input)?;
    let period = parse_period_arg(args.period.as_deref())?;

    let stream = extract_files(&files, period, &config)?;
    write_output(args.output.as_deref(), &stream)
}

/// Parse the `--period` flag.
pub fn parse_period_arg(period: Option<&str>) -> anyhow::Result<Option<StatementContext>> {
    match period {
        None => Ok(None),
        Some(text) => match parse_period(text) {
            Some(context) => Ok(Some(context)),
            None => anyhow::bail!("Invalid statement period '{}', expected e.g. \"Dec 2023\"", text),
        },
    }
}

/// Expand a file, directory or glob into the PDF files it names, sorted.
pub fn resolve_inputs(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let path = Path::new(input);

    let mut files: Vec<PathBuf> = if path.is_file() {
        vec![path.to_path_buf()]
    } else if path.is_dir() {
        std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_pdf(p))
            .collect()
    } else {
        glob(input)?
            .filter_map(|r| r.ok())
            .filter(|p| is_pdf(p))
            .collect()
    };

    if files.is_empty() {
        anyhow::bail!("No statement PDFs found for: {}", input);
    }

    files.sort();
    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Run table extraction over every file and render the combined stream.
pub fn extract_files(
    files: &[PathBuf],
    period: Option<StatementContext>,
    config: &LedgerConfig,
) -> anyhow::Result<String> {
    let table = TableExtractor::new(&config.layout);

    let pb = if files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
                .progress_chars("=>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut stream = String::new();
    let mut total_rows = 0;

    for path in files {
        pb.set_message(path.display().to_string());

        let context = match period {
            Some(context) => context,
            None => statement_period_from_file_name(path, &config.statement.file_pattern)?,
        };
        let extractor = PdfGeometryExtractor::from_file(path).map_err(|e| match e {
            LedgerError::Document { .. } => anyhow::Error::new(e),
            e => anyhow::anyhow!("{}: {}", path.display(), e),
        })?;

        let document = table
            .extract_document(&extractor)
            .map_err(|source| LedgerError::Document {
                path: path.clone(),
                source,
            })?;
        for (number, skip) in &document.skipped {
            warn!("{} page {}: {}", path.display(), number, skip);
        }

        let lines = statement_lines(context, &document.pages);
        let rows = lines.len() - 1;
        info!("{}: {} rows for {}", path.display(), rows, context);
        total_rows += rows;
        stream.push_str(&render(&lines));

        pb.inc(1);
    }

    pb.finish_and_clear();

    if files.len() > 1 {
        eprintln!(
            "{} Extracted {} rows from {} files",
            style("✓").green(),
            total_rows,
            files.len()
        );
    }

    Ok(stream)
}
