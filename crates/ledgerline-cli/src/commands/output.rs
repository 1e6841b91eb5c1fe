//! Record rendering and output destinations.

use std::fs;
use std::path::Path;

use console::style;
use tracing::debug;

use ledgerline_core::Ledger;
use ledgerline_core::models::config::OutputFormat;
use ledgerline_core::statement::format_amount;

/// Render a ledger's transactions, newest first.
pub fn render_ledger(ledger: Ledger, format: OutputFormat) -> anyhow::Result<String> {
    let transactions = ledger.into_sorted();

    match format {
        OutputFormat::Semicolon => {
            let mut out = String::new();
            for transaction in &transactions {
                out.push_str(&transaction.to_record());
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&transactions)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);

            wtr.write_record(["transaction_date", "posting_date", "description", "amount"])?;
            for transaction in &transactions {
                wtr.write_record([
                    &transaction.transaction_date.format("%b %d %Y").to_string(),
                    &transaction.posting_date.format("%b %d %Y").to_string(),
                    &transaction.description,
                    &transaction.amount.to_string(),
                ])?;
            }

            let data = String::from_utf8(wtr.into_inner()?)?;
            Ok(data)
        }
    }
}

/// Count and total, printed to stderr so stdout stays machine-readable.
pub fn print_summary(ledger: &Ledger) {
    eprintln!(
        "{} {} transactions, total {}",
        style("ℹ").blue(),
        ledger.len(),
        format_amount(ledger.total())
    );
}

/// Write `content` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, content)?;
            debug!("Wrote output to {}", path.display());
            eprintln!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
