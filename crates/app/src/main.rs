//! Spendlens - bank statement insights in your terminal

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use spendlens::{output, Report, Settings};
use spendlens_core::BudgetPeriod;
use tracing_subscriber::EnvFilter;

/// Categorize a bank statement export and summarize where the money went
#[derive(Parser)]
#[command(name = "spendlens", version, about, long_about = None)]
struct Cli {
    /// Statement export (CSV)
    file: PathBuf,

    /// Settings file (defaults to config.toml in the platform config directory)
    #[arg(short, long, env = "SPENDLENS_CONFIG")]
    config: Option<PathBuf>,

    /// Source line holding the column labels (0 = first line); skips keyword detection
    #[arg(long, value_name = "N", conflicts_with = "detect_header")]
    header_row: Option<usize>,

    /// Find the column labels by keyword scan, overriding the settings file
    #[arg(long)]
    detect_header: bool,

    /// Spending target for the budget period
    #[arg(long, value_name = "AMOUNT")]
    budget: Option<Decimal>,

    /// Budget period: all-time, current-month or previous-month
    #[arg(long)]
    period: Option<BudgetPeriod>,

    /// Preferred date format, e.g. %d/%m/%Y
    #[arg(long, value_name = "FMT")]
    date_format: Option<String>,

    /// Field delimiter
    #[arg(long)]
    delimiter: Option<char>,

    /// Output the report as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply_to(&self, settings: &mut Settings) {
        if let Some(row) = self.header_row {
            settings.header.manual_header = true;
            settings.header.header_row_index = row;
        }
        if self.detect_header {
            settings.header.manual_header = false;
        }
        if let Some(target) = self.budget {
            settings.budget.target = target;
        }
        if let Some(period) = self.period {
            settings.budget.period = period;
        }
        if let Some(format) = &self.date_format {
            settings.parsing.date_format = Some(format.clone());
        }
        if let Some(delimiter) = self.delimiter {
            settings.parsing.delimiter = delimiter;
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("Error: {e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings =
        Settings::load_or_default(cli.config.as_deref()).context("Failed to load settings")?;
    cli.apply_to(&mut settings);
    settings.validate()?;

    let pipeline = settings.pipeline()?;
    let file = File::open(&cli.file)
        .with_context(|| format!("Failed to open {}", cli.file.display()))?;
    let set = pipeline
        .run_csv(BufReader::new(file), settings.parsing.delimiter)
        .with_context(|| format!("Failed to process {}", cli.file.display()))?;

    if set.is_empty() {
        let notice = format!(
            "No valid transactions found in {}. Try --detect-header, or --header-row N \
             to point at the column labels.",
            cli.file.display()
        );
        output::warning(&notice);
        return Ok(());
    }

    let report = Report::build(&set, &settings.budget());
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_summary(&report)?;
    }
    Ok(())
}
