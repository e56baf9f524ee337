// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `BillBook` CLI - export a MyBillBook inventory from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Fetch everything and write all export formats to ./output
//! billbook
//!
//! # Spreadsheet only
//! billbook --format excel
//!
//! # Filter by category and stock
//! billbook --category "Ear Rings" --min-stock 10
//!
//! # Custom output directory, minimal output
//! billbook --output ./exports --quiet
//! ```

mod commands;
mod output;

use anyhow::Result;
use billbook_store::ExportFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::export;

// ============================================================================
// CLI Definition
// ============================================================================

/// `BillBook` CLI - MyBillBook inventory exporter.
#[derive(Parser)]
#[command(name = "billbook")]
#[command(about = "Export a complete MyBillBook inventory")]
#[command(long_about = r#"
Fetches the complete item inventory of a MyBillBook company and writes it
as JSON, CSV and Excel files.

Credentials are read from the environment (or a .env file):
  MYBILLBOOK_AUTH_TOKEN    authorization header value
  MYBILLBOOK_COOKIES       cookie header value
  MYBILLBOOK_COMPANY_ID    company id

Examples:
  billbook                          # All formats into ./output
  billbook --format excel           # Excel only
  billbook --category "Ear Rings"   # Filter by category
  billbook --min-stock 10           # Items with stock >= 10
  billbook --output ./exports       # Custom output directory
  billbook --quiet                  # Minimal output
"#)]
#[command(version)]
pub struct Cli {
    /// Export format.
    #[arg(long, value_enum, default_value = "all")]
    pub format: FormatArg,

    /// Output directory (defaults to the configured directory).
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Keep items whose category contains this text (case-insensitive).
    #[arg(long, short)]
    pub category: Option<String>,

    /// Keep items with stock >= this value.
    #[arg(long)]
    pub min_stock: Option<f64>,

    /// Keep items with stock <= this value.
    #[arg(long)]
    pub max_stock: Option<f64>,

    /// Keep items with selling price >= this value.
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Keep items with selling price <= this value.
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Page size of the listing request.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub per_page: Option<u32>,

    /// Configuration file (defaults to <config dir>/billbook/config.json).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip printing the summary.
    #[arg(long)]
    pub no_summary: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short)]
    pub quiet: bool,

    /// Verbose output (show debug info).
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum FormatArg {
    /// JSON, CSV and Excel.
    #[default]
    All,
    /// Compact and detailed JSON.
    Json,
    /// CSV only.
    Csv,
    /// Excel only.
    Excel,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::All => ExportFormat::All,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Excel => ExportFormat::Excel,
        }
    }
}

/// CLI exit codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error or missing credentials.
    Error = 1,
    /// The API rejected the credentials.
    AuthFailure = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let default = if verbose {
        "billbook=debug,info"
    } else {
        "billbook=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match export::run(&cli).await {
        Ok(ExitCode::Success) => Ok(()),
        Ok(code) => std::process::exit(code as i32),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            std::process::exit(ExitCode::Error as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["billbook"]);
        assert_eq!(cli.format, FormatArg::All);
        assert!(cli.output.is_none());
        assert!(!cli.quiet);
    }

    #[test]
    fn test_filter_flags() {
        let cli = Cli::parse_from([
            "billbook",
            "--format",
            "excel",
            "-c",
            "Ear Rings",
            "--min-stock",
            "10",
            "--max-price",
            "250.5",
            "-o",
            "exports",
        ]);
        assert_eq!(ExportFormat::from(cli.format), ExportFormat::Excel);
        assert_eq!(cli.category.as_deref(), Some("Ear Rings"));
        assert_eq!(cli.min_stock, Some(10.0));
        assert_eq!(cli.max_price, Some(250.5));
        assert_eq!(cli.output, Some(PathBuf::from("exports")));
    }

    #[test]
    fn test_per_page_must_be_positive() {
        assert!(Cli::try_parse_from(["billbook", "--per-page", "0"]).is_err());

        let cli = Cli::parse_from(["billbook", "--per-page", "1000"]);
        assert_eq!(cli.per_page, Some(1000));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["billbook", "--format", "xml"]).is_err());
    }
}
