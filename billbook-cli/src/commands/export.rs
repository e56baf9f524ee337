//! Export command - fetch, filter, summarize and write the inventory.

use anyhow::{Context, Result};
use billbook_core::{FilterCriteria, InventorySet, InventorySummary};
use billbook_fetch::{ApiClient, Credentials};
use billbook_inventory::InventoryFetcher;
use billbook_store::{export, Config, ExportFormat, ExportMeta};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::output::TextFormatter;
use crate::{Cli, ExitCode};

/// Runs the export flow.
pub async fn run(cli: &Cli) -> Result<ExitCode> {
    let out = TextFormatter::new(!cli.no_color);

    if !cli.quiet {
        println!("{}\n", out.format_banner());
    }

    let env_file = dotenv::dotenv().ok();
    debug!(env_file = ?env_file, "Loaded environment");

    let credentials = Credentials::from_env();
    if !check_credentials(&credentials, env_file.as_ref(), &out, cli.quiet) {
        return Ok(ExitCode::Error);
    }

    let config = load_config(cli)?;
    let criteria = criteria_from(cli);
    criteria.validate()?;

    let settings = config
        .api
        .client_settings()
        .context("invalid API configuration")?;
    let client = ApiClient::new(settings, &credentials)?;
    let fetcher =
        InventoryFetcher::new(client).with_per_page(cli.per_page.unwrap_or(config.api.per_page));

    if !cli.quiet {
        println!("Fetching inventory...");
    }

    let mut report = match fetcher.fetch_inventory().await {
        Ok(report) => report,
        Err(e) if e.is_auth_failure() => {
            if !cli.quiet {
                eprintln!("{}", out.format_error(&e.to_string()));
                eprintln!(
                    "Check that your credentials are current; tokens and cookies expire after logout."
                );
            }
            return Ok(ExitCode::AuthFailure);
        }
        Err(e) => return Err(e).context("Failed to fetch inventory"),
    };

    if !cli.quiet {
        println!(
            "{}",
            out.format_fetched(report.item_count(), report.total_count, report.skipped.len())
        );
    }

    let set = InventorySet::from(std::mem::take(&mut report.items));
    let items = if criteria.is_empty() {
        set.into_items()
    } else {
        let filtered = set.filtered(&criteria);
        info!(before = set.len(), after = filtered.len(), "Applied filters");
        if !cli.quiet {
            println!("Filtered to {} of {} items", filtered.len(), set.len());
        }
        filtered
    };

    if !cli.no_summary && !cli.quiet {
        println!("\n{}\n", out.format_summary(&InventorySummary::from_items(&items)));
    }

    let dir = cli.output.clone().unwrap_or_else(|| config.output.dir.clone());
    let format = ExportFormat::from(cli.format);
    let written = export(format, &dir, &config.output, ExportMeta::from(&report), &items)
        .await
        .with_context(|| format!("Failed to export to {}", dir.display()))?;

    if !cli.quiet {
        if written.is_empty() {
            println!("No items to export.");
        } else {
            println!("{}", out.format_written(&written));
            println!("\n{}\n", out.format_success(&dir));
        }
    }

    Ok(ExitCode::Success)
}

/// Warns about missing credentials. Returns false when nothing is
/// configured at all.
fn check_credentials(
    credentials: &Credentials,
    env_file: Option<&PathBuf>,
    out: &TextFormatter,
    quiet: bool,
) -> bool {
    let missing = credentials.missing();
    if missing.is_empty() {
        return true;
    }

    let nothing_configured = env_file.is_none() && missing.len() == 3;
    if !quiet {
        if nothing_configured {
            eprintln!("{}", out.format_warning(".env file not found!"));
            eprintln!("\nPlease create a .env file with your credentials:");
        } else {
            eprintln!("{}", out.format_warning("some credentials are not set"));
        }
        for name in &missing {
            eprintln!("  {name}=...");
        }
        eprintln!();
    }

    !nothing_configured
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };
    debug!(?config, "Configuration");
    Ok(config)
}

fn criteria_from(cli: &Cli) -> FilterCriteria {
    let mut criteria = FilterCriteria::new()
        .with_stock_range(cli.min_stock, cli.max_stock)
        .with_price_range(cli.min_price, cli.max_price);
    if let Some(category) = &cli.category {
        criteria = criteria.with_category(category.clone());
    }
    criteria
}
