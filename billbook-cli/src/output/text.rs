//! Text output formatting with colors.

use billbook_core::InventorySummary;
use std::path::{Path, PathBuf};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

const RULE_WIDTH: usize = 60;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Application banner.
    pub fn format_banner(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH + 3);
        let banner = format!(
            "{rule}\n          MyBillBook Inventory Exporter v{}\n          Extract complete inventory data easily\n{rule}",
            env!("CARGO_PKG_VERSION")
        );
        self.cyan(&banner)
    }

    /// Inventory summary block.
    pub fn format_summary(&self, summary: &InventorySummary) -> String {
        if summary.is_empty() {
            return "No items to summarize.".to_string();
        }

        let rule = "=".repeat(RULE_WIDTH);
        let mut lines = vec![
            rule.clone(),
            self.bold("INVENTORY SUMMARY"),
            rule.clone(),
            String::new(),
            format!("Total Items: {}", summary.total_items),
            String::new(),
            format!("Categories ({}):", summary.categories.len()),
        ];

        for entry in &summary.categories {
            let name = if entry.category.is_empty() {
                "(uncategorized)"
            } else {
                entry.category.as_str()
            };
            lines.push(format!("  - {name}: {} items", entry.count));
        }

        if let Some(prices) = &summary.prices {
            lines.push(String::new());
            lines.push("Price Range:".to_string());
            lines.push(format!("  - Lowest: {}", format_currency(prices.lowest)));
            lines.push(format!("  - Highest: {}", format_currency(prices.highest)));
            lines.push(format!("  - Average: {}", format_currency(prices.average)));
        }

        lines.push(String::new());
        lines.push(format!(
            "Total Inventory Value: {}",
            self.bold(&format_currency(summary.total_value))
        ));
        lines.push(String::new());
        lines.push(rule);

        lines.join("\n")
    }

    /// Fetch result line.
    pub fn format_fetched(&self, items: usize, total: u64, skipped: usize) -> String {
        let mut line = self.green(&format!("[OK] Successfully fetched {items} items"));
        if total > (items + skipped) as u64 {
            line.push_str(&format!(" (API reports {total})"));
        }
        if skipped > 0 {
            line.push('\n');
            line.push_str(&self.yellow(&format!("{skipped} records skipped (see logs)")));
        }
        line
    }

    /// Lists written files.
    pub fn format_written(&self, files: &[PathBuf]) -> String {
        files
            .iter()
            .map(|path| format!("[OK] Saved {}", path.display()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Final success message.
    pub fn format_success(&self, dir: &Path) -> String {
        self.green(&format!("Success! Data exported to {}/", dir.display()))
    }

    /// Warning line.
    pub fn format_warning(&self, message: &str) -> String {
        self.yellow(&format!("Warning: {message}"))
    }

    /// Error line.
    pub fn format_error(&self, message: &str) -> String {
        self.red(&format!("Error: {message}"))
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Formats an amount as `Rs.1,234.50`.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}Rs.{grouped}.{fraction}")
}
