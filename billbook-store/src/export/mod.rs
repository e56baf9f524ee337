//! Inventory export writers.
//!
//! Four files can be produced from one fetch:
//!
//! | Writer                  | Default file                | Shape                       |
//! |-------------------------|-----------------------------|-----------------------------|
//! | [`write_json_compact`]  | `inventory_complete.json`   | single-line item array      |
//! | [`write_json_detailed`] | `inventory_detailed.json`   | pretty document with meta   |
//! | [`write_csv`]           | `inventory_export.csv`      | flat rows, fixed columns    |
//! | [`write_xlsx`]          | `inventory_export.xlsx`     | `Inventory` worksheet       |
//!
//! The flat writers share [`COLUMNS`] and drop the nested array fields.

mod csv;
mod json;
mod xlsx;

use billbook_core::InventoryItem;
use billbook_inventory::{FetchReport, SkippedRecord};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::config::OutputConfig;
use crate::error::StoreError;
use crate::persistence::ensure_dir;

pub use self::csv::write_csv;
pub use self::json::{write_json_compact, write_json_detailed};
pub use self::xlsx::{write_xlsx, SHEET_NAME};

// ============================================================================
// Format Selection
// ============================================================================

/// Which files an export run produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Every format.
    #[default]
    All,
    /// Compact and detailed JSON.
    Json,
    /// CSV only.
    Csv,
    /// Spreadsheet only.
    Excel,
}

impl ExportFormat {
    /// All variants.
    pub const ALL: [ExportFormat; 4] = [Self::All, Self::Json, Self::Csv, Self::Excel];

    /// Lowercase name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Excel => "excel",
        }
    }

    fn writes_json(self) -> bool {
        matches!(self, Self::All | Self::Json)
    }

    fn writes_csv(self) -> bool {
        matches!(self, Self::All | Self::Csv)
    }

    fn writes_xlsx(self) -> bool {
        matches!(self, Self::All | Self::Excel)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown export format `{s}` (expected all, json, csv or excel)"))
    }
}

// ============================================================================
// Export Metadata
// ============================================================================

/// Fetch-level facts recorded in the detailed JSON export.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportMeta<'a> {
    /// Total reported by the API.
    pub total_count: u64,
    /// Records dropped during normalization.
    pub skipped: &'a [SkippedRecord],
}

impl<'a> From<&'a FetchReport> for ExportMeta<'a> {
    fn from(report: &'a FetchReport) -> Self {
        Self {
            total_count: report.total_count,
            skipped: &report.skipped,
        }
    }
}

// ============================================================================
// Flat Rows
// ============================================================================

/// Column order of the flat exports.
pub const COLUMNS: [&str; 27] = [
    "id",
    "name",
    "sku_code",
    "category",
    "category_name",
    "mrp",
    "selling_price",
    "sales_price",
    "purchase_price",
    "wholesale_price",
    "wholesale_min_quantity",
    "quantity",
    "minimum_quantity",
    "unit",
    "unit_long",
    "gst_percentage",
    "sales_tax_included",
    "purchase_tax_included",
    "description",
    "item_type",
    "show_on_store",
    "excel_imported",
    "created_at",
    "identification_code",
    "conversion_factor",
    "item_category_id",
    "index",
];

/// One typed cell of a flat row.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Integer(i64),
    Bool(bool),
    Empty,
}

impl Cell<'_> {
    fn number(value: Option<f64>) -> Self {
        value.map_or(Cell::Empty, Cell::Number)
    }

    /// Text form used by the CSV writer.
    pub(crate) fn to_field(&self) -> String {
        match self {
            Cell::Text(s) => (*s).to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::Integer(i) => i.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

/// Flattens an item in [`COLUMNS`] order.
pub(crate) fn row(item: &InventoryItem) -> [Cell<'_>; 27] {
    [
        Cell::Text(&item.id),
        Cell::Text(&item.name),
        Cell::Text(&item.sku_code),
        Cell::Text(&item.category),
        Cell::Text(&item.category_name),
        Cell::Number(item.mrp),
        Cell::Number(item.selling_price),
        Cell::Number(item.sales_price),
        Cell::Number(item.purchase_price),
        Cell::number(item.wholesale_price),
        Cell::number(item.wholesale_min_quantity),
        Cell::Text(&item.quantity),
        Cell::Text(&item.minimum_quantity),
        Cell::Text(&item.unit),
        Cell::Text(&item.unit_long),
        Cell::Number(item.gst_percentage),
        Cell::Bool(item.sales_tax_included),
        Cell::Bool(item.purchase_tax_included),
        Cell::Text(&item.description),
        Cell::Integer(item.item_type),
        Cell::Bool(item.show_on_store),
        Cell::Bool(item.excel_imported),
        Cell::Text(&item.created_at),
        Cell::Text(&item.identification_code),
        Cell::Number(item.conversion_factor),
        Cell::Text(&item.item_category_id),
        item.index.map_or(Cell::Empty, |i| Cell::Integer(i64::from(i))),
    ]
}

// ============================================================================
// Export Driver
// ============================================================================

/// Writes the files selected by `format` into `dir`, returning their paths.
///
/// Nothing is written for an empty item list.
pub async fn export(
    format: ExportFormat,
    dir: &Path,
    files: &OutputConfig,
    meta: ExportMeta<'_>,
    items: &[InventoryItem],
) -> Result<Vec<PathBuf>, StoreError> {
    if items.is_empty() {
        info!("No items to export");
        return Ok(Vec::new());
    }

    ensure_dir(dir).await?;
    let mut written = Vec::new();

    if format.writes_json() {
        let path = files.json_path(dir);
        write_json_compact(&path, items).await?;
        written.push(path);

        let path = files.detailed_json_path(dir);
        write_json_detailed(&path, meta, items).await?;
        written.push(path);
    }

    if format.writes_csv() {
        let path = files.csv_path(dir);
        write_csv(&path, items).await?;
        written.push(path);
    }

    if format.writes_xlsx() {
        let path = files.xlsx_path(dir);
        write_xlsx(&path, items).await?;
        written.push(path);
    }

    info!(format = %format, files = written.len(), dir = %dir.display(), "Export complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("all".parse::<ExportFormat>().unwrap(), ExportFormat::All);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_format_selection() {
        assert!(ExportFormat::All.writes_json());
        assert!(ExportFormat::All.writes_xlsx());
        assert!(ExportFormat::Json.writes_json());
        assert!(!ExportFormat::Json.writes_csv());
        assert!(!ExportFormat::Csv.writes_xlsx());
        assert!(ExportFormat::Excel.writes_xlsx());
    }

    #[test]
    fn test_row_matches_columns() {
        let item = InventoryItem::new("a", "Stud").unwrap().with_index(4);
        let cells = row(&item);
        assert_eq!(cells.len(), COLUMNS.len());
        assert_eq!(cells[0], Cell::Text("a"));
        assert_eq!(cells[9], Cell::Empty);
        assert_eq!(cells[26], Cell::Integer(4));
    }

    #[test]
    fn test_cell_fields() {
        assert_eq!(Cell::Number(150.5).to_field(), "150.5");
        assert_eq!(Cell::Bool(true).to_field(), "true");
        assert_eq!(Cell::Empty.to_field(), "");
    }
}
