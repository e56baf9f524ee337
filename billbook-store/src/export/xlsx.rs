//! Spreadsheet export.

use billbook_core::InventoryItem;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

use super::{row, Cell, COLUMNS};
use crate::error::StoreError;
use crate::persistence::write_atomic;

/// Worksheet holding the exported items.
pub const SHEET_NAME: &str = "Inventory";

/// Renders the items as an xlsx workbook.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn render_xlsx(items: &[InventoryItem]) -> Result<Vec<u8>, StoreError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in (0u16..).zip(COLUMNS) {
        sheet.write_string_with_format(0, col, name, &header)?;
    }

    for (row_num, item) in (1u32..).zip(items) {
        for (col, cell) in (0u16..).zip(row(item)) {
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(row_num, col, s)?;
                }
                Cell::Number(n) => {
                    sheet.write_number(row_num, col, n)?;
                }
                Cell::Integer(i) => {
                    sheet.write_number(row_num, col, i as f64)?;
                }
                Cell::Bool(b) => {
                    sheet.write_boolean(row_num, col, b)?;
                }
                Cell::Empty => {}
            }
        }
    }

    sheet.set_freeze_panes(1, 0)?;
    sheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

/// Writes the items to a single `Inventory` worksheet.
pub async fn write_xlsx(path: &Path, items: &[InventoryItem]) -> Result<(), StoreError> {
    let bytes = render_xlsx(items)?;
    write_atomic(path, &bytes).await?;
    info!(path = %path.display(), items = items.len(), "Saved spreadsheet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_zip_container() {
        let item = InventoryItem::new("a", "Stud").unwrap();
        let bytes = render_xlsx(&[item]).unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }
}
