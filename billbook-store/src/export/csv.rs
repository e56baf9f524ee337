//! CSV export.

use billbook_core::InventoryItem;
use std::path::Path;
use tracing::info;

use super::{row, Cell, COLUMNS};
use crate::error::StoreError;
use crate::persistence::write_atomic;

/// Renders the items as CSV with a header row in [`COLUMNS`] order.
pub(crate) fn render_csv(items: &[InventoryItem]) -> Result<Vec<u8>, StoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for item in items {
        writer.write_record(row(item).iter().map(Cell::to_field))?;
    }
    writer
        .into_inner()
        .map_err(|e| StoreError::Io(e.into_error()))
}

/// Writes the items as CSV.
pub async fn write_csv(path: &Path, items: &[InventoryItem]) -> Result<(), StoreError> {
    let bytes = render_csv(items)?;
    write_atomic(path, &bytes).await?;
    info!(path = %path.display(), items = items.len(), "Saved CSV");
    Ok(())
}
