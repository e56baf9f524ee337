//! JSON exports.

use billbook_core::InventoryItem;
use billbook_inventory::SkippedRecord;
use chrono::Utc;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use super::ExportMeta;
use crate::error::StoreError;
use crate::persistence::{save_json, write_atomic};

/// Detailed export document.
#[derive(Debug, Serialize)]
struct DetailedExport<'a> {
    exported_at: String,
    total_count: u64,
    item_count: usize,
    skipped: &'a [SkippedRecord],
    items: &'a [InventoryItem],
}

/// Writes the items as a single-line JSON array.
pub async fn write_json_compact(path: &Path, items: &[InventoryItem]) -> Result<(), StoreError> {
    let json = serde_json::to_vec(items)?;
    write_atomic(path, &json).await?;
    info!(path = %path.display(), items = items.len(), "Saved JSON");
    Ok(())
}

/// Writes a pretty-printed document with export metadata and the items.
pub async fn write_json_detailed(
    path: &Path,
    meta: ExportMeta<'_>,
    items: &[InventoryItem],
) -> Result<(), StoreError> {
    let document = DetailedExport {
        exported_at: Utc::now().to_rfc3339(),
        total_count: meta.total_count,
        item_count: items.len(),
        skipped: meta.skipped,
        items,
    };
    save_json(path, &document).await?;
    info!(path = %path.display(), items = items.len(), "Saved detailed JSON");
    Ok(())
}
