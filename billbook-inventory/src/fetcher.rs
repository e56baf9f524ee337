//! Inventory fetcher: probe, list, normalize.

use billbook_core::{InventoryItem, InventorySet};
use billbook_fetch::ApiClient;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::api::{ItemsResponse, DEFAULT_PER_PAGE};
use crate::error::InventoryError;
use crate::parser::{map_item, raw_id};

// ============================================================================
// Fetch Report
// ============================================================================

/// A raw record that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// Record id, or `"unknown"`.
    pub raw_id: String,
    /// Why the record was skipped.
    pub reason: String,
}

/// Result of one fetch. Skipped records do not fail the batch.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// Total reported by the API.
    pub total_count: u64,
    /// Normalized items in upstream order.
    pub items: Vec<InventoryItem>,
    /// Records dropped during normalization.
    pub skipped: Vec<SkippedRecord>,
}

impl FetchReport {
    /// Number of normalized items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns true if any record was skipped.
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Returns true if the API reports more items than were returned.
    pub fn is_truncated(&self) -> bool {
        self.total_count > (self.items.len() + self.skipped.len()) as u64
    }

    /// Moves the items into an [`InventorySet`] for filtering.
    pub fn into_set(self) -> InventorySet {
        InventorySet::new(self.items)
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Maps each raw record independently, keeping upstream order.
pub fn normalize_items(records: Vec<Value>) -> (Vec<InventoryItem>, Vec<SkippedRecord>) {
    let mut items = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for raw in &records {
        match map_item(raw) {
            Ok(item) => items.push(item),
            Err(fault) => {
                let id = raw_id(raw);
                warn!(raw_id = %id, error = %fault, "Skipping inventory record");
                skipped.push(SkippedRecord {
                    raw_id: id,
                    reason: fault.to_string(),
                });
            }
        }
    }

    (items, skipped)
}

// ============================================================================
// Fetcher
// ============================================================================

/// Fetches the complete inventory with a single listing request.
#[derive(Debug, Clone)]
pub struct InventoryFetcher {
    client: ApiClient,
    per_page: u32,
}

impl InventoryFetcher {
    /// Creates a fetcher with the default page size.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Sets the page size. Only one page is requested, so this must exceed
    /// the catalog size to see every item.
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Configured page size.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Probes the API, then lists and normalizes the inventory.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::FetchAborted`] if the probe fails,
    /// [`InventoryError::ListingFailed`] if the listing request fails, and
    /// [`InventoryError::InvalidResponse`] for a malformed listing body.
    #[instrument(skip(self), fields(per_page = self.per_page))]
    pub async fn fetch_inventory(&self) -> Result<FetchReport, InventoryError> {
        debug!("Testing API connection");
        self.client
            .probe()
            .await
            .map_err(InventoryError::FetchAborted)?;
        info!("API connection successful");

        let body = self
            .client
            .list_items(1, self.per_page)
            .await
            .map_err(InventoryError::ListingFailed)?;

        let response = ItemsResponse::from_value(body)?;
        let total_count = response.total();
        let returned = response.records().len();

        if total_count > returned as u64 {
            warn!(
                total_count,
                returned,
                per_page = self.per_page,
                "API reports more items than one page holds; increase per_page"
            );
        }

        let (items, skipped) = normalize_items(response.into_records());
        info!(
            total_count,
            items = items.len(),
            skipped = skipped.len(),
            "Fetched inventory"
        );

        Ok(FetchReport {
            total_count,
            items,
            skipped,
        })
    }
}
