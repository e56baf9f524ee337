// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `BillBook` Inventory
//!
//! Fetches the item listing and normalizes it into [`InventoryItem`]s.
//!
//! The pipeline is a probe request, one listing request, and independent
//! per-record mapping. A record that cannot be mapped is reported in
//! [`FetchReport::skipped`] and does not fail the batch.
//!
//! ```ignore
//! use billbook_inventory::InventoryFetcher;
//!
//! let report = InventoryFetcher::new(client).fetch_inventory().await?;
//! println!("{} items, {} skipped", report.items.len(), report.skipped.len());
//! ```
//!
//! [`InventoryItem`]: billbook_core::InventoryItem

pub mod api;
pub mod error;
pub mod fetcher;
pub mod parser;


pub use api::{ItemsResponse, DEFAULT_PER_PAGE};
pub use error::{InventoryError, MappingFault};
pub use fetcher::{normalize_items, FetchReport, InventoryFetcher, SkippedRecord};
pub use parser::map_item;
