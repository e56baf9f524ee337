//! Domain models for BillBook.
//!
//! ## Submodules
//!
//! - [`item`] - The canonical [`InventoryItem`] record
//! - [`summary`] - Aggregate statistics ([`InventorySummary`])

pub mod item;
mod summary;

pub use item::{parse_stock, InventoryItem};
pub use summary::{CategoryCount, InventorySummary, PriceStats};
