// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `BillBook` Core
//!
//! Core types for the `BillBook` inventory exporter.
//!
//! This crate provides the foundational abstractions used across all other
//! `BillBook` crates:
//!
//! - The canonical inventory record ([`InventoryItem`])
//! - Post-fetch filtering ([`FilterCriteria`], [`apply_filters`])
//! - Inventory statistics ([`InventorySummary`])
//! - Error types ([`CoreError`])

pub mod error;
pub mod filter;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export filtering
pub use filter::{apply_filters, FilterCriteria, InventorySet};

// Re-export all model types
pub use models::{parse_stock, CategoryCount, InventoryItem, InventorySummary, PriceStats};
