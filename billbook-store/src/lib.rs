// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

//! # `BillBook` Store
//!
//! Configuration and file output for the `BillBook` exporter.
//!
//! - **Config**: JSON configuration with defaults for every field
//! - **Export**: compact JSON, detailed JSON, CSV and xlsx writers
//! - **Persistence**: atomic file writes
//!
//! ## Usage
//!
//! ```ignore
//! use billbook_store::{export, Config, ExportFormat, ExportMeta};
//!
//! let config = Config::load()?;
//! let written = export(
//!     ExportFormat::All,
//!     &config.output.dir,
//!     &config.output,
//!     ExportMeta::from(&report),
//!     &report.items,
//! )
//! .await?;
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod persistence;

pub use config::{ApiConfig, Config, OutputConfig};
pub use error::StoreError;
pub use export::{
    export, write_csv, write_json_compact, write_json_detailed, write_xlsx, ExportFormat,
    ExportMeta, COLUMNS,
};
pub use persistence::{ensure_dir, save_json, write_atomic};
