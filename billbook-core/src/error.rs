//! Core error types for `BillBook`.

use thiserror::Error;

/// Core error type for `BillBook` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record violates a model invariant.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Filter criteria that can never match.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}
