//! Inventory pipeline errors.

use billbook_core::CoreError;
use billbook_fetch::RequestError;
use thiserror::Error;

/// Why a single raw record could not be normalized.
#[derive(Debug, Error)]
pub enum MappingFault {
    /// The record is not a JSON object.
    #[error("record is not a JSON object")]
    NotAnObject,

    /// A required field is absent, null, or blank.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A numeric field holds something that is not a number.
    #[error("field `{field}` is not a number: {value}")]
    InvalidNumber {
        /// Field path.
        field: &'static str,
        /// Offending value as it appeared in the record.
        value: String,
    },

    /// A monetary field is negative.
    #[error("field `{field}` is negative: {value}")]
    NegativeAmount {
        /// Field path.
        field: &'static str,
        /// Parsed value.
        value: f64,
    },

    /// The assembled item violates a model invariant.
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

/// Error type for the inventory fetch.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The connectivity probe failed, so nothing was fetched.
    #[error("Fetch aborted, connection test failed: {0}")]
    FetchAborted(#[source] RequestError),

    /// The item listing request failed.
    #[error("Failed to fetch inventory listing: {0}")]
    ListingFailed(#[source] RequestError),

    /// The listing response does not have the expected shape.
    #[error("Invalid listing response: {0}")]
    InvalidResponse(String),
}

impl InventoryError {
    /// The underlying request failure, if any.
    pub fn request_error(&self) -> Option<&RequestError> {
        match self {
            Self::FetchAborted(e) | Self::ListingFailed(e) => Some(e),
            Self::InvalidResponse(_) => None,
        }
    }

    /// Returns true if the API rejected the credentials.
    pub fn is_auth_failure(&self) -> bool {
        self.request_error().is_some_and(RequestError::is_auth_failure)
    }
}
