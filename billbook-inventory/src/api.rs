//! Listing response shape.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::InventoryError;
use crate::parser::optional_number;

/// Default page size for the single listing request.
pub const DEFAULT_PER_PAGE: u32 = 500;

/// Response from `GET /items`.
///
/// Records stay as raw JSON; each one is normalized independently so a
/// single malformed record cannot fail the whole listing.
#[derive(Debug, Default, Deserialize)]
pub struct ItemsResponse {
    /// Total number of items the account holds, as sent. Only used for
    /// diagnostics, so any JSON value is accepted; see [`Self::total`].
    #[serde(default)]
    pub total_count: Option<Value>,

    /// Item records on this page.
    #[serde(default)]
    pub inventory_items: Option<Vec<Value>>,
}

impl ItemsResponse {
    /// Decodes a listing response.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InvalidResponse`] if the body is not an
    /// object or its fields have the wrong types.
    pub fn from_value(value: Value) -> Result<Self, InventoryError> {
        if !value.is_object() {
            return Err(InventoryError::InvalidResponse(format!(
                "expected a JSON object, got {}",
                kind_of(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| InventoryError::InvalidResponse(e.to_string()))
    }

    /// Reported total as a count, if it is a non-negative whole number
    /// (numeric strings accepted).
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn reported_total(&self) -> Option<u64> {
        let total = optional_number(self.total_count.as_ref())?;
        (total >= 0.0 && total.fract() == 0.0 && total <= u64::MAX as f64).then(|| total as u64)
    }

    /// Reported total, falling back to the number of records returned when
    /// the field is absent or unusable.
    pub fn total(&self) -> u64 {
        let returned = self.records().len() as u64;
        match (&self.total_count, self.reported_total()) {
            (_, Some(total)) => total,
            (None | Some(Value::Null), None) => returned,
            (Some(raw), None) => {
                warn!(total_count = %raw, returned, "Ignoring unusable total_count");
                returned
            }
        }
    }

    /// Records on this page; empty when the field is absent.
    pub fn records(&self) -> &[Value] {
        self.inventory_items.as_deref().unwrap_or_default()
    }

    /// Consumes the response, returning its records.
    pub fn into_records(self) -> Vec<Value> {
        self.inventory_items.unwrap_or_default()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
