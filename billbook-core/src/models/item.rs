//! Canonical inventory item.
//!
//! [`InventoryItem`] is the stable shape every upstream record is normalized
//! into. Exports, filters, and summaries all work on this type only.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Inventory Item
// ============================================================================

/// A single normalized inventory item.
///
/// Field names match the export schema, so the serde representation is the
/// JSON export format as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    // Identity
    /// Upstream item id, stable across fetches.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Stock keeping unit code.
    #[serde(default)]
    pub sku_code: String,

    // Classification
    /// Category name (alias of `category_name`).
    #[serde(default)]
    pub category: String,
    /// Category name.
    #[serde(default)]
    pub category_name: String,
    /// Upstream category id.
    #[serde(default)]
    pub item_category_id: String,

    // Pricing
    /// Maximum retail price.
    #[serde(default)]
    pub mrp: f64,
    /// Selling price.
    #[serde(default)]
    pub selling_price: f64,
    /// Per-unit price from the sales sub-record.
    #[serde(default)]
    pub sales_price: f64,
    /// Purchase price.
    #[serde(default)]
    pub purchase_price: f64,
    /// Wholesale per-unit price; `None` unless positive.
    #[serde(default)]
    pub wholesale_price: Option<f64>,
    /// Minimum quantity for wholesale pricing.
    #[serde(default)]
    pub wholesale_min_quantity: Option<f64>,

    // Stock
    /// Quantity on hand, as reported upstream (may be non-numeric).
    #[serde(default = "default_stock")]
    pub quantity: String,
    /// Reorder threshold, as reported upstream.
    #[serde(default = "default_stock")]
    pub minimum_quantity: String,
    /// Short unit code.
    #[serde(default)]
    pub unit: String,
    /// Long unit name.
    #[serde(default)]
    pub unit_long: String,

    // Tax
    /// GST rate in percent.
    #[serde(default)]
    pub gst_percentage: f64,
    /// Whether the selling price includes tax.
    #[serde(default)]
    pub sales_tax_included: bool,
    /// Whether the purchase price includes tax.
    #[serde(default)]
    pub purchase_tax_included: bool,

    // Details
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Legacy item type code.
    #[serde(default)]
    pub item_type: i64,
    /// Legacy storefront flag.
    #[serde(default)]
    pub show_on_store: bool,
    /// Legacy spreadsheet-import flag.
    #[serde(default)]
    pub excel_imported: bool,
    /// Creation timestamp, kept verbatim.
    #[serde(default)]
    pub created_at: String,
    /// Barcode or other identification code.
    #[serde(default)]
    pub identification_code: String,
    /// Legacy unit conversion factor.
    #[serde(default)]
    pub conversion_factor: f64,

    // Nested
    /// Custom fields, passed through untouched.
    #[serde(default)]
    pub additional_fields: Vec<serde_json::Value>,
    /// Reserved for variants; never populated by the current API.
    #[serde(default)]
    pub sub_items: Vec<serde_json::Value>,

    /// Ordinal position, set only by callers that need one.
    #[serde(default)]
    pub index: Option<u32>,
}

fn default_stock() -> String {
    "0".to_string()
}

impl InventoryItem {
    /// Creates an item with the given identity and every other field at its
    /// default.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidData`] if `id` or `name` is blank.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        let name = name.into();

        if id.trim().is_empty() {
            return Err(CoreError::InvalidData("item id is empty".to_string()));
        }
        if name.trim().is_empty() {
            return Err(CoreError::InvalidData(format!("item {id} has an empty name")));
        }

        Ok(Self {
            id,
            name,
            sku_code: String::new(),
            category: String::new(),
            category_name: String::new(),
            item_category_id: String::new(),
            mrp: 0.0,
            selling_price: 0.0,
            sales_price: 0.0,
            purchase_price: 0.0,
            wholesale_price: None,
            wholesale_min_quantity: None,
            quantity: default_stock(),
            minimum_quantity: default_stock(),
            unit: String::new(),
            unit_long: String::new(),
            gst_percentage: 0.0,
            sales_tax_included: false,
            purchase_tax_included: false,
            description: String::new(),
            item_type: 0,
            show_on_store: false,
            excel_imported: false,
            created_at: String::new(),
            identification_code: String::new(),
            conversion_factor: 0.0,
            additional_fields: Vec::new(),
            sub_items: Vec::new(),
            index: None,
        })
    }

    /// Returns a copy of this item with an ordinal position assigned.
    #[must_use]
    pub fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    /// Category used for grouping and filtering: `category_name`, or
    /// `category` when the name is blank.
    pub fn display_category(&self) -> &str {
        if self.category_name.is_empty() {
            &self.category
        } else {
            &self.category_name
        }
    }

    /// Quantity on hand as a number, if it parses to a finite value.
    pub fn stock_level(&self) -> Option<f64> {
        parse_stock(&self.quantity)
    }

    /// Checks the model invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidData`] describing the first violation.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::InvalidData("item id is empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidData(format!(
                "item {} has an empty name",
                self.id
            )));
        }

        let amounts = [
            ("mrp", self.mrp),
            ("selling_price", self.selling_price),
            ("sales_price", self.sales_price),
            ("purchase_price", self.purchase_price),
            ("gst_percentage", self.gst_percentage),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidData(format!(
                    "item {}: {field} must be a non-negative number, got {value}",
                    self.id
                )));
            }
        }

        if let Some(price) = self.wholesale_price {
            if !price.is_finite() || price <= 0.0 {
                return Err(CoreError::InvalidData(format!(
                    "item {}: wholesale_price must be positive when set, got {price}",
                    self.id
                )));
            }
        }

        Ok(())
    }
}

/// Parses a stock string, treating `NaN` and infinities as unparseable.
pub fn parse_stock(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_defaults() {
        let item = InventoryItem::new("it-1", "Silver Ring").unwrap();
        assert_eq!(item.quantity, "0");
        assert_eq!(item.minimum_quantity, "0");
        assert_eq!(item.item_type, 0);
        assert!(!item.show_on_store);
        assert!(!item.excel_imported);
        assert_eq!(item.conversion_factor, 0.0);
        assert!(item.wholesale_price.is_none());
        assert!(item.sub_items.is_empty());
        assert!(item.index.is_none());
    }

    #[test]
    fn test_new_rejects_blank_identity() {
        assert!(InventoryItem::new("", "Ring").is_err());
        assert!(InventoryItem::new("it-1", "   ").is_err());
    }

    #[test]
    fn test_display_category_fallback() {
        let mut item = InventoryItem::new("it-1", "Ring").unwrap();
        item.category = "Jewellery".to_string();
        assert_eq!(item.display_category(), "Jewellery");

        item.category_name = "Ear Rings".to_string();
        assert_eq!(item.display_category(), "Ear Rings");
    }

    #[test]
    fn test_stock_level() {
        let mut item = InventoryItem::new("it-1", "Ring").unwrap();
        item.quantity = "12.5".to_string();
        assert_eq!(item.stock_level(), Some(12.5));

        item.quantity = "NaN".to_string();
        assert_eq!(item.stock_level(), None);

        item.quantity = "N/A".to_string();
        assert_eq!(item.stock_level(), None);
    }

    #[test]
    fn test_validate_rejects_zero_wholesale() {
        let mut item = InventoryItem::new("it-1", "Ring").unwrap();
        assert!(item.validate().is_ok());

        item.wholesale_price = Some(0.0);
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let mut item = InventoryItem::new("it-1", "Ring").unwrap();
        item.selling_price = -1.0;
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_with_index() {
        let item = InventoryItem::new("it-1", "Ring").unwrap().with_index(4);
        assert_eq!(item.index, Some(4));
    }
}
