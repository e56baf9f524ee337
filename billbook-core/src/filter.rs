//! Post-fetch filtering.
//!
//! Filters are an ordered conjunction: category, minimum stock, maximum
//! stock, minimum price, maximum price. Each supplied criterion narrows the
//! working set left by the previous one; omitted criteria do nothing.
//! Filtering never mutates items and always starts from the set it is given.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::models::InventoryItem;

// ============================================================================
// Criteria
// ============================================================================

/// Optional predicates applied to a fetched inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the item's category.
    #[serde(default)]
    pub category: Option<String>,
    /// Inclusive lower bound on quantity.
    #[serde(default)]
    pub min_stock: Option<f64>,
    /// Inclusive upper bound on quantity.
    #[serde(default)]
    pub max_stock: Option<f64>,
    /// Inclusive lower bound on selling price.
    #[serde(default)]
    pub min_price: Option<f64>,
    /// Inclusive upper bound on selling price.
    #[serde(default)]
    pub max_price: Option<f64>,
}

impl FilterCriteria {
    /// Creates empty criteria (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the category substring.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the inclusive stock range. Either side may be open.
    #[must_use]
    pub fn with_stock_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_stock = min;
        self.max_stock = max;
        self
    }

    /// Sets the inclusive selling price range. Either side may be open.
    #[must_use]
    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Returns true if no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.min_stock.is_none()
            && self.max_stock.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// Rejects bounds that are not finite or ranges that are inverted.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidFilter`] naming the offending bound.
    pub fn validate(&self) -> Result<(), CoreError> {
        let bounds = [
            ("min_stock", self.min_stock),
            ("max_stock", self.max_stock),
            ("min_price", self.min_price),
            ("max_price", self.max_price),
        ];
        for (name, bound) in bounds {
            if bound.is_some_and(|value| !value.is_finite()) {
                return Err(CoreError::InvalidFilter(format!("{name} must be a finite number")));
            }
        }

        if let (Some(min), Some(max)) = (self.min_stock, self.max_stock) {
            if min > max {
                return Err(CoreError::InvalidFilter(format!(
                    "min_stock ({min}) is greater than max_stock ({max})"
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(CoreError::InvalidFilter(format!(
                    "min_price ({min}) is greater than max_price ({max})"
                )));
            }
        }

        Ok(())
    }

    /// The supplied criteria as stages, in application order.
    fn stages(&self) -> Vec<Stage> {
        let mut stages = Vec::new();
        if let Some(category) = &self.category {
            stages.push(Stage::Category(category.to_lowercase()));
        }
        if let Some(min) = self.min_stock {
            stages.push(Stage::MinStock(min));
        }
        if let Some(max) = self.max_stock {
            stages.push(Stage::MaxStock(max));
        }
        if let Some(min) = self.min_price {
            stages.push(Stage::MinPrice(min));
        }
        if let Some(max) = self.max_price {
            stages.push(Stage::MaxPrice(max));
        }
        stages
    }
}

// ============================================================================
// Stages
// ============================================================================

/// One narrowing step.
#[derive(Debug, Clone)]
enum Stage {
    /// Lowercased needle.
    Category(String),
    MinStock(f64),
    MaxStock(f64),
    MinPrice(f64),
    MaxPrice(f64),
}

impl Stage {
    fn admits(&self, item: &InventoryItem) -> bool {
        match self {
            Self::Category(needle) => item.display_category().to_lowercase().contains(needle),
            // Non-numeric stock never satisfies a stock bound.
            Self::MinStock(min) => item.stock_level().is_some_and(|qty| qty >= *min),
            Self::MaxStock(max) => item.stock_level().is_some_and(|qty| qty <= *max),
            Self::MinPrice(min) => item.selling_price >= *min,
            Self::MaxPrice(max) => item.selling_price <= *max,
        }
    }
}

// ============================================================================
// Filtering
// ============================================================================

/// Applies `criteria` to `all_items`, returning the matching items in their
/// original order.
pub fn apply_filters(all_items: &[InventoryItem], criteria: &FilterCriteria) -> Vec<InventoryItem> {
    let mut working: Vec<&InventoryItem> = all_items.iter().collect();

    for stage in criteria.stages() {
        let before = working.len();
        working.retain(|item| stage.admits(item));
        debug!(stage = ?stage, before, after = working.len(), "Applied filter stage");
    }

    working.into_iter().cloned().collect()
}

// ============================================================================
// Inventory Set
// ============================================================================

/// The full set of items from one fetch.
///
/// Every call to [`InventorySet::filtered`] starts from the complete set, so
/// successive filters never compound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySet {
    items: Vec<InventoryItem>,
}

impl InventorySet {
    /// Wraps a fetched item list.
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    /// All fetched items.
    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    /// Number of fetched items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing was fetched.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items matching `criteria`, derived from the full set.
    pub fn filtered(&self, criteria: &FilterCriteria) -> Vec<InventoryItem> {
        apply_filters(&self.items, criteria)
    }

    /// Consumes the set, returning the items.
    pub fn into_items(self) -> Vec<InventoryItem> {
        self.items
    }
}

impl From<Vec<InventoryItem>> for InventorySet {
    fn from(items: Vec<InventoryItem>) -> Self {
        Self::new(items)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: &str, price: f64, qty: &str) -> InventoryItem {
        let mut item = InventoryItem::new(id, format!("Item {id}")).unwrap();
        item.category = category.to_string();
        item.category_name = category.to_string();
        item.selling_price = price;
        item.quantity = qty.to_string();
        item
    }

    fn ids(items: &[InventoryItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_empty_criteria_returns_everything() {
        let items = vec![item("1", "A", 1.0, "1"), item("2", "B", 2.0, "2")];
        let criteria = FilterCriteria::new();
        assert!(criteria.is_empty());
        assert_eq!(apply_filters(&items, &criteria), items);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let items = vec![
            item("1", "A", 100.0, "1"),
            item("2", "A", 150.0, "1"),
            item("3", "A", 200.0, "1"),
            item("4", "A", 201.0, "1"),
        ];
        let criteria = FilterCriteria::new().with_price_range(Some(100.0), Some(200.0));
        assert_eq!(ids(&apply_filters(&items, &criteria)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_category_is_case_insensitive_substring() {
        let items = vec![
            item("1", "Ear Rings", 1.0, "1"),
            item("2", "Nose Pins", 1.0, "1"),
            item("3", "Finger Rings", 1.0, "1"),
        ];
        let criteria = FilterCriteria::new().with_category("rings");
        assert_eq!(ids(&apply_filters(&items, &criteria)), vec!["1", "3"]);
    }

    #[test]
    fn test_category_falls_back_to_category_field() {
        let mut only_category = item("1", "", 1.0, "1");
        only_category.category = "Bangles".to_string();
        let criteria = FilterCriteria::new().with_category("BANGLE");
        assert_eq!(apply_filters(&[only_category], &criteria).len(), 1);
    }

    #[test]
    fn test_non_numeric_stock_excluded_by_bounds() {
        let items = vec![item("1", "A", 1.0, "5"), item("2", "A", 1.0, "NaN")];

        let min = FilterCriteria::new().with_stock_range(Some(0.0), None);
        assert_eq!(ids(&apply_filters(&items, &min)), vec!["1"]);

        let max = FilterCriteria::new().with_stock_range(None, Some(100.0));
        assert_eq!(ids(&apply_filters(&items, &max)), vec!["1"]);
    }

    #[test]
    fn test_conjunction_preserves_order() {
        let items = vec![
            item("1", "Rings", 120.0, "10"),
            item("2", "Chains", 150.0, "10"),
            item("3", "Rings", 80.0, "10"),
            item("4", "Rings", 180.0, "0"),
            item("5", "Rings", 110.0, "3"),
        ];
        let criteria = FilterCriteria::new()
            .with_category("ring")
            .with_stock_range(Some(1.0), None)
            .with_price_range(Some(100.0), None);
        assert_eq!(ids(&apply_filters(&items, &criteria)), vec!["1", "5"]);
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let criteria = FilterCriteria::new().with_price_range(Some(10.0), Some(5.0));
        assert!(criteria.validate().is_err());

        let criteria = FilterCriteria::new().with_stock_range(Some(f64::NAN), None);
        assert!(criteria.validate().is_err());

        let criteria = FilterCriteria::new().with_stock_range(Some(1.0), Some(1.0));
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_inventory_set_never_compounds() {
        let set = InventorySet::new(vec![
            item("1", "Rings", 50.0, "1"),
            item("2", "Chains", 150.0, "1"),
        ]);

        let rings = set.filtered(&FilterCriteria::new().with_category("rings"));
        assert_eq!(ids(&rings), vec!["1"]);

        let chains = set.filtered(&FilterCriteria::new().with_category("chains"));
        assert_eq!(ids(&chains), vec!["2"]);
        assert_eq!(set.len(), 2);
    }
}
