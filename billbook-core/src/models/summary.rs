//! Inventory summary statistics.
//!
//! This module contains the aggregate view printed after a fetch:
//! - [`InventorySummary`] - Item count, categories, prices, stock value
//! - [`PriceStats`] - Selling price range and average
//! - [`CategoryCount`] - Items per category

use serde::Serialize;
use std::collections::HashMap;

use super::item::InventoryItem;

// ============================================================================
// Summary
// ============================================================================

/// Number of items sharing one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    /// Category label (may be empty for uncategorized items).
    pub category: String,
    /// Number of items.
    pub count: usize,
}

/// Selling price statistics over priced items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceStats {
    /// Lowest selling price.
    pub lowest: f64,
    /// Highest selling price.
    pub highest: f64,
    /// Mean selling price.
    pub average: f64,
}

/// Aggregate statistics for a set of inventory items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySummary {
    /// Number of items.
    pub total_items: usize,
    /// Items per category, largest first.
    pub categories: Vec<CategoryCount>,
    /// Price statistics; `None` when no item has a positive price.
    pub prices: Option<PriceStats>,
    /// Sum of quantity times selling price over items with numeric stock.
    pub total_value: f64,
}

impl InventorySummary {
    /// Computes the summary for the given items.
    pub fn from_items(items: &[InventoryItem]) -> Self {
        Self {
            total_items: items.len(),
            categories: category_counts(items),
            prices: price_stats(items),
            total_value: items
                .iter()
                .filter_map(|item| item.stock_level().map(|qty| qty * item.selling_price))
                .sum(),
        }
    }

    /// Returns true if the summary covers no items.
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }
}

fn category_counts(items: &[InventoryItem]) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(item.display_category()).or_default() += 1;
    }

    let mut categories: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    categories
}

#[allow(clippy::cast_precision_loss)]
fn price_stats(items: &[InventoryItem]) -> Option<PriceStats> {
    let prices: Vec<f64> = items
        .iter()
        .map(|item| item.selling_price)
        .filter(|price| *price > 0.0)
        .collect();

    if prices.is_empty() {
        return None;
    }

    let lowest = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let average = prices.iter().sum::<f64>() / prices.len() as f64;

    Some(PriceStats {
        lowest,
        highest,
        average,
    })
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

    #[test]
    fn test_empty_summary() {
        let summary = InventorySummary::from_items(&[]);
        assert!(summary.is_empty());
        assert!(summary.categories.is_empty());
        assert!(summary.prices.is_none());
        assert_eq!(summary.total_value, 0.0);
    }

    #[test]
    fn test_categories_sorted_by_count() {
        let items = vec![
            item("1", "Rings", 10.0, "1"),
            item("2", "Chains", 10.0, "1"),
            item("3", "Chains", 10.0, "1"),
            item("4", "Anklets", 10.0, "1"),
        ];
        let summary = InventorySummary::from_items(&items);
        assert_eq!(summary.categories[0].category, "Chains");
        assert_eq!(summary.categories[0].count, 2);
        // Ties break alphabetically
        assert_eq!(summary.categories[1].category, "Anklets");
        assert_eq!(summary.categories[2].category, "Rings");
    }

    #[test]
    fn test_price_stats_ignore_unpriced() {
        let items = vec![
            item("1", "A", 0.0, "1"),
            item("2", "A", 100.0, "1"),
            item("3", "A", 300.0, "1"),
        ];
        let prices = InventorySummary::from_items(&items).prices.unwrap();
        assert_eq!(prices.lowest, 100.0);
        assert_eq!(prices.highest, 300.0);
        assert_eq!(prices.average, 200.0);
    }

    #[test]
    fn test_total_value_skips_non_numeric_stock() {
        let items = vec![
            item("1", "A", 50.0, "2"),
            item("2", "A", 10.0, "NaN"),
            item("3", "A", 10.0, "1.5"),
        ];
        let summary = InventorySummary::from_items(&items);
        assert_eq!(summary.total_value, 115.0);
    }
}
