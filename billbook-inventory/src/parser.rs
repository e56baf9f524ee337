//! Raw item record normalization.
//!
//! The listing API is loosely typed: numbers arrive as numbers or strings,
//! nested objects may be missing or null, and several fields have fallbacks.
//! Each rule lives in its own small function so it can be tested alone;
//! [`map_item`] composes them.

use billbook_core::InventoryItem;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::MappingFault;

type Record = Map<String, Value>;

// ============================================================================
// Field Rules
// ============================================================================

/// Looks up `outer.inner`, treating a missing or non-object `outer` as
/// absent.
fn nested<'a>(record: &'a Record, outer: &str, inner: &str) -> Option<&'a Value> {
    record.get(outer)?.as_object()?.get(inner)
}

/// Free text. Numbers are rendered; null and anything else become empty.
pub fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Required identity text.
///
/// # Errors
///
/// Returns [`MappingFault::MissingField`] if the value is absent or blank.
pub fn required_text(value: Option<&Value>, field: &'static str) -> Result<String, MappingFault> {
    let text = text(value);
    if text.trim().is_empty() {
        return Err(MappingFault::MissingField(field));
    }
    Ok(text)
}

/// Non-negative amount; absent, null, or empty string is 0.
///
/// # Errors
///
/// Returns [`MappingFault::InvalidNumber`] for values that are not numbers
/// and [`MappingFault::NegativeAmount`] for negative ones.
pub fn amount(value: Option<&Value>, field: &'static str) -> Result<f64, MappingFault> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    let number = parsed.filter(|n| n.is_finite()).ok_or_else(|| MappingFault::InvalidNumber {
        field,
        value: value.map(ToString::to_string).unwrap_or_default(),
    })?;

    if number < 0.0 {
        return Err(MappingFault::NegativeAmount {
            field,
            value: number,
        });
    }
    Ok(number)
}

/// Wholesale price from the nested wholesale record: `Some` only when the
/// price is positive.
///
/// # Errors
///
/// Propagates [`amount`] faults for malformed prices.
pub fn wholesale_price(value: Option<&Value>) -> Result<Option<f64>, MappingFault> {
    let price = amount(value, "wholesale_info.price_per_unit")?;
    Ok((price > 0.0).then_some(price))
}

/// Lenient optional number: anything that is not numeric becomes `None`.
pub fn optional_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Stock level as text. Absent or null is `"0"`; numbers are rendered and
/// strings (including sentinels like `"NaN"`) are kept verbatim.
pub fn stock_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "0".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Boolean flag; absent or null is false.
pub fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    }
}

/// Both category fields come from the upstream category name.
pub fn category_name(record: &Record) -> String {
    text(record.get("item_category_name"))
}

/// Long unit name, falling back to the short unit when absent or blank.
pub fn unit_long(record: &Record, unit: &str) -> String {
    let long = text(nested(record, "units", "primary_unit"));
    if long.trim().is_empty() {
        unit.to_string()
    } else {
        long
    }
}

/// Custom fields; a lone value is wrapped, null or absent is empty.
pub fn additional_fields(value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(values)) => values.clone(),
        Some(other) => vec![other.clone()],
    }
}

/// Identifier of a raw record for diagnostics.
pub fn raw_id(raw: &Value) -> String {
    let id = text(raw.get("id"));
    if id.is_empty() {
        "unknown".to_string()
    } else {
        id
    }
}

// ============================================================================
// Item Mapping
// ============================================================================

/// Normalizes one raw listing record into an [`InventoryItem`].
///
/// # Errors
///
/// Returns a [`MappingFault`] if the record is not an object, lacks an id
/// or name, or carries a malformed or negative amount.
pub fn map_item(raw: &Value) -> Result<InventoryItem, MappingFault> {
    let record = raw.as_object().ok_or(MappingFault::NotAnObject)?;

    let id = required_text(record.get("id"), "id")?;
    let name = required_text(record.get("name"), "name")?;
    let mut item = InventoryItem::new(id, name)?;

    item.sku_code = text(record.get("sku_code"));
    item.identification_code = text(record.get("identification_code"));

    let category = category_name(record);
    item.category.clone_from(&category);
    item.category_name = category;
    item.item_category_id = text(record.get("item_category_id"));

    item.mrp = amount(record.get("mrp"), "mrp")?;
    item.selling_price = amount(record.get("selling_price"), "selling_price")?;
    item.sales_price = amount(
        nested(record, "sales_info", "price_per_unit"),
        "sales_info.price_per_unit",
    )?;
    item.purchase_price = amount(record.get("purchase_price"), "purchase_price")?;
    item.wholesale_price = wholesale_price(nested(record, "wholesale_info", "price_per_unit"))?;
    item.wholesale_min_quantity = optional_number(record.get("wholesale_min_quantity"));

    item.quantity = stock_string(record.get("quantity"));
    item.minimum_quantity = stock_string(record.get("minimum_quantity"));
    item.unit = text(record.get("unit"));
    item.unit_long = unit_long(record, &item.unit);

    item.gst_percentage = amount(record.get("gst_percentage"), "gst_percentage")?;
    item.sales_tax_included = flag(record.get("is_tax_included"));
    item.purchase_tax_included = flag(nested(record, "purchase_info", "is_tax_included"));

    item.description = text(record.get("description"));
    item.created_at = text(record.get("created_at"));
    item.additional_fields = additional_fields(record.get("additional_fields"));

    item.validate()?;
    trace!(id = %item.id, "Mapped item");
    Ok(item)
}

// ============================================================================
// Tests
// ============================================================================
