//! Field lookup over untrusted records.
//!
//! The backend spells the same field several ways (camelCase, snake_case,
//! PascalCase). Each field is a prioritized list of spellings evaluated left to
//! right; the first usable value wins.

use crate::data_model::RecordKey;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

pub const ORDER_ID: &[&str] = &["orderId", "order_id", "OrderId", "OrderID"];
pub const MODEL_ID: &[&str] = &["modelId", "model_id", "ModelId", "ModelID"];
pub const VARIANT_ID: &[&str] = &["variantId", "variant_id", "VariantId", "VariantID"];
pub const SERIAL_ID: &[&str] = &[
    "serialId",
    "serial_id",
    "SerialId",
    "serialNumber",
    "serial_number",
    "SerialNumber",
];
pub const QUANTITY: &[&str] = &["quantity", "Quantity", "qty"];
pub const UNIT_PRICE: &[&str] = &["unitPrice", "unit_price", "UnitPrice", "price", "Price"];
pub const COLOR: &[&str] = &["color", "Color", "colour"];
pub const MODEL_NAME: &[&str] = &["modelName", "model_name", "ModelName"];
pub const CREATED_AT: &[&str] = &[
    "createdAt",
    "created_at",
    "CreatedAt",
    "orderDate",
    "order_date",
    "OrderDate",
    "date",
];
pub const DETAIL: &[&str] = &["detail", "Detail"];
pub const DETAILS: &[&str] = &[
    "details",
    "Details",
    "orderDetails",
    "order_details",
    "OrderDetails",
    "orderDetail",
    "order_detail",
    "OrderDetail",
];
pub const CONFIRMATION: &[&str] = &["confirmation", "Confirmation"];
pub const AGREEMENT: &[&str] = &["agreement", "Agreement"];

/// First spelling that yields a mapped value
fn first_map<'a, T>(
    record: &'a Value,
    names: &[&str],
    map: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    let object = record.as_object()?;
    names
        .iter()
        .filter_map(|name| object.get(*name))
        .find_map(map)
}

pub fn key(record: &Value, names: &[&str]) -> Option<RecordKey> {
    first_map(record, names, RecordKey::from_value)
}

pub fn text(record: &Value, names: &[&str]) -> Option<String> {
    first_map(record, names, |value| match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

/// Non-negative integer count. Negative values clamp to zero, fractions truncate.
pub fn quantity(record: &Value, names: &[&str]) -> Option<u64> {
    first_map(record, names, |value| {
        let raw = match value {
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    return Some(u);
                }
                n.as_f64()?
            }
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        if !raw.is_finite() {
            return None;
        }
        Some(if raw <= 0.0 { 0 } else { raw.trunc() as u64 })
    })
}

pub fn number(record: &Value, names: &[&str]) -> Option<f64> {
    first_map(record, names, |value| {
        let raw = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        raw.is_finite().then_some(raw)
    })
}

pub fn date(record: &Value, names: &[&str]) -> Option<DateTime<Utc>> {
    first_map(record, names, |value| match value {
        Value::String(s) => parse_date(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    })
}

/// `confirmation.agreement`, falling back to a flattened `agreement`
pub fn agreement(record: &Value) -> Option<String> {
    let nested = CONFIRMATION.iter().find_map(|name| {
        let confirmation = record.get(*name)?;
        text(confirmation, AGREEMENT)
    });
    nested.or_else(|| text(record, AGREEMENT))
}

/// Object stored under the first matching spelling
pub fn object<'a>(record: &'a Value, names: &[&str]) -> Option<&'a Value> {
    first_map(record, names, |value| value.is_object().then_some(value))
}

/// Array stored under the first matching spelling
pub fn array<'a>(record: &'a Value, names: &[&str]) -> Option<&'a Vec<Value>> {
    first_map(record, names, Value::as_array)
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
