//! Line Normalizer: one untrusted record → one single-shape line.
//!
//! Records arrive in three shapes, checked in this order:
//!
//! ```text
//! { ..., detail: {...} }               → the detail is the line
//! { ..., details: [{...}, {...}] }     → items folded into one line
//! { ..., quantity, unitPrice, ... }    → the record is its own detail
//! ```
//!
//! Every field is read from the detail first, then from catalog lookups, then
//! from the parent record.

use crate::catalog::CatalogIndex;
use crate::consensus;
use crate::data_model::{ApprovalState, Distinct, NormalizedLine, RecordKey, Resolution};
use crate::fields;
use crate::resolver::KeyResolver;
use serde_json::Value;

enum Shape<'a> {
    Single(&'a Value),
    Many(Vec<&'a Value>),
    Flat,
}

fn shape(record: &Value) -> Shape<'_> {
    if let Some(detail) = fields::object(record, fields::DETAIL) {
        return Shape::Single(detail);
    }
    if let Some(items) = fields::array(record, fields::DETAILS) {
        let items: Vec<&Value> = items.iter().filter(|item| item.is_object()).collect();
        if !items.is_empty() {
            return Shape::Many(items);
        }
    }
    // Some endpoints put a lone object under the array's name
    if let Some(detail) = fields::object(record, fields::DETAILS) {
        return Shape::Single(detail);
    }
    Shape::Flat
}

/// Values read from one detail item, before catalog and parent fallbacks
#[derive(Debug, Default)]
struct Item {
    model_id: Option<RecordKey>,
    resolution: Option<Resolution>,
    quantity: Option<u64>,
    unit_price: Option<f64>,
    color: Option<String>,
    model_name: Option<String>,
    approval: Option<ApprovalState>,
}

/// Identifiers fall back to the parent record; everything else stays item-local.
fn read_item(item: &Value, record: &Value, resolver: &mut KeyResolver<'_>) -> Item {
    let model_id = fields::key(item, fields::MODEL_ID).or_else(|| fields::key(record, fields::MODEL_ID));
    let serial_id =
        fields::key(item, fields::SERIAL_ID).or_else(|| fields::key(record, fields::SERIAL_ID));
    let direct_variant_id =
        fields::key(item, fields::VARIANT_ID).or_else(|| fields::key(record, fields::VARIANT_ID));

    let resolution = resolver.resolve(
        serial_id.as_ref(),
        model_id.as_ref(),
        direct_variant_id.as_ref(),
    );

    let agreement = fields::agreement(item).or_else(|| fields::agreement(record));

    Item {
        model_id,
        resolution,
        quantity: fields::quantity(item, fields::QUANTITY),
        unit_price: fields::number(item, fields::UNIT_PRICE),
        color: fields::text(item, fields::COLOR),
        model_name: fields::text(item, fields::MODEL_NAME),
        approval: Some(ApprovalState::from_agreement(agreement.as_deref())),
    }
}

/// Micro-fold over a details array. Quantities add up, identifiers and labels
/// keep the first value seen, a later higher positive price replaces the
/// current one, approvals go through consensus.
fn fold_items(items: &[&Value], record: &Value, resolver: &mut KeyResolver<'_>) -> Item {
    let mut acc = Item::default();
    let mut approvals = Distinct::new();

    for raw in items {
        let item = read_item(raw, record, resolver);

        if let Some(quantity) = item.quantity {
            acc.quantity = Some(acc.quantity.unwrap_or(0).saturating_add(quantity));
        }
        acc.unit_price = match (acc.unit_price, item.unit_price) {
            (None, price) => price,
            (Some(current), Some(price)) if price > 0.0 && price > current => Some(price),
            (current, _) => current,
        };
        // Model and variant come from the same item
        if acc.resolution.is_none() {
            if let Some(resolution) = item.resolution {
                acc.resolution = Some(resolution);
                acc.model_id = item.model_id;
            } else {
                acc.model_id = acc.model_id.or(item.model_id);
            }
        }
        acc.color = acc.color.or(item.color);
        acc.model_name = acc.model_name.or(item.model_name);
        if let Some(approval) = item.approval {
            approvals.insert(approval);
        }
    }

    acc.approval = Some(consensus::resolve(&approvals));
    acc
}

fn order_id(record: &Value, details: &[&Value]) -> Option<RecordKey> {
    fields::key(record, fields::ORDER_ID)
        .or_else(|| details.iter().find_map(|detail| fields::key(detail, fields::ORDER_ID)))
}

/// Normalize one raw record. Returns `None` when no order id can be found,
/// since such a record cannot be grouped.
pub fn normalize(
    record: &Value,
    index: &CatalogIndex,
    resolver: &mut KeyResolver<'_>,
) -> Option<NormalizedLine> {
    let shape = shape(record);
    let details: &[&Value] = match &shape {
        Shape::Single(detail) => std::slice::from_ref(detail),
        Shape::Many(items) => items.as_slice(),
        Shape::Flat => &[],
    };

    let order_id = order_id(record, details)?;

    let item = match &shape {
        Shape::Single(detail) => read_item(detail, record, resolver),
        Shape::Many(items) => fold_items(items, record, resolver),
        Shape::Flat => read_item(record, record, resolver),
    };

    let variant_id = item.resolution.as_ref().map(|r| r.variant_id.clone());
    let low_confidence = item
        .resolution
        .as_ref()
        .is_some_and(|r| r.confidence.is_low());

    let color = item
        .color
        .or_else(|| {
            variant_id
                .as_ref()
                .and_then(|v| index.variant_color(v))
                .map(str::to_string)
        })
        .or_else(|| fields::text(record, fields::COLOR))
        .unwrap_or_default();

    let model_name = item
        .model_name
        .or_else(|| {
            variant_id
                .as_ref()
                .and_then(|v| index.variant_display_name(v))
                .or_else(|| item.model_id.as_ref().and_then(|m| index.model_name(m)))
                .map(str::to_string)
        })
        .or_else(|| fields::text(record, fields::MODEL_NAME))
        .unwrap_or_default();

    let created_at = fields::date(record, fields::CREATED_AT)
        .or_else(|| details.iter().find_map(|detail| fields::date(detail, fields::CREATED_AT)));

    Some(NormalizedLine {
        order_id,
        model_id: item.model_id,
        variant_id,
        quantity: item
            .quantity
            .or_else(|| fields::quantity(record, fields::QUANTITY))
            .unwrap_or(0),
        unit_price: item
            .unit_price
            .or_else(|| fields::number(record, fields::UNIT_PRICE)),
        color,
        model_name,
        approval_state: item.approval.unwrap_or(ApprovalState::Pending),
        created_at,
        low_confidence,
    })
}
