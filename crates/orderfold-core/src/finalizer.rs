//! Finalizer: aggregate groups → reconciled orders.
//!
//! Never fails; missing or conflicting data degrades to a sentinel.

use crate::aggregator::AggregateGroup;
use crate::consensus;
use crate::data_model::{Distinct, ReconciledOrder, MIXED_COLORS, MULTIPLE_MODELS, NOT_AVAILABLE};

fn label(values: &Distinct<String>, several: &str) -> String {
    match values.len() {
        0 => NOT_AVAILABLE.to_string(),
        1 => values.iter().next().cloned().unwrap_or_default(),
        _ => several.to_string(),
    }
}

pub fn finalize(group: AggregateGroup) -> ReconciledOrder {
    ReconciledOrder {
        model_name: label(&group.models, MULTIPLE_MODELS),
        color: label(&group.colors, MIXED_COLORS),
        price: group.prices.single().copied(),
        status: consensus::resolve(&group.confirmations),
        quantity: group.quantity,
        created_at: group.created_at,
        low_confidence: group.low_confidence,
        line_count: group.line_count,
        request_id: group.order_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::fold;
    use crate::data_model::{ApprovalState, NormalizedLine, RecordKey};

    fn group(lines: &[NormalizedLine]) -> AggregateGroup {
        lines
            .iter()
            .fold(None, |group, line| Some(fold(group, line)))
            .unwrap()
    }

    fn line(model: &str, color: &str, price: Option<f64>) -> NormalizedLine {
        let mut line = NormalizedLine::new(12);
        line.quantity = 1;
        line.model_name = model.to_string();
        line.color = color.to_string();
        line.unit_price = price;
        line
    }

    #[test]
    fn test_single_values_pass_through() {
        let order = finalize(group(&[
            line("Falcon GT", "Red", Some(100.0)),
            line("Falcon GT", "Red", Some(100.0)),
        ]));

        assert_eq!(order.request_id, RecordKey::Int(12));
        assert_eq!(order.model_name, "Falcon GT");
        assert_eq!(order.color, "Red");
        assert_eq!(order.price, Some(100.0));
        assert_eq!(order.quantity, 2);
        assert_eq!(order.line_count, 2);
    }

    #[test]
    fn test_multiple_values_use_sentinels() {
        let order = finalize(group(&[
            line("Falcon GT", "Red", Some(100.0)),
            line("Heron", "Blue", Some(150.0)),
        ]));

        assert_eq!(order.model_name, "Multiple Models");
        assert_eq!(order.color, "Mixed");
        assert_eq!(order.price, None);
    }

    #[test]
    fn test_missing_values_use_not_available() {
        let order = finalize(group(&[line("", "", None)]));

        assert_eq!(order.model_name, "N/A");
        assert_eq!(order.color, "N/A");
        assert_eq!(order.price, None);
        assert_eq!(order.status, ApprovalState::Pending);
        assert_eq!(order.created_at, None);
    }

    #[test]
    fn test_price_ignores_lines_without_price() {
        let order = finalize(group(&[
            line("Falcon GT", "Red", Some(100.0)),
            line("Falcon GT", "Red", None),
        ]));
        assert_eq!(order.price, Some(100.0));
    }
}
