//! Order Aggregator: folds normalized lines into one group per order id.

use crate::data_model::{ApprovalState, Distinct, NormalizedLine, RecordKey};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Running accumulator for one order
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateGroup {
    pub order_id: RecordKey,
    pub quantity: u64,
    pub colors: Distinct<String>,
    pub models: Distinct<String>,
    pub prices: Distinct<f64>,
    pub confirmations: Distinct<ApprovalState>,
    /// Earliest date seen across the order's lines
    pub created_at: Option<DateTime<Utc>>,
    pub low_confidence: bool,
    pub line_count: usize,
}

impl AggregateGroup {
    fn empty(order_id: RecordKey) -> Self {
        Self {
            order_id,
            quantity: 0,
            colors: Distinct::new(),
            models: Distinct::new(),
            prices: Distinct::new(),
            confirmations: Distinct::new(),
            created_at: None,
            low_confidence: false,
            line_count: 0,
        }
    }

    fn absorb(&mut self, line: &NormalizedLine) {
        self.quantity = self.quantity.saturating_add(line.quantity);
        if !line.color.is_empty() {
            self.colors.insert(line.color.clone());
        }
        if !line.model_name.is_empty() {
            self.models.insert(line.model_name.clone());
        }
        if let Some(price) = line.unit_price {
            self.prices.insert(price);
        }
        self.confirmations.insert(line.approval_state);
        self.created_at = match (self.created_at, line.created_at) {
            (Some(current), Some(candidate)) => Some(current.min(candidate)),
            (current, candidate) => current.or(candidate),
        };
        self.low_confidence |= line.low_confidence;
        self.line_count += 1;
    }
}

/// Fold one line into its order's group, creating the group on first sight.
pub fn fold(group: Option<AggregateGroup>, line: &NormalizedLine) -> AggregateGroup {
    let mut group = group.unwrap_or_else(|| AggregateGroup::empty(line.order_id.clone()));
    group.absorb(line);
    group
}

/// Groups keyed by order id, kept in first-seen order
#[derive(Debug, Default)]
pub struct OrderAggregator {
    groups: Vec<AggregateGroup>,
    positions: HashMap<RecordKey, usize>,
}

impl OrderAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: &NormalizedLine) {
        match self.positions.get(&line.order_id) {
            Some(&position) => self.groups[position].absorb(line),
            None => {
                self.positions.insert(line.order_id.clone(), self.groups.len());
                self.groups.push(fold(None, line));
            }
        }
    }

    pub fn get(&self, order_id: &RecordKey) -> Option<&AggregateGroup> {
        self.positions.get(order_id).map(|&position| &self.groups[position])
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_groups(self) -> Vec<AggregateGroup> {
        self.groups
    }
}
