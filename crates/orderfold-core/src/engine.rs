//! Engine: chains the reconciliation passes and reports on the run.
//!
//! ```text
//! catalog → CatalogIndex
//! records → normalize (+ KeyResolver memo) → OrderAggregator → finalize → orders
//! ```
use crate::aggregator::OrderAggregator;
use crate::catalog::CatalogIndex;
use crate::config::ReconcileConfig;
use crate::data_model::{CatalogModel, ReconciledOrder};
use crate::error::Result;
use crate::finalizer::finalize;
use crate::normalizer::normalize;
use crate::resolver::{KeyResolver, SerialVariantMemo};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, info_span};
use uuid::Uuid;

/// Counters for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub run_id: String,
    pub scope: String,
    pub records_seen: usize,
    /// Records dropped for lack of an order id
    pub records_skipped: usize,
    pub lines_normalized: usize,
    pub low_confidence_lines: usize,
    pub orders: usize,
    pub elapsed_ms: u64,
}

/// Output of a run
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub orders: Vec<ReconciledOrder>,
    pub report: ReconcileReport,
}

impl Reconciliation {
    /// `blake3:<hex>` over the serialized orders; identical inputs give identical fingerprints
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(&self.orders)?;
        Ok(format!("blake3:{}", blake3::hash(&bytes)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: ReconcileConfig,
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Reconcile raw records against a fully loaded catalog.
    ///
    /// Records are processed in the order given; the serial memo lives and dies
    /// with this call.
    pub fn run(&self, records: &[Value], catalog: &[CatalogModel]) -> Reconciliation {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("reconcile", run_id = %run_id, scope = %self.config.scope);
        let _guard = span.enter();
        let start = Instant::now();

        let index = CatalogIndex::build(catalog);
        let mut memo = SerialVariantMemo::new();
        let mut resolver = KeyResolver::new(&index, &mut memo, self.config.ambiguous_variants);
        let mut aggregator = OrderAggregator::new();

        let mut records_skipped = 0;
        let mut lines_normalized = 0;
        let mut low_confidence_lines = 0;

        for (position, record) in records.iter().enumerate() {
            match normalize(record, &index, &mut resolver) {
                Some(line) => {
                    lines_normalized += 1;
                    if line.low_confidence {
                        low_confidence_lines += 1;
                    }
                    aggregator.push(&line);
                }
                None => {
                    records_skipped += 1;
                    debug!(position, "record has no order id, skipping");
                }
            }
        }

        let orders: Vec<ReconciledOrder> =
            aggregator.into_groups().into_iter().map(finalize).collect();

        let report = ReconcileReport {
            run_id,
            scope: self.config.scope.to_string(),
            records_seen: records.len(),
            records_skipped,
            lines_normalized,
            low_confidence_lines,
            orders: orders.len(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            records = report.records_seen,
            skipped = report.records_skipped,
            low_confidence = report.low_confidence_lines,
            orders = report.orders,
            catalog_models = index.model_count(),
            serials_memoized = memo.len(),
            "reconciliation complete"
        );

        Reconciliation { orders, report }
    }
}

/// Reconcile with default settings
pub fn reconcile(records: &[Value], catalog: &[CatalogModel]) -> Vec<ReconciledOrder> {
    Reconciler::default().run(records, catalog).orders
}
