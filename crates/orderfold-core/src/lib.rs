//! orderfold: order/request reconciliation
//!
//! Turns flat, denormalized order lines from a backend without canonical
//! foreign keys into one entity per logical order.
//!
//! # Pipeline
//!
//! ```text
//! CatalogModel[] → CatalogIndex ─────────────┐
//!                                             ↓
//! RawLine[] → normalize (KeyResolver memo) → OrderAggregator → finalize → ReconciledOrder[]
//!                                                                ↑
//!                                                         consensus vote
//! ```
//!
//! # Example
//!
//! ```
//! use orderfold_core::{reconcile, ApprovalState, CatalogModel, CatalogVariant};
//! use serde_json::json;
//!
//! let catalog = vec![
//!     CatalogModel::new(5, "Falcon").with_variant(CatalogVariant::new(99, "Red", "GT")),
//! ];
//! let records = vec![
//!     json!({"orderId": 10, "detail": {"quantity": 2, "modelId": 5, "serialId": "SN1",
//!            "confirmation": {"agreement": "agree"}}}),
//!     json!({"orderId": 10, "detail": {"quantity": 3, "serialId": "SN1",
//!            "confirmation": {"agreement": "agree"}}}),
//! ];
//!
//! let orders = reconcile(&records, &catalog);
//! assert_eq!(orders.len(), 1);
//! assert_eq!(orders[0].quantity, 5);
//! assert_eq!(orders[0].color, "Red");
//! assert_eq!(orders[0].model_name, "Falcon GT");
//! assert_eq!(orders[0].status, ApprovalState::Approved);
//! ```

pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod consensus;
pub mod data_model;
pub mod engine;
pub mod error;
pub mod fields;
pub mod finalizer;
pub mod normalizer;
pub mod resolver;
pub mod sources;

pub use aggregator::{fold, AggregateGroup, OrderAggregator};
pub use catalog::CatalogIndex;
pub use config::{AmbiguousVariantPolicy, ReconcileConfig, Scope};
pub use data_model::{
    ApprovalState, CatalogModel, CatalogVariant, Confidence, Distinct, NormalizedLine,
    ReconciledOrder, RecordKey, Resolution, MIXED_COLORS, MULTIPLE_MODELS, NOT_AVAILABLE,
};
pub use engine::{reconcile, ReconcileReport, Reconciler, Reconciliation};
pub use error::OrderfoldError;
pub use finalizer::finalize;
pub use normalizer::normalize;
pub use resolver::{KeyResolver, SerialVariantMemo};
pub use sources::{reconcile_sources, CatalogSource, JsonFileSource, OrderSource, Presenter};

/// Engine version
pub const ORDERFOLD_VERSION: &str = "1.0.0";
