//! Collaborator seams: where records come from and where orders go.
//!
//! The engine never performs I/O itself. Callers fetch both inputs completely,
//! then reconcile.

use crate::data_model::{CatalogModel, ReconciledOrder};
use crate::engine::{Reconciler, Reconciliation};
use crate::error::{OrderfoldError, Result};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

/// Envelope fields REST endpoints wrap their payload in
const ENVELOPE_FIELDS: &[&str] = &["data", "items", "result"];

/// Supplies raw, untrusted order/request records
pub trait OrderSource {
    fn fetch_lines(&self) -> Result<Vec<Value>>;
}

/// Supplies the catalog the index is built from
pub trait CatalogSource {
    fn fetch_models(&self) -> Result<Vec<CatalogModel>>;
}

/// Consumes reconciled orders
pub trait Presenter {
    fn present(&mut self, orders: &[ReconciledOrder]) -> Result<()>;
}

impl OrderSource for Vec<Value> {
    fn fetch_lines(&self) -> Result<Vec<Value>> {
        Ok(self.clone())
    }
}

impl CatalogSource for Vec<CatalogModel> {
    fn fetch_models(&self) -> Result<Vec<CatalogModel>> {
        Ok(self.clone())
    }
}

/// Collects presented orders in memory
impl Presenter for Vec<ReconciledOrder> {
    fn present(&mut self, orders: &[ReconciledOrder]) -> Result<()> {
        self.extend_from_slice(orders);
        Ok(())
    }
}

/// A JSON file holding either a bare array or an envelope such as `{"data": [...]}`
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_array(&self) -> Result<Vec<Value>> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| OrderfoldError::Source(format!("{}: {}", self.path.display(), e)))?;
        let document: Value = serde_json::from_str(&raw)
            .map_err(|e| OrderfoldError::Source(format!("{}: {}", self.path.display(), e)))?;
        let items = unwrap_envelope(document).ok_or_else(|| {
            OrderfoldError::Source(format!("{}: expected a JSON array", self.path.display()))
        })?;
        debug!(path = %self.path.display(), items = items.len(), "loaded json source");
        Ok(items)
    }
}

fn unwrap_envelope(document: Value) -> Option<Vec<Value>> {
    match document {
        Value::Array(items) => Some(items),
        Value::Object(mut object) => ENVELOPE_FIELDS
            .iter()
            .find_map(|field| match object.remove(*field) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            }),
        _ => None,
    }
}

impl OrderSource for JsonFileSource {
    fn fetch_lines(&self) -> Result<Vec<Value>> {
        self.read_array()
    }
}

impl CatalogSource for JsonFileSource {
    fn fetch_models(&self) -> Result<Vec<CatalogModel>> {
        self.read_array()?
            .into_iter()
            .enumerate()
            .map(|(position, value)| {
                serde_json::from_value(value).map_err(|e| {
                    OrderfoldError::Source(format!(
                        "{}: catalog entry {}: {}",
                        self.path.display(),
                        position,
                        e
                    ))
                })
            })
            .collect()
    }
}

/// Fetch both inputs, then reconcile
pub fn reconcile_sources<O, C>(
    orders: &O,
    catalog: &C,
    reconciler: &Reconciler,
) -> Result<Reconciliation>
where
    O: OrderSource + ?Sized,
    C: CatalogSource + ?Sized,
{
    let records = orders.fetch_lines()?;
    let models = catalog.fetch_models()?;
    Ok(reconciler.run(&records, &models))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope() {
        assert_eq!(unwrap_envelope(json!([1, 2])), Some(vec![json!(1), json!(2)]));
        assert_eq!(unwrap_envelope(json!({"data": [1]})), Some(vec![json!(1)]));
        assert_eq!(unwrap_envelope(json!({"items": []})), Some(vec![]));
        assert_eq!(unwrap_envelope(json!({"data": {"nested": true}})), None);
        assert_eq!(unwrap_envelope(json!("text")), None);
    }

    #[test]
    fn test_in_memory_sources() {
        let records = vec![json!({"orderId": 1, "quantity": 2})];
        let catalog: Vec<CatalogModel> = Vec::new();

        let run = reconcile_sources(&records, &catalog, &Reconciler::default()).unwrap();
        assert_eq!(run.orders.len(), 1);

        let mut presented: Vec<ReconciledOrder> = Vec::new();
        presented.present(&run.orders).unwrap();
        assert_eq!(presented, run.orders);
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let source = JsonFileSource::new("/nonexistent/orders.json");
        let err = source.fetch_lines().unwrap_err();
        assert!(err.to_string().starts_with("SOURCE/"));
    }
}
