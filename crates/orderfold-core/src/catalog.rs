//! Catalog Index: lookup tables built once per reconciliation run.

use crate::data_model::{CatalogModel, RecordKey};
use std::collections::HashMap;

/// Read-only lookups over a set of catalog models
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    model_names: HashMap<RecordKey, String>,
    variant_colors: HashMap<RecordKey, String>,
    variant_display_names: HashMap<RecordKey, String>,
    model_variants: HashMap<RecordKey, Vec<RecordKey>>,
}

impl CatalogIndex {
    pub fn build(models: &[CatalogModel]) -> Self {
        let mut index = CatalogIndex::default();

        for model in models {
            index
                .model_names
                .insert(model.model_id.clone(), model.model_name.trim().to_string());

            let variant_ids = index.model_variants.entry(model.model_id.clone()).or_default();
            for variant in &model.variants {
                variant_ids.push(variant.variant_id.clone());
                index
                    .variant_colors
                    .insert(variant.variant_id.clone(), variant.color.trim().to_string());
                index.variant_display_names.insert(
                    variant.variant_id.clone(),
                    display_name(&model.model_name, &variant.version_name),
                );
            }
        }

        index
    }

    pub fn model_name(&self, model_id: &RecordKey) -> Option<&str> {
        non_empty(self.model_names.get(model_id))
    }

    pub fn variant_color(&self, variant_id: &RecordKey) -> Option<&str> {
        non_empty(self.variant_colors.get(variant_id))
    }

    /// `"{modelName} {versionName}"` for a variant
    pub fn variant_display_name(&self, variant_id: &RecordKey) -> Option<&str> {
        non_empty(self.variant_display_names.get(variant_id))
    }

    /// Variant ids of a model in catalog order; empty for unknown models
    pub fn variants_of(&self, model_id: &RecordKey) -> &[RecordKey] {
        self.model_variants
            .get(model_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn model_count(&self) -> usize {
        self.model_names.len()
    }

    pub fn variant_count(&self) -> usize {
        self.variant_colors.len()
    }
}

fn display_name(model_name: &str, version_name: &str) -> String {
    [model_name.trim(), version_name.trim()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}
