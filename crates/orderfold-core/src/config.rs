//! Reconciliation settings.
//!
//! Defaults reproduce the console's historical behavior; a YAML file can
//! override them.

use crate::error::{OrderfoldError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// What to do when a model has several variants and nothing pins the serial down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguousVariantPolicy {
    /// Take the model's first variant and flag the line as low confidence
    #[default]
    FirstVariant,
    /// Leave the variant unresolved
    Unresolved,
}

/// Which listing the records come from; only used for logs and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    #[default]
    ManufacturerRequests,
    Installments,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::ManufacturerRequests => f.write_str("manufacturer_requests"),
            Scope::Installments => f.write_str("installments"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReconcileConfig {
    pub ambiguous_variants: AmbiguousVariantPolicy,
    pub scope: Scope,
}

impl ReconcileConfig {
    /// Load config from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| OrderfoldError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&yaml)
    }

    pub fn with_ambiguous_variants(mut self, policy: AmbiguousVariantPolicy) -> Self {
        self.ambiguous_variants = policy;
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }
}
