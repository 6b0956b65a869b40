//! Key Resolver: infers a missing variant id.
//!
//! Fallback chain, first hit wins:
//!
//! ```text
//! direct variantId → serial memo → sole variant of model → first variant of model
//! ```
//!
//! Inferences are memoized per serial so that every line of the same physical
//! unit resolves the same way, whichever shape it arrives in. Calls must follow
//! record-arrival order.

use crate::catalog::CatalogIndex;
use crate::config::AmbiguousVariantPolicy;
use crate::data_model::{Confidence, RecordKey, Resolution};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoEntry {
    variant_id: RecordKey,
    confidence: Confidence,
}

/// Run-scoped serial → variant cache
#[derive(Debug, Clone, Default)]
pub struct SerialVariantMemo {
    entries: HashMap<RecordKey, MemoEntry>,
}

impl SerialVariantMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, serial_id: &RecordKey) -> Option<&RecordKey> {
        self.entries.get(serial_id).map(|entry| &entry.variant_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct KeyResolver<'a> {
    index: &'a CatalogIndex,
    memo: &'a mut SerialVariantMemo,
    policy: AmbiguousVariantPolicy,
}

impl<'a> KeyResolver<'a> {
    pub fn new(
        index: &'a CatalogIndex,
        memo: &'a mut SerialVariantMemo,
        policy: AmbiguousVariantPolicy,
    ) -> Self {
        Self { index, memo, policy }
    }

    pub fn resolve(
        &mut self,
        serial_id: Option<&RecordKey>,
        model_id: Option<&RecordKey>,
        direct_variant_id: Option<&RecordKey>,
    ) -> Option<Resolution> {
        if let Some(variant_id) = direct_variant_id {
            return Some(Resolution {
                variant_id: variant_id.clone(),
                confidence: Confidence::Direct,
                memoized: false,
            });
        }

        if let Some(entry) = serial_id.and_then(|serial| self.memo.entries.get(serial)) {
            return Some(Resolution {
                variant_id: entry.variant_id.clone(),
                confidence: entry.confidence,
                memoized: true,
            });
        }

        let model_id = model_id?;
        let variants = self.index.variants_of(model_id);
        let (variant_id, confidence) = match variants {
            [] => return None,
            [only] => (only.clone(), Confidence::SoleVariant),
            [first, ..] => match self.policy {
                AmbiguousVariantPolicy::FirstVariant => {
                    debug!(
                        model_id = %model_id,
                        candidates = variants.len(),
                        variant_id = %first,
                        "ambiguous variant, falling back to first"
                    );
                    (first.clone(), Confidence::FirstOfMany)
                }
                AmbiguousVariantPolicy::Unresolved => return None,
            },
        };

        if let Some(serial) = serial_id {
            self.memo.entries.insert(
                serial.clone(),
                MemoEntry {
                    variant_id: variant_id.clone(),
                    confidence,
                },
            );
        }

        Some(Resolution {
            variant_id,
            confidence,
            memoized: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_model::{CatalogModel, CatalogVariant};

    fn index() -> CatalogIndex {
        CatalogIndex::build(&[
            CatalogModel::new(5, "Falcon").with_variant(CatalogVariant::new(99, "Red", "")),
            CatalogModel::new(6, "Heron")
                .with_variant(CatalogVariant::new(200, "Blue", ""))
                .with_variant(CatalogVariant::new(201, "Green", "")),
            CatalogModel::new(7, "Empty"),
        ])
    }

    fn key(value: &str) -> RecordKey {
        RecordKey::from(value)
    }

    #[test]
    fn test_direct_variant_skips_memo() {
        let index = index();
        let mut memo = SerialVariantMemo::new();
        let mut resolver = KeyResolver::new(&index, &mut memo, AmbiguousVariantPolicy::default());

        let resolution = resolver
            .resolve(Some(&key("SN1")), Some(&key("5")), Some(&key("42")))
            .unwrap();
        assert_eq!(resolution.variant_id, key("42"));
        assert_eq!(resolution.confidence, Confidence::Direct);
        assert!(memo.is_empty());
    }

    #[test]
    fn test_sole_variant_is_memoized() {
        let index = index();
        let mut memo = SerialVariantMemo::new();
        let mut resolver = KeyResolver::new(&index, &mut memo, AmbiguousVariantPolicy::default());

        let first = resolver.resolve(Some(&key("SN1")), Some(&key("5")), None).unwrap();
        assert_eq!(first.variant_id, key("99"));
        assert_eq!(first.confidence, Confidence::SoleVariant);
        assert!(!first.memoized);

        // Different model, same serial: memo wins
        let second = resolver.resolve(Some(&key("SN1")), Some(&key("6")), None).unwrap();
        assert_eq!(second.variant_id, key("99"));
        assert!(second.memoized);

        let third = resolver.resolve(Some(&key("SN1")), None, None).unwrap();
        assert_eq!(third.variant_id, key("99"));

        assert_eq!(memo.get(&key("SN1")), Some(&key("99")));
    }

    #[test]
    fn test_first_of_many_is_low_confidence() {
        let index = index();
        let mut memo = SerialVariantMemo::new();
        let mut resolver = KeyResolver::new(&index, &mut memo, AmbiguousVariantPolicy::default());

        let resolution = resolver.resolve(Some(&key("SN2")), Some(&key("6")), None).unwrap();
        assert_eq!(resolution.variant_id, key("200"));
        assert!(resolution.confidence.is_low());

        let again = resolver.resolve(Some(&key("SN2")), None, None).unwrap();
        assert!(again.confidence.is_low());
        assert!(again.memoized);
    }

    #[test]
    fn test_unresolved_policy() {
        let index = index();
        let mut memo = SerialVariantMemo::new();
        let mut resolver = KeyResolver::new(&index, &mut memo, AmbiguousVariantPolicy::Unresolved);

        assert_eq!(resolver.resolve(Some(&key("SN2")), Some(&key("6")), None), None);
        // Sole variants still resolve
        assert!(resolver.resolve(Some(&key("SN3")), Some(&key("5")), None).is_some());
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn test_unresolvable() {
        let index = index();
        let mut memo = SerialVariantMemo::new();
        let mut resolver = KeyResolver::new(&index, &mut memo, AmbiguousVariantPolicy::default());

        assert_eq!(resolver.resolve(Some(&key("SN4")), Some(&key("7")), None), None);
        assert_eq!(resolver.resolve(Some(&key("SN4")), None, None), None);
        assert_eq!(resolver.resolve(None, Some(&key("404")), None), None);
        assert!(memo.is_empty());
    }

    #[test]
    fn test_no_serial_infers_without_memo() {
        let index = index();
        let mut memo = SerialVariantMemo::new();
        let mut resolver = KeyResolver::new(&index, &mut memo, AmbiguousVariantPolicy::default());

        let resolution = resolver.resolve(None, Some(&key("5")), None).unwrap();
        assert_eq!(resolution.variant_id, key("99"));
        assert!(memo.is_empty());
    }
}
