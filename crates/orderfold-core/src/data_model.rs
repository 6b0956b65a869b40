//! Data Model: keys, catalog entries, normalized lines and reconciled orders
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Display value when an order spans more than one model
pub const MULTIPLE_MODELS: &str = "Multiple Models";
/// Display value when an order spans more than one color
pub const MIXED_COLORS: &str = "Mixed";
/// Display value when nothing could be resolved
pub const NOT_AVAILABLE: &str = "N/A";

/// Identifier as sent by the backend: sometimes a number, sometimes a string.
///
/// Integral numbers and integer-looking strings collapse to `Int` so that
/// `10` and `"10"` group together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKey {
    Int(i64),
    Text(String),
}

impl RecordKey {
    /// Read a key out of a JSON value; null, empty strings and non-scalars yield `None`
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(RecordKey::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Some(RecordKey::Text(u.to_string()))
                } else {
                    let f = n.as_f64()?;
                    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                        Some(RecordKey::Int(f as i64))
                    } else {
                        Some(RecordKey::Text(n.to_string()))
                    }
                }
            }
            Value::String(s) => Self::parse(s),
            _ => None,
        }
    }

    /// Parse a textual key
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<i64>() {
            Ok(i) => Some(RecordKey::Int(i)),
            Err(_) => Some(RecordKey::Text(trimmed.to_string())),
        }
    }
}

impl From<i64> for RecordKey {
    fn from(value: i64) -> Self {
        RecordKey::Int(value)
    }
}

impl From<&str> for RecordKey {
    fn from(value: &str) -> Self {
        RecordKey::parse(value).unwrap_or_else(|| RecordKey::Text(String::new()))
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Int(i) => write!(f, "{}", i),
            RecordKey::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for RecordKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RecordKey::Int(i) => serializer.serialize_i64(*i),
            RecordKey::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for RecordKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RecordKey::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid identifier: {}", value)))
    }
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A product model with its variants, as served by the catalog endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogModel {
    #[serde(alias = "model_id", alias = "ModelId", alias = "id")]
    pub model_id: RecordKey,
    #[serde(default, deserialize_with = "nullable_string")]
    #[serde(alias = "model_name", alias = "ModelName", alias = "name")]
    pub model_name: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    #[serde(alias = "Variants", alias = "modelVariants", alias = "model_variants")]
    pub variants: Vec<CatalogVariant>,
}

/// One sellable configuration of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogVariant {
    #[serde(alias = "variant_id", alias = "VariantId", alias = "id")]
    pub variant_id: RecordKey,
    #[serde(default, deserialize_with = "nullable_string")]
    #[serde(alias = "Color", alias = "colour")]
    pub color: String,
    #[serde(default, deserialize_with = "nullable_string")]
    #[serde(alias = "version_name", alias = "VersionName", alias = "version")]
    pub version_name: String,
}

impl CatalogModel {
    pub fn new(model_id: impl Into<RecordKey>, model_name: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            model_name: model_name.into(),
            variants: Vec::new(),
        }
    }

    pub fn with_variant(mut self, variant: CatalogVariant) -> Self {
        self.variants.push(variant);
        self
    }
}

impl CatalogVariant {
    pub fn new(
        variant_id: impl Into<RecordKey>,
        color: impl Into<String>,
        version_name: impl Into<String>,
    ) -> Self {
        Self {
            variant_id: variant_id.into(),
            color: color.into(),
            version_name: version_name.into(),
        }
    }
}

/// Per-line approval signal, also the final status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApprovalState {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalState {
    /// Map a `confirmation.agreement` string; anything unrecognized is pending
    pub fn from_agreement(agreement: Option<&str>) -> Self {
        match agreement.map(|a| a.trim().to_ascii_lowercase()).as_deref() {
            Some("agree") => ApprovalState::Approved,
            Some("disagree") | Some("reject") => ApprovalState::Rejected,
            _ => ApprovalState::Pending,
        }
    }
}

impl fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApprovalState::Pending => "Pending",
            ApprovalState::Approved => "Approved",
            ApprovalState::Rejected => "Rejected",
        };
        f.write_str(label)
    }
}

/// How a variant id was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Present on the record
    Direct,
    /// Inferred from a model that has exactly one variant
    SoleVariant,
    /// Guessed as the first of several variants
    FirstOfMany,
}

impl Confidence {
    pub fn is_low(&self) -> bool {
        matches!(self, Confidence::FirstOfMany)
    }
}

/// A resolved variant id together with how it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub variant_id: RecordKey,
    pub confidence: Confidence,
    /// Served from the serial memo rather than inferred on this call
    pub memoized: bool,
}

/// Insertion-ordered collection without duplicates.
///
/// Orders carry a handful of colors/models/prices, so a linear scan beats hashing
/// and keeps `f64` usable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Distinct<T> {
    items: Vec<T>,
}

impl<T: PartialEq> Distinct<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns `true` if the value was not present yet
    pub fn insert(&mut self, value: T) -> bool {
        if self.items.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The only member, if there is exactly one
    pub fn single(&self) -> Option<&T> {
        match self.items.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

impl<T: PartialEq> Default for Distinct<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a Distinct<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: PartialEq> FromIterator<T> for Distinct<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Distinct::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

/// One single-shape line derived from a raw record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedLine {
    pub order_id: RecordKey,
    pub model_id: Option<RecordKey>,
    pub variant_id: Option<RecordKey>,
    pub quantity: u64,
    pub unit_price: Option<f64>,
    pub color: String,
    pub model_name: String,
    pub approval_state: ApprovalState,
    pub created_at: Option<DateTime<Utc>>,
    /// Variant came from the first-of-many fallback
    pub low_confidence: bool,
}

impl NormalizedLine {
    /// A bare line with nothing but an order id
    pub fn new(order_id: impl Into<RecordKey>) -> Self {
        Self {
            order_id: order_id.into(),
            model_id: None,
            variant_id: None,
            quantity: 0,
            unit_price: None,
            color: String::new(),
            model_name: String::new(),
            approval_state: ApprovalState::Pending,
            created_at: None,
            low_confidence: false,
        }
    }
}

/// One row per logical order, ready for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledOrder {
    pub request_id: RecordKey,
    pub model_name: String,
    pub color: String,
    pub quantity: u64,
    pub price: Option<f64>,
    pub status: ApprovalState,
    pub created_at: Option<DateTime<Utc>>,
    /// At least one line's variant was guessed among several candidates
    #[serde(default)]
    pub low_confidence: bool,
    #[serde(default)]
    pub line_count: usize,
}
