use std::{cmp::Ordering, collections::BTreeMap};

use serde::{Deserialize, Serialize};

use crate::features::{FeatureKey, FeatureSchema};

/// Feature key to value; `None` is a key that was submitted without a value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    values: BTreeMap<FeatureKey, Option<f64>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordDocument {
    Single(FeatureRecord),
    Batch(Vec<FeatureRecord>),
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str::<RecordDocument>(text)? {
            RecordDocument::Single(record) => Ok(record),
            RecordDocument::Batch(records) => records.into_iter().next().ok_or_else(|| {
                <serde_json::Error as serde::de::Error>::custom(
                    "patient record array must contain at least one record",
                )
            }),
        }
    }

    pub fn with(mut self, key: impl Into<FeatureKey>, value: f64) -> Self {
        self.values.insert(key.into(), Some(value));
        self
    }

    pub fn with_missing(mut self, key: impl Into<FeatureKey>) -> Self {
        self.values.insert(key.into(), None);
        self
    }

    pub fn insert(&mut self, key: impl Into<FeatureKey>, value: Option<f64>) {
        self.values.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Finite value for `key`, if one was submitted.
    /// The value as submitted, before NaN is read as missing.
    pub fn submitted(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied().flatten()
    }

    pub fn value(&self, key: &str) -> Option<f64> {
        self.values
            .get(key)
            .copied()
            .flatten()
            .filter(|value| value.is_finite())
    }

    pub fn keys(&self) -> impl Iterator<Item = &FeatureKey> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FeatureKey, Option<f64>)> {
        self.values.iter().map(|(key, value)| (key, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<FeatureKey>> FromIterator<(K, f64)> for FeatureRecord {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), Some(value)))
                .collect(),
        }
    }
}

/// Imputed and scaled row, aligned to the schema it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessedVector {
    values: Vec<f64>,
}

impl PreprocessedVector {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Explainer output before it is attached to feature identities.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAttribution {
    pub base_value: f64,
    pub contributions: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub feature: FeatureKey,
    pub value: f64,
    pub schema_index: usize,
}

/// Base value plus one contribution per schema feature, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionResult {
    pub base_value: f64,
    pub contributions: Vec<Contribution>,
}

impl AttributionResult {
    pub(crate) fn aligned(schema: &FeatureSchema, raw: RawAttribution) -> Self {
        let contributions = schema
            .keys()
            .iter()
            .zip(raw.contributions)
            .enumerate()
            .map(|(schema_index, (feature, value))| Contribution {
                feature: feature.clone(),
                value,
                schema_index,
            })
            .collect();
        Self {
            base_value: raw.base_value,
            contributions,
        }
    }

    pub fn contribution_sum(&self) -> f64 {
        self.contributions.iter().map(|c| c.value).sum()
    }

    pub fn raw_score(&self) -> f64 {
        self.base_value + self.contribution_sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub binary_flag: u8,
    pub base_value: f64,
    pub raw_score: f64,
    /// Sorted by descending magnitude; `schema_index` keeps feature identity.
    pub contributions: Vec<Contribution>,
    pub feature_values: FeatureRecord,
}

impl PredictionResult {
    pub fn contribution(&self, feature: &str) -> Option<f64> {
        self.contributions
            .iter()
            .find(|c| c.feature == feature)
            .map(|c| c.value)
    }

    pub fn schema_aligned(&self) -> Vec<&Contribution> {
        let mut aligned: Vec<&Contribution> = self.contributions.iter().collect();
        aligned.sort_by_key(|c| c.schema_index);
        aligned
    }
}

/// Descending magnitude, ties by schema position.
pub(crate) fn by_magnitude(a: &Contribution, b: &Contribution) -> Ordering {
    b.value
        .abs()
        .total_cmp(&a.value.abs())
        .then_with(|| a.schema_index.cmp(&b.schema_index))
}
