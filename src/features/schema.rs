use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type FeatureKey = String;

/// Keys in the order the pretrained transforms were fitted on.
pub const CML_CVD_FEATURES: [&str; 21] = [
    "anchor_age",
    "White Blood Cells",
    "Urea Nitrogen",
    "Neutrophils",
    "BMI",
    "Monocytes",
    "Glucose",
    "systolic",
    "MCH",
    "Calcium, Total",
    "Lymphocytes",
    "Creatinine",
    "Sodium",
    "diastolic",
    "PT",
    "imatinib_dose",
    "dasatinib_dose",
    "gender_encoded",
    "nilotinib_dose",
    "ponatinib_dose",
    "ruxolitinib_dose",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("feature schema must contain at least one key")]
    Empty,
    #[error("feature key at position {0} is blank")]
    BlankKey(usize),
    #[error("feature key '{0}' appears more than once")]
    DuplicateKey(FeatureKey),
}

/// Ordered set of feature keys a model was trained on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FeatureKey>", into = "Vec<FeatureKey>")]
pub struct FeatureSchema {
    keys: Vec<FeatureKey>,
}

impl FeatureSchema {
    pub fn new<I, S>(keys: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<FeatureKey>,
    {
        let keys: Vec<FeatureKey> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = BTreeSet::new();
        for (index, key) in keys.iter().enumerate() {
            if key.trim().is_empty() {
                return Err(SchemaError::BlankKey(index));
            }
            if !seen.insert(key.as_str()) {
                return Err(SchemaError::DuplicateKey(key.clone()));
            }
        }

        Ok(Self { keys })
    }

    pub fn cml_cvd() -> Self {
        Self {
            keys: CML_CVD_FEATURES.iter().map(|key| key.to_string()).collect(),
        }
    }

    pub fn keys(&self) -> &[FeatureKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|candidate| candidate == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }
}

impl TryFrom<Vec<FeatureKey>> for FeatureSchema {
    type Error = SchemaError;

    fn try_from(keys: Vec<FeatureKey>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}

impl From<FeatureSchema> for Vec<FeatureKey> {
    fn from(schema: FeatureSchema) -> Self {
        schema.keys
    }
}
