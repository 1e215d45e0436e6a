use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::features::schema::{FeatureKey, FeatureSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    Demographics,
    Vitals,
    TkiMedications,
    LabTests,
}

impl FeatureCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Demographics => "Demographics",
            Self::Vitals => "Vitals",
            Self::TkiMedications => "TKI Medications",
            Self::LabTests => "Lab Tests",
        }
    }

    /// Age and sex cannot be changed by an intervention.
    pub fn is_modifiable(self) -> bool {
        self != Self::Demographics
    }

    /// Keys without explicit metadata fall back to this rule.
    pub fn infer(key: &str) -> Self {
        match key {
            "anchor_age" | "gender_encoded" => Self::Demographics,
            "BMI" | "systolic" | "diastolic" => Self::Vitals,
            _ if key.ends_with("_dose") => Self::TkiMedications,
            _ => Self::LabTests,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureInfo {
    pub key: FeatureKey,
    pub name: String,
    pub unit: String,
    pub normal_range: String,
    pub description: String,
    pub category: FeatureCategory,
    /// Whether an intervention or what-if scenario may target this feature.
    pub modifiable: bool,
}

impl FeatureInfo {
    fn new(key: &str, name: &str, unit: &str, normal_range: &str, description: &str) -> Self {
        let category = FeatureCategory::infer(key);
        Self {
            key: key.to_string(),
            name: name.to_string(),
            unit: unit.to_string(),
            normal_range: normal_range.to_string(),
            description: description.to_string(),
            category,
            modifiable: category.is_modifiable(),
        }
    }

    fn bare(key: &str) -> Self {
        let category = FeatureCategory::infer(key);
        Self {
            key: key.to_string(),
            name: key.to_string(),
            unit: String::new(),
            normal_range: "N/A".to_string(),
            description: String::new(),
            category,
            modifiable: category.is_modifiable(),
        }
    }
}

/// Display metadata for the features of a schema.
#[derive(Debug, Clone)]
pub struct FeatureCatalog {
    schema: FeatureSchema,
    entries: BTreeMap<FeatureKey, FeatureInfo>,
}

impl FeatureCatalog {
    pub fn new(schema: FeatureSchema, entries: impl IntoIterator<Item = FeatureInfo>) -> Self {
        let entries = entries
            .into_iter()
            .map(|info| (info.key.clone(), info))
            .collect();
        Self { schema, entries }
    }

    pub fn cml_cvd() -> Self {
        Self::new(FeatureSchema::cml_cvd(), cml_cvd_entries())
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn info(&self, key: &str) -> FeatureInfo {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| FeatureInfo::bare(key))
    }

    pub fn is_modifiable(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map(|info| info.modifiable)
            .unwrap_or_else(|| FeatureCategory::infer(key).is_modifiable())
    }

    /// Schema keys grouped by category, each group in schema order.
    pub fn categories(&self) -> BTreeMap<FeatureCategory, Vec<FeatureKey>> {
        let mut groups: BTreeMap<FeatureCategory, Vec<FeatureKey>> = BTreeMap::new();
        for key in self.schema.keys() {
            let category = self
                .entries
                .get(key)
                .map(|info| info.category)
                .unwrap_or_else(|| FeatureCategory::infer(key));
            groups.entry(category).or_default().push(key.clone());
        }
        groups
    }
}

impl Default for FeatureCatalog {
    fn default() -> Self {
        Self::cml_cvd()
    }
}

fn cml_cvd_entries() -> Vec<FeatureInfo> {
    vec![
        FeatureInfo::new("anchor_age", "Age", "years", "18-100", "Patient's age at diagnosis"),
        FeatureInfo::new(
            "White Blood Cells",
            "White Blood Cell Count",
            "×10^9/L",
            "4.0-11.0",
            "Total white blood cell count, elevated in CML",
        ),
        FeatureInfo::new(
            "Urea Nitrogen",
            "Blood Urea Nitrogen (BUN)",
            "mg/dL",
            "7-20",
            "Kidney function marker",
        ),
        FeatureInfo::new(
            "Neutrophils",
            "Neutrophil Count",
            "%",
            "40-70",
            "Type of white blood cell, often elevated in CML",
        ),
        FeatureInfo::new(
            "BMI",
            "Body Mass Index",
            "kg/m²",
            "18.5-24.9",
            "Body weight relative to height",
        ),
        FeatureInfo::new(
            "Monocytes",
            "Monocyte Count",
            "%",
            "2-8",
            "Type of white blood cell involved in immune response",
        ),
        FeatureInfo::new(
            "Glucose",
            "Blood Glucose",
            "mg/dL",
            "70-100 (fasting)",
            "Blood sugar level, diabetes indicator",
        ),
        FeatureInfo::new(
            "systolic",
            "Systolic Blood Pressure",
            "mmHg",
            "90-120",
            "Upper blood pressure reading",
        ),
        FeatureInfo::new(
            "MCH",
            "Mean Corpuscular Hemoglobin",
            "pg",
            "27-31",
            "Average amount of hemoglobin per red blood cell",
        ),
        FeatureInfo::new(
            "Calcium, Total",
            "Total Calcium",
            "mg/dL",
            "8.5-10.5",
            "Blood calcium level",
        ),
        FeatureInfo::new(
            "Lymphocytes",
            "Lymphocyte Count",
            "%",
            "20-40",
            "Type of white blood cell, part of immune system",
        ),
        FeatureInfo::new(
            "Creatinine",
            "Serum Creatinine",
            "mg/dL",
            "0.7-1.3",
            "Kidney function marker",
        ),
        FeatureInfo::new(
            "Sodium",
            "Blood Sodium",
            "mmol/L",
            "135-145",
            "Electrolyte balance indicator",
        ),
        FeatureInfo::new(
            "diastolic",
            "Diastolic Blood Pressure",
            "mmHg",
            "60-80",
            "Lower blood pressure reading",
        ),
        FeatureInfo::new("PT", "Prothrombin Time", "seconds", "11-13.5", "Blood clotting time"),
        FeatureInfo::new(
            "imatinib_dose",
            "Imatinib Dose",
            "mg/day",
            "0-800",
            "TKI medication for CML (Gleevec)",
        ),
        FeatureInfo::new(
            "dasatinib_dose",
            "Dasatinib Dose",
            "mg/day",
            "0-140",
            "TKI medication for CML (Sprycel)",
        ),
        FeatureInfo::new(
            "gender_encoded",
            "Gender",
            "binary",
            "0=Female, 1=Male",
            "Biological sex",
        ),
        FeatureInfo::new(
            "nilotinib_dose",
            "Nilotinib Dose",
            "mg/day",
            "0-800",
            "TKI medication for CML (Tasigna)",
        ),
        FeatureInfo::new(
            "ponatinib_dose",
            "Ponatinib Dose",
            "mg/day",
            "0-45",
            "TKI medication for CML (Iclusig)",
        ),
        FeatureInfo::new(
            "ruxolitinib_dose",
            "Ruxolitinib Dose",
            "mg/day",
            "0-50",
            "JAK inhibitor medication",
        ),
    ]
}
