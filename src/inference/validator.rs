use crate::{
    features::FeatureSchema,
    inference::{error::MissingFeatures, types::FeatureRecord},
};

#[derive(Debug, Clone)]
pub struct FeatureValidator {
    schema: FeatureSchema,
}

impl FeatureValidator {
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Names every schema key absent from `record`, in schema order.
    /// A key submitted with a null value is present and will be imputed.
    pub fn validate(&self, record: &FeatureRecord) -> Result<(), MissingFeatures> {
        let features: Vec<String> = self
            .schema
            .keys()
            .iter()
            .filter(|key| !record.contains_key(key.as_str()))
            .cloned()
            .collect();

        if features.is_empty() {
            Ok(())
        } else {
            Err(MissingFeatures { features })
        }
    }
}
