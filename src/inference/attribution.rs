use std::sync::Arc;

use crate::{
    features::FeatureSchema,
    inference::{
        error::{PreprocessingError, TransformStage},
        ports::ExplainerPort,
        types::{AttributionResult, PreprocessedVector},
    },
};

pub struct AttributionEngine {
    schema: FeatureSchema,
    explainer: Arc<dyn ExplainerPort>,
}

impl AttributionEngine {
    pub fn new(schema: FeatureSchema, explainer: Arc<dyn ExplainerPort>) -> Self {
        Self { schema, explainer }
    }

    /// One explainer call per inference; the result is aligned to schema order.
    pub fn explain(
        &self,
        vector: &PreprocessedVector,
    ) -> Result<AttributionResult, PreprocessingError> {
        let width = self.schema.len();
        let raw = self.explainer.explain(vector.values()).map_err(|err| {
            PreprocessingError::from_transform(TransformStage::Explainer, width, vector.len(), err)
        })?;

        if raw.contributions.len() != width {
            return Err(PreprocessingError::new(
                TransformStage::Explainer,
                width,
                raw.contributions.len(),
                "explainer returned a contribution vector of the wrong width",
            ));
        }
        if !raw.base_value.is_finite() {
            return Err(PreprocessingError::new(
                TransformStage::Explainer,
                width,
                raw.contributions.len(),
                "explainer returned a non-finite base value",
            ));
        }
        if let Some(index) = raw.contributions.iter().position(|value| !value.is_finite()) {
            return Err(PreprocessingError::new(
                TransformStage::Explainer,
                width,
                raw.contributions.len(),
                format!(
                    "explainer returned a non-finite contribution for '{}'",
                    self.schema.keys()[index]
                ),
            ));
        }

        Ok(AttributionResult::aligned(&self.schema, raw))
    }
}
