use std::sync::Arc;

use crate::{
    features::FeatureSchema,
    inference::{
        error::{PreprocessingError, TransformStage},
        ports::{ImputerPort, ScalerPort},
        types::{FeatureRecord, PreprocessedVector},
    },
};

pub struct Preprocessor {
    schema: FeatureSchema,
    imputer: Arc<dyn ImputerPort>,
    scaler: Arc<dyn ScalerPort>,
}

impl Preprocessor {
    pub fn new(
        schema: FeatureSchema,
        imputer: Arc<dyn ImputerPort>,
        scaler: Arc<dyn ScalerPort>,
    ) -> Self {
        Self {
            schema,
            imputer,
            scaler,
        }
    }

    /// Schema-ordered row with NaN for missing values. Extra record keys are ignored.
    pub fn assemble_row(&self, record: &FeatureRecord) -> Vec<f64> {
        self.schema
            .keys()
            .iter()
            .map(|key| record.value(key).unwrap_or(f64::NAN))
            .collect()
    }

    /// Imputer first, scaler second. The record must already be validated.
    ///
    /// An infinite submitted value is rejected; NaN counts as missing and is imputed.
    pub fn preprocess(
        &self,
        record: &FeatureRecord,
    ) -> Result<PreprocessedVector, PreprocessingError> {
        let width = self.schema.len();
        if let Some(key) = self
            .schema
            .keys()
            .iter()
            .find(|key| record.submitted(key).is_some_and(f64::is_infinite))
        {
            return Err(PreprocessingError::new(
                TransformStage::Input,
                width,
                width,
                format!("non-finite value submitted for feature '{key}'"),
            ));
        }
        let row = self.assemble_row(record);

        let imputed = self.imputer.transform(&row).map_err(|err| {
            PreprocessingError::from_transform(TransformStage::Imputer, width, row.len(), err)
        })?;
        self.check_width(TransformStage::Imputer, &imputed)?;

        let scaled = self.scaler.transform(&imputed).map_err(|err| {
            PreprocessingError::from_transform(TransformStage::Scaler, width, imputed.len(), err)
        })?;
        self.check_width(TransformStage::Scaler, &scaled)?;

        if let Some(index) = scaled.iter().position(|value| !value.is_finite()) {
            return Err(PreprocessingError::new(
                TransformStage::Scaler,
                width,
                scaled.len(),
                format!(
                    "non-finite value for feature '{}' after imputation and scaling",
                    self.schema.keys()[index]
                ),
            ));
        }

        Ok(PreprocessedVector::new(scaled))
    }

    fn check_width(&self, stage: TransformStage, values: &[f64]) -> Result<(), PreprocessingError> {
        if values.len() == self.schema.len() {
            return Ok(());
        }
        Err(PreprocessingError::new(
            stage,
            self.schema.len(),
            values.len(),
            "transform output width differs from the feature schema",
        ))
    }
}
