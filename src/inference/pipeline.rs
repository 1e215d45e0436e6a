use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    features::FeatureSchema,
    inference::{
        attribution::AttributionEngine,
        error::InferenceError,
        ports::{ExplainerPort, ImputerPort, ScalerPort},
        preprocess::Preprocessor,
        scorer::RiskScorer,
        types::{FeatureRecord, PredictionResult},
        validator::FeatureValidator,
    },
    scenario::{ScenarioDelta, diff},
};

/// Validator, preprocessing, attribution and scoring over one feature schema.
pub struct InferencePipeline {
    validator: FeatureValidator,
    preprocessor: Preprocessor,
    attribution: AttributionEngine,
    scorer: RiskScorer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordComparison {
    pub baseline: PredictionResult,
    pub candidate: PredictionResult,
    pub delta: ScenarioDelta,
}

impl InferencePipeline {
    pub fn new(
        schema: FeatureSchema,
        imputer: Arc<dyn ImputerPort>,
        scaler: Arc<dyn ScalerPort>,
        explainer: Arc<dyn ExplainerPort>,
    ) -> Self {
        Self {
            validator: FeatureValidator::new(schema.clone()),
            preprocessor: Preprocessor::new(schema.clone(), imputer, scaler),
            attribution: AttributionEngine::new(schema, explainer),
            scorer: RiskScorer,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.validator.schema()
    }

    pub fn run_inference(&self, record: FeatureRecord) -> Result<PredictionResult, InferenceError> {
        self.validator.validate(&record).inspect_err(|err| {
            tracing::debug!(
                target: "inference",
                missing = err.features.len(),
                "inference_rejected_missing_features"
            );
        })?;

        let vector = self.preprocessor.preprocess(&record).inspect_err(|err| {
            tracing::warn!(
                target: "inference",
                stage = %err.stage,
                expected = err.expected,
                actual = err.actual,
                detail = %err.detail,
                "preprocessing_failed"
            );
        })?;
        let attribution = self.attribution.explain(&vector).inspect_err(|err| {
            tracing::warn!(
                target: "inference",
                stage = %err.stage,
                expected = err.expected,
                actual = err.actual,
                detail = %err.detail,
                "attribution_failed"
            );
        })?;

        let result = self.scorer.score(attribution, record);
        tracing::debug!(
            target: "inference",
            risk_score = result.risk_score,
            risk_level = result.risk_level.label(),
            binary_flag = result.binary_flag,
            "inference_completed"
        );
        Ok(result)
    }

    /// Runs both records and diffs them; no session is involved.
    pub fn compare(
        &self,
        baseline: FeatureRecord,
        candidate: FeatureRecord,
    ) -> Result<RecordComparison, InferenceError> {
        let baseline = self.run_inference(baseline)?;
        let candidate = self.run_inference(candidate)?;
        let delta = diff(&baseline, &candidate);
        Ok(RecordComparison {
            baseline,
            candidate,
            delta,
        })
    }
}
