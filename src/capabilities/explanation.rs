use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    capabilities::{
        context::ContextBuilder,
        ports::TextGenerationPort,
        types::{DetailLevel, FactorFact, GenerationTask},
    },
    inference::PredictionResult,
    router::{
        CapabilityError, CapabilityPort, CapabilityReply, CapabilityRequest, ComparisonOutcome,
        Intent, ResolvedContext,
    },
};

/// Explains the current prediction, the latest scenario against it, or one named factor.
/// Never retrieves.
pub struct ExplanationCapability {
    generator: Arc<dyn TextGenerationPort>,
    context: ContextBuilder,
    detail: DetailLevel,
}

impl ExplanationCapability {
    pub fn new(
        generator: Arc<dyn TextGenerationPort>,
        context: ContextBuilder,
        detail: DetailLevel,
    ) -> Self {
        Self {
            generator,
            context,
            detail,
        }
    }
}

#[async_trait]
impl CapabilityPort for ExplanationCapability {
    fn intent(&self) -> Intent {
        Intent::Explanation
    }

    async fn handle(&self, resolved: ResolvedContext) -> Result<CapabilityReply, CapabilityError> {
        let Some(prediction) = resolved.current_prediction.as_ref() else {
            return Err(CapabilityError::InvalidContext(
                "no current prediction to explain; analyze a patient record first".to_string(),
            ));
        };

        let (task, factors) = match &resolved.request {
            CapabilityRequest::ExplainFeature { feature } => (
                GenerationTask::ExplainFeature,
                self.single_factor(prediction, feature)?,
            ),
            _ => {
                let task = match resolved.comparison {
                    ComparisonOutcome::NotRequested => GenerationTask::ExplainPrediction {
                        detail: self.detail,
                    },
                    _ => GenerationTask::CompareScenarios {
                        detail: self.detail,
                    },
                };
                let factors = self
                    .context
                    .strongest_factors(prediction, self.detail.factor_limit());
                (task, factors)
            }
        };
        let generation = self.context.build(&resolved, task, factors, Vec::new());

        let text = self.generator.generate(&generation).await?;
        Ok(CapabilityReply {
            intent: Intent::Explanation,
            text,
            sources: Vec::new(),
        })
    }
}

impl ExplanationCapability {
    fn single_factor(
        &self,
        prediction: &PredictionResult,
        feature: &str,
    ) -> Result<Vec<FactorFact>, CapabilityError> {
        let contribution = prediction
            .contributions
            .iter()
            .find(|contribution| contribution.feature == feature)
            .ok_or_else(|| {
                CapabilityError::InvalidContext(format!(
                    "feature '{feature}' is not part of the current prediction"
                ))
            })?;
        Ok(self.context.facts(prediction, [contribution]))
    }
}
