use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    capabilities::{
        context::{ContextBuilder, source_refs},
        ports::TextGenerationPort,
        priorities::{InterventionPriorities, PriorityTier, modifiable_risk_factors},
        retrieval::RetrievalSources,
        types::{GenerationContext, GenerationTask, InterventionFocus, PlanTimeframe},
    },
    inference::PredictionResult,
    router::{
        CapabilityError, CapabilityPort, CapabilityReply, CapabilityRequest, Intent,
        ResolvedContext,
    },
};

const RISK_FACTOR_LIMIT: usize = 5;
const SCENARIO_SUGGESTIONS: usize = 5;

/// Recommends interventions against the current risk-increasing factors.
pub struct InterventionCapability {
    generator: Arc<dyn TextGenerationPort>,
    context: ContextBuilder,
    retrieval: RetrievalSources,
    focus: InterventionFocus,
    timeframe: PlanTimeframe,
}

impl InterventionCapability {
    pub fn new(
        generator: Arc<dyn TextGenerationPort>,
        context: ContextBuilder,
        retrieval: RetrievalSources,
        focus: InterventionFocus,
        timeframe: PlanTimeframe,
    ) -> Self {
        Self {
            generator,
            context,
            retrieval,
            focus,
            timeframe,
        }
    }
}

#[async_trait]
impl CapabilityPort for InterventionCapability {
    fn intent(&self) -> Intent {
        Intent::Intervention
    }

    async fn handle(&self, resolved: ResolvedContext) -> Result<CapabilityReply, CapabilityError> {
        let Some(prediction) = resolved.current_prediction.as_ref() else {
            return Err(CapabilityError::InvalidContext(
                "no current prediction to plan against; analyze a patient record first"
                    .to_string(),
            ));
        };

        let generation = match resolved.request {
            CapabilityRequest::SuggestScenarios => self.suggestions(&resolved, prediction),
            _ => self.plan(&resolved, prediction).await,
        };

        let text = self.generator.generate(&generation).await?;
        Ok(CapabilityReply {
            intent: Intent::Intervention,
            text,
            sources: source_refs(&generation.passages),
        })
    }
}

impl InterventionCapability {
    async fn plan(
        &self,
        resolved: &ResolvedContext,
        prediction: &PredictionResult,
    ) -> GenerationContext {
        let priorities = InterventionPriorities::of(self.context.catalog(), prediction);
        tracing::debug!(
            target: "capabilities",
            high = priorities.high.len(),
            medium = priorities.medium.len(),
            low = priorities.low.len(),
            "intervention_priorities"
        );
        let targets = priorities.plan_targets(RISK_FACTOR_LIMIT);
        let factors = self.context.prioritized_facts(prediction, &targets);

        // Guidelines only; literature is never consulted for plans.
        let passages = if resolved.retrieval.use_guidelines {
            let query = format!(
                "CML cardiovascular risk reduction interventions {} risk TKI therapy recommendations",
                prediction.risk_level.label()
            );
            self.retrieval.guidelines(&query).await
        } else {
            Vec::new()
        };

        let task = GenerationTask::RecommendInterventions {
            focus: self.focus,
            timeframe: self.timeframe,
            max_goals: self.timeframe.max_goals(),
        };
        self.context.build(resolved, task, factors, passages)
    }

    /// Never retrieves.
    fn suggestions(
        &self,
        resolved: &ResolvedContext,
        prediction: &PredictionResult,
    ) -> GenerationContext {
        let targets: Vec<_> =
            modifiable_risk_factors(self.context.catalog(), prediction, SCENARIO_SUGGESTIONS)
                .into_iter()
                .map(|contribution| (PriorityTier::of(contribution.value), contribution))
                .collect();
        let factors = self.context.prioritized_facts(prediction, &targets);
        let task = GenerationTask::SuggestScenarios {
            count: SCENARIO_SUGGESTIONS,
        };
        self.context.build(resolved, task, factors, Vec::new())
    }
}
