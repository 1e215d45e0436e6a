use std::sync::Arc;

use crate::{
    capabilities::{
        priorities::PriorityTier,
        types::{Direction, FactorFact, GenerationContext, GenerationTask, Passage, RiskSummary},
    },
    features::FeatureCatalog,
    inference::{Contribution, PredictionResult},
    router::{ResolvedContext, SourceRef},
};

/// Turns a resolved routing context into the structured prompt input.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    catalog: Arc<FeatureCatalog>,
}

impl ContextBuilder {
    pub fn new(catalog: Arc<FeatureCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    pub fn risk_summary(prediction: &PredictionResult) -> RiskSummary {
        RiskSummary {
            risk_score: prediction.risk_score,
            risk_level: prediction.risk_level,
            binary_flag: prediction.binary_flag,
        }
    }

    pub fn facts<'a>(
        &self,
        prediction: &PredictionResult,
        contributions: impl IntoIterator<Item = &'a Contribution>,
    ) -> Vec<FactorFact> {
        contributions
            .into_iter()
            .map(|contribution| self.fact(prediction, contribution, None))
            .collect()
    }

    pub fn prioritized_facts(
        &self,
        prediction: &PredictionResult,
        targets: &[(PriorityTier, Contribution)],
    ) -> Vec<FactorFact> {
        targets
            .iter()
            .map(|(tier, contribution)| self.fact(prediction, contribution, Some(*tier)))
            .collect()
    }

    fn fact(
        &self,
        prediction: &PredictionResult,
        contribution: &Contribution,
        priority: Option<PriorityTier>,
    ) -> FactorFact {
        let info = self.catalog.info(&contribution.feature);
        FactorFact {
            feature: contribution.feature.clone(),
            name: info.name,
            category: info.category,
            value: prediction.feature_values.value(&contribution.feature),
            unit: info.unit,
            normal_range: info.normal_range,
            contribution: contribution.value,
            direction: Direction::of(contribution.value),
            priority,
        }
    }

    /// The `limit` largest contributions of the current prediction, any sign.
    pub fn strongest_factors(
        &self,
        prediction: &PredictionResult,
        limit: usize,
    ) -> Vec<FactorFact> {
        self.facts(prediction, prediction.contributions.iter().take(limit))
    }

    pub fn build(
        &self,
        resolved: &ResolvedContext,
        task: GenerationTask,
        factors: Vec<FactorFact>,
        passages: Vec<Passage>,
    ) -> GenerationContext {
        GenerationContext {
            intent: resolved.intent,
            task,
            question: resolved.message.clone(),
            risk: resolved.current_prediction.as_ref().map(Self::risk_summary),
            factors,
            comparison: resolved.comparison.clone(),
            scenario_labels: resolved
                .scenario_history
                .iter()
                .map(|scenario| scenario.label.clone())
                .collect(),
            passages,
        }
    }
}

pub fn source_refs(passages: &[Passage]) -> Vec<SourceRef> {
    passages
        .iter()
        .map(|passage| SourceRef {
            source: passage.source.clone(),
            locator: passage.locator.clone(),
        })
        .collect()
}
