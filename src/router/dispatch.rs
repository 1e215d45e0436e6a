use crate::{
    config::RouterConfig,
    router::{
        classifier::{Classification, IntentClassifier, RoutingFacts},
        error::RouterError,
        keywords::KeywordExtensions,
        registry::CapabilityRegistry,
        types::{
            CapabilityReply, CapabilityRequest, ComparisonContext, ComparisonOmission,
            ComparisonOutcome, Intent, ResolvedContext, RetrievalOverrides, RoutingRule,
        },
    },
    scenario,
    session::SessionState,
};

/// Picks one capability per message and hands it a fully resolved context.
#[derive(Debug, Clone)]
pub struct CapabilityRouter {
    classifier: IntentClassifier,
    registry: CapabilityRegistry,
}

impl CapabilityRouter {
    pub fn new(classifier: IntentClassifier, registry: CapabilityRegistry) -> Self {
        Self {
            classifier,
            registry,
        }
    }

    pub fn with_default_keywords(registry: CapabilityRegistry) -> Result<Self, RouterError> {
        Ok(Self::new(
            IntentClassifier::new(&KeywordExtensions::default())?,
            registry,
        ))
    }

    pub fn from_config(
        config: &RouterConfig,
        registry: CapabilityRegistry,
    ) -> Result<Self, RouterError> {
        Ok(Self::new(
            IntentClassifier::new(&config.extra_keywords)?,
            registry,
        ))
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn classify(&self, message: &str, state: &SessionState) -> Classification {
        self.classifier.classify(
            message,
            RoutingFacts {
                has_scenarios: !state.scenario_history.is_empty(),
            },
        )
    }

    /// Classifies `message` against `state` and snapshots what the chosen capability needs.
    ///
    /// `overrides` apply to this call only; `state.retrieval_defaults` is read, never written.
    pub fn route(
        &self,
        message: &str,
        state: &SessionState,
        overrides: Option<&RetrievalOverrides>,
    ) -> Result<(Intent, ResolvedContext), RouterError> {
        let classification = self.classify(message, state);
        let intent = classification.intent;
        self.ensure_registered(intent, classification.rule)?;

        let comparison = if classification.comparison {
            comparison_for(state)
        } else {
            ComparisonOutcome::NotRequested
        };
        let context = resolve(
            intent,
            classification.rule,
            CapabilityRequest::Open,
            classification.message,
            state,
            overrides,
            comparison,
        );
        Ok((intent, context))
    }

    /// Addresses `intent` without classifying; used for session operations that already
    /// know which capability answers them.
    pub fn direct(
        &self,
        intent: Intent,
        request: CapabilityRequest,
        message: String,
        state: &SessionState,
        overrides: Option<&RetrievalOverrides>,
    ) -> Result<ResolvedContext, RouterError> {
        self.ensure_registered(intent, RoutingRule::Direct)?;
        Ok(resolve(
            intent,
            RoutingRule::Direct,
            request,
            message,
            state,
            overrides,
            ComparisonOutcome::NotRequested,
        ))
    }

    fn ensure_registered(&self, intent: Intent, rule: RoutingRule) -> Result<(), RouterError> {
        if self.registry.contains(intent) {
            return Ok(());
        }
        tracing::warn!(
            target: "router",
            intent = %intent,
            rule = ?rule,
            "capability_unavailable"
        );
        Err(RouterError::CapabilityUnavailable(intent))
    }

    pub async fn dispatch(&self, context: ResolvedContext) -> Result<CapabilityReply, RouterError> {
        let intent = context.intent;
        let capability = self
            .registry
            .get(intent)
            .ok_or(RouterError::CapabilityUnavailable(intent))?;

        capability.handle(context).await.map_err(|source| {
            tracing::warn!(
                target: "router",
                intent = %intent,
                error = %source,
                "capability_failed"
            );
            RouterError::CapabilityFailed { intent, source }
        })
    }

    /// `route` followed by `dispatch`.
    pub async fn handle(
        &self,
        message: &str,
        state: &SessionState,
        overrides: Option<&RetrievalOverrides>,
    ) -> Result<CapabilityReply, RouterError> {
        let (_, context) = self.route(message, state, overrides)?;
        self.dispatch(context).await
    }
}

fn resolve(
    intent: Intent,
    rule: RoutingRule,
    request: CapabilityRequest,
    message: String,
    state: &SessionState,
    overrides: Option<&RetrievalOverrides>,
    comparison: ComparisonOutcome,
) -> ResolvedContext {
    let retrieval = state.retrieval_defaults.resolve(overrides);

    tracing::info!(
        target: "router",
        intent = %intent,
        rule = ?rule,
        request = ?request,
        comparison = !matches!(comparison, ComparisonOutcome::NotRequested),
        use_guidelines = retrieval.use_guidelines,
        use_literature = retrieval.use_literature,
        "intent_routed"
    );

    ResolvedContext {
        intent,
        rule,
        request,
        message,
        retrieval,
        current_prediction: state.current_prediction.clone(),
        current_patient_record: state.current_patient_record.clone(),
        scenario_history: state.scenario_history.clone(),
        comparison,
    }
}

/// Current prediction as side "a", most recent scenario as side "b".
fn comparison_for(state: &SessionState) -> ComparisonOutcome {
    let Some(latest) = state.latest_scenario() else {
        return ComparisonOutcome::Omitted {
            reason: ComparisonOmission::EmptyHistory,
        };
    };
    let Some(current) = state.current_prediction.as_ref() else {
        return ComparisonOutcome::Omitted {
            reason: ComparisonOmission::NoCurrentPrediction,
        };
    };

    ComparisonOutcome::Ready(Box::new(ComparisonContext {
        baseline: current.clone(),
        scenario_label: latest.label.clone(),
        scenario: latest.prediction.clone(),
        delta: scenario::diff(current, &latest.prediction),
    }))
}
