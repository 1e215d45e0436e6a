use std::sync::Arc;

use async_trait::async_trait;
use cvd_agent::{
    router::{
        CapabilityError, CapabilityPort, CapabilityRegistry, CapabilityReply, CapabilityRouter,
        ComparisonOmission, ComparisonOutcome, Intent, ResolvedContext, RetrievalOverrides,
        RouterError,
    },
    session::SessionState,
};

use crate::{prediction, router, state_with, support::EchoCapability};

#[test]
fn given_several_scenarios_when_comparison_is_routed_then_latest_scenario_is_side_b() {
    let current = prediction(3.0, 0.75);
    let state = state_with(
        Some(current.clone()),
        vec![
            ("walk daily", prediction(2.0, 0.70)),
            ("stop smoking", prediction(1.0, 0.60)),
        ],
    );

    let (_, context) = router()
        .route("what if I compare scenarios?", &state, None)
        .expect("routing should succeed");

    let comparison = context.comparison.ready().expect("comparison attached");
    assert_eq!(comparison.scenario_label, "stop smoking");
    assert_eq!(comparison.baseline, current);
    assert!((comparison.delta.risk_delta + 0.15).abs() < 1e-9);
}

#[test]
fn given_compare_tag_and_empty_history_when_routing_then_comparison_is_omitted_with_reason() {
    let state = state_with(Some(prediction(3.0, 0.75)), Vec::new());

    let (intent, context) = router()
        .route("/compare", &state, None)
        .expect("routing should succeed");

    assert_eq!(intent, Intent::Explanation);
    assert_eq!(
        context.comparison,
        ComparisonOutcome::Omitted {
            reason: ComparisonOmission::EmptyHistory
        }
    );
}

#[test]
fn given_history_without_current_prediction_when_comparing_then_omission_names_missing_prediction() {
    let state = state_with(None, vec![("s", prediction(1.0, 0.6))]);

    let (_, context) = router()
        .route("compare the scenarios", &state, None)
        .expect("routing should succeed");

    assert_eq!(
        context.comparison,
        ComparisonOutcome::Omitted {
            reason: ComparisonOmission::NoCurrentPrediction
        }
    );
}

#[test]
fn given_missing_capability_when_routing_then_capability_unavailable_names_the_intent() {
    let registry = CapabilityRegistry::new().with(EchoCapability::new(Intent::Knowledge));
    let router = CapabilityRouter::with_default_keywords(registry).expect("router");

    let err = router
        .route("Create a plan to lower my risk", &SessionState::default(), None)
        .expect_err("intervention is not registered");

    assert_eq!(err, RouterError::CapabilityUnavailable(Intent::Intervention));
}

#[test]
fn given_override_when_routing_then_it_applies_to_one_call_only() {
    let state = SessionState::default();
    let router = router();
    let overrides = RetrievalOverrides {
        use_literature: Some(false),
        use_guidelines: None,
    };

    let (_, overridden) = router
        .route("Tell me about CML", &state, Some(&overrides))
        .expect("routing should succeed");
    let (_, next) = router
        .route("Tell me about CML", &state, None)
        .expect("routing should succeed");

    assert!(!overridden.retrieval.use_literature);
    assert!(overridden.retrieval.use_guidelines);
    assert!(next.retrieval.use_literature);
    assert!(state.retrieval_defaults.use_literature);
}

#[tokio::test]
async fn given_any_intent_when_dispatching_then_capability_receives_full_session_slice() {
    let intervention = EchoCapability::new(Intent::Intervention);
    let registry = CapabilityRegistry::new()
        .with(EchoCapability::new(Intent::Knowledge))
        .with(intervention.clone());
    let router = CapabilityRouter::with_default_keywords(registry).expect("router");
    let state = state_with(
        Some(prediction(3.0, 0.75)),
        vec![("a", prediction(2.0, 0.7)), ("b", prediction(1.0, 0.6))],
    );

    let reply = router
        .handle("Make a plan to lower my risk", &state, None)
        .await
        .expect("dispatch should succeed");

    assert_eq!(reply.intent, Intent::Intervention);
    let context = intervention.last();
    assert_eq!(context.current_prediction, state.current_prediction);
    assert_eq!(context.current_patient_record, state.current_patient_record);
    assert_eq!(context.scenario_history, state.scenario_history);
    assert_eq!(context.comparison, ComparisonOutcome::NotRequested);
}

struct BrokenCapability;

#[async_trait]
impl CapabilityPort for BrokenCapability {
    fn intent(&self) -> Intent {
        Intent::Knowledge
    }

    async fn handle(&self, _context: ResolvedContext) -> Result<CapabilityReply, CapabilityError> {
        Err(CapabilityError::Generation("model offline".to_string()))
    }
}

#[tokio::test]
async fn given_failing_capability_when_dispatching_then_failure_is_wrapped_with_intent() {
    let registry = CapabilityRegistry::new().with(Arc::new(BrokenCapability));
    let router = CapabilityRouter::with_default_keywords(registry).expect("router");

    let err = router
        .handle("Tell me about CML", &SessionState::default(), None)
        .await
        .expect_err("capability failure should surface");

    assert_eq!(
        err,
        RouterError::CapabilityFailed {
            intent: Intent::Knowledge,
            source: CapabilityError::Generation("model offline".to_string()),
        }
    );
}
