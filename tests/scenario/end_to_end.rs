use std::sync::Arc;

use cvd_agent::{
    inference::RiskLevel,
    router::{CapabilityRegistry, CapabilityRouter, Intent, RetrievalToggles, RoutingRule},
    session::Session,
};

use crate::support::{EchoCapability, xy_pipeline, xy_record};

#[tokio::test]
async fn given_current_and_one_scenario_when_asking_to_compare_then_explanation_receives_the_delta() {
    let explanation = EchoCapability::new(Intent::Explanation);
    let registry = CapabilityRegistry::new()
        .with(explanation.clone())
        .with(EchoCapability::new(Intent::Knowledge))
        .with(EchoCapability::new(Intent::Intervention));
    let router = CapabilityRouter::with_default_keywords(registry).expect("router");
    let session = Session::new(
        Arc::new(xy_pipeline()),
        Arc::new(router),
        RetrievalToggles::default(),
    );

    let report = session
        .analyze(xy_record(3.0, 0.75))
        .await
        .expect("analyze should succeed");
    assert_eq!(report.prediction.risk_level, RiskLevel::High);
    let scenario = session
        .add_scenario(xy_record(1.0, 0.60), None)
        .await
        .expect("scenario should be added");
    assert_eq!(scenario.label, "Scenario 1");

    let reply = session
        .ask("Compare this scenario with the current result", None)
        .await
        .expect("ask should succeed");

    assert_eq!(reply.intent, Intent::Explanation);
    let context = explanation.last();
    assert_eq!(context.rule, RoutingRule::Comparison);
    let comparison = context
        .comparison
        .ready()
        .expect("comparison should be attached");
    assert_eq!(comparison.scenario_label, "Scenario 1");
    let delta = &comparison.delta;
    assert!((delta.risk_delta + 0.15).abs() < 1e-9);
    assert_eq!(delta.from_level, RiskLevel::High);
    assert_eq!(delta.to_level, RiskLevel::Moderate);
    let x = delta
        .attribution_change("X")
        .expect("X attribution moved by 0.10");
    assert!((x.delta + 0.10).abs() < 1e-9);
    let x_value = delta.feature_change("X").expect("X changed from 3 to 1");
    assert_eq!((x_value.from, x_value.to), (3.0, 1.0));
    let percent = delta.relative_change.percent().expect("baseline is non-zero");
    assert!((percent + 20.0).abs() < 1e-6);
}
