use std::sync::Arc;

use cvd_agent::{
    inference::{
        InferencePipeline, MedianImputer, PredictionResult, RawAttribution, StandardScaler,
    },
    scenario::{OmissionReason, RelativeChange, diff},
};

use crate::support::{ScriptedExplainer, passthrough_pipeline, record, schema};

/// Contributions are half the preprocessed value, so attribution moves at half the feature rate.
fn half_weight_pipeline(keys: &[&str]) -> InferencePipeline {
    InferencePipeline::new(
        schema(keys),
        Arc::new(MedianImputer {
            statistics: vec![0.0; keys.len()],
        }),
        Arc::new(StandardScaler {
            mean: vec![0.0; keys.len()],
            scale: vec![1.0; keys.len()],
        }),
        Arc::new(ScriptedExplainer::new(|row| {
            Ok(RawAttribution {
                base_value: -1.0,
                contributions: row.iter().map(|value| value * 0.5).collect(),
            })
        })),
    )
}

fn run(pipeline: &InferencePipeline, values: &[(&str, f64)]) -> PredictionResult {
    pipeline
        .run_inference(record(values))
        .expect("inference should succeed")
}

#[test]
fn given_changes_at_and_just_past_tolerance_when_diffing_then_only_strict_excess_is_reported() {
    let pipeline = half_weight_pipeline(&["at_limit", "past_limit", "unchanged"]);
    let a = run(
        &pipeline,
        &[("at_limit", 1.00), ("past_limit", 1.00), ("unchanged", 0.4)],
    );
    let b = run(
        &pipeline,
        &[("at_limit", 1.01), ("past_limit", 1.0102), ("unchanged", 0.4)],
    );

    let delta = diff(&a, &b);

    assert!(delta.feature_change("at_limit").is_none());
    assert!(delta.attribution_change("at_limit").is_none());
    let feature = delta
        .feature_change("past_limit")
        .expect("0.0102 exceeds the feature tolerance");
    assert_eq!((feature.from, feature.to), (1.00, 1.0102));
    let attribution = delta
        .attribution_change("past_limit")
        .expect("0.0051 exceeds the attribution tolerance");
    assert!((attribution.delta - 0.0051).abs() < 1e-9);
    assert!(delta.feature_change("unchanged").is_none());
}

#[test]
fn given_two_predictions_when_diffing_both_ways_then_deltas_are_negations() {
    let pipeline = passthrough_pipeline(&["a", "b", "c"], 0.2);
    let a = run(&pipeline, &[("a", 0.9), ("b", -0.3), ("c", 0.0)]);
    let b = run(&pipeline, &[("a", 0.1), ("b", 0.4), ("c", 0.0)]);

    let forward = diff(&a, &b);
    let backward = diff(&b, &a);

    assert_eq!(forward.risk_delta, -backward.risk_delta);
    assert_eq!((forward.from_level, forward.to_level), (backward.to_level, backward.from_level));
    assert_eq!(forward.feature_changes.len(), backward.feature_changes.len());
    for (f, r) in forward.feature_changes.iter().zip(&backward.feature_changes) {
        assert_eq!(f.feature, r.feature);
        assert_eq!((f.from, f.to), (r.to, r.from));
    }
    assert_eq!(
        forward.attribution_changes.len(),
        backward.attribution_changes.len()
    );
    for (f, r) in forward
        .attribution_changes
        .iter()
        .zip(&backward.attribution_changes)
    {
        assert_eq!(f.feature, r.feature);
        assert_eq!(f.delta, -r.delta);
    }
}

#[test]
fn given_attribution_changes_when_diffing_then_they_are_ordered_by_magnitude() {
    let pipeline = passthrough_pipeline(&["a", "b", "c"], 0.0);
    let a = run(&pipeline, &[("a", 0.0), ("b", 0.0), ("c", 0.0)]);
    let b = run(&pipeline, &[("a", 0.1), ("b", -0.4), ("c", 0.1)]);

    let delta = diff(&a, &b);

    let order: Vec<&str> = delta
        .attribution_changes
        .iter()
        .map(|c| c.feature.as_str())
        .collect();
    assert_eq!(order, vec!["b", "a", "c"]);
}

#[test]
fn given_zero_baseline_risk_when_diffing_then_relative_change_is_omitted() {
    let pipeline = passthrough_pipeline(&["a"], -1000.0);
    let a = run(&pipeline, &[("a", 0.0)]);
    let b = run(&pipeline, &[("a", 999.0)]);
    assert_eq!(a.risk_score, 0.0);

    let delta = diff(&a, &b);

    assert_eq!(
        delta.relative_change,
        RelativeChange::Omitted {
            reason: OmissionReason::ZeroBaseline
        }
    );
    assert!(delta.risk_delta.is_finite());
    assert!(diff(&b, &a).relative_change.percent().is_some());
}

#[test]
fn given_identical_predictions_when_diffing_then_delta_is_empty() {
    let pipeline = passthrough_pipeline(&["a", "b"], 0.0);
    let a = run(&pipeline, &[("a", 0.3), ("b", 0.2)]);

    let delta = diff(&a, &a.clone());

    assert_eq!(delta.risk_delta, 0.0);
    assert!(delta.feature_changes.is_empty());
    assert!(delta.attribution_changes.is_empty());
    assert!(!delta.level_changed());
    assert_eq!(delta.relative_change.percent(), Some(0.0));
}
