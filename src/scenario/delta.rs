use std::collections::BTreeMap;

use crate::{
    features::FeatureKey,
    inference::PredictionResult,
    scenario::types::{
        AttributionChange, FeatureChange, OmissionReason, RelativeChange, ScenarioDelta,
    },
};

/// Absolute, unit-agnostic tolerance on input feature values.
pub const FEATURE_TOLERANCE: f64 = 0.01;
/// Absolute tolerance on per-feature attribution values.
pub const ATTRIBUTION_TOLERANCE: f64 = 0.005;

// Keeps a difference that is exactly the tolerance in decimal (e.g. 1.00 -> 1.01)
// from slipping over it through binary rounding.
const TOLERANCE_SLACK: f64 = 1e-12;

pub fn exceeds_tolerance(delta: f64, tolerance: f64) -> bool {
    delta.abs() - tolerance > TOLERANCE_SLACK
}

/// Differences going from `a` to `b`. `diff(b, a)` is the field-wise negation.
pub fn diff(a: &PredictionResult, b: &PredictionResult) -> ScenarioDelta {
    let order = FeatureOrder::of(a, b);
    let risk_delta = b.risk_score - a.risk_score;

    let feature_changes = order
        .features()
        .filter_map(|feature| {
            let from = a.feature_values.value(feature)?;
            let to = b.feature_values.value(feature)?;
            exceeds_tolerance(to - from, FEATURE_TOLERANCE).then(|| FeatureChange {
                feature: feature.clone(),
                from,
                to,
            })
        })
        .collect();

    let mut attribution_changes: Vec<(usize, AttributionChange)> = order
        .features()
        .enumerate()
        .filter_map(|(position, feature)| {
            let before = a.contribution(feature).unwrap_or(0.0);
            let after = b.contribution(feature).unwrap_or(0.0);
            let delta = after - before;
            exceeds_tolerance(delta, ATTRIBUTION_TOLERANCE).then(|| {
                (
                    position,
                    AttributionChange {
                        feature: feature.clone(),
                        delta,
                    },
                )
            })
        })
        .collect();
    attribution_changes.sort_by(|(left_pos, left), (right_pos, right)| {
        right
            .delta
            .abs()
            .total_cmp(&left.delta.abs())
            .then_with(|| left_pos.cmp(right_pos))
    });

    let relative_change = if a.risk_score == 0.0 {
        RelativeChange::Omitted {
            reason: OmissionReason::ZeroBaseline,
        }
    } else {
        RelativeChange::Computed {
            percent: risk_delta / a.risk_score * 100.0,
        }
    };

    let delta = ScenarioDelta {
        risk_delta,
        relative_change,
        from_level: a.risk_level,
        to_level: b.risk_level,
        feature_changes,
        attribution_changes: attribution_changes
            .into_iter()
            .map(|(_, change)| change)
            .collect(),
    };
    tracing::debug!(
        target: "scenario",
        risk_delta = delta.risk_delta,
        feature_changes = delta.feature_changes.len(),
        attribution_changes = delta.attribution_changes.len(),
        level_changed = delta.level_changed(),
        "scenario_delta_computed"
    );
    delta
}

/// Union of features on both sides: schema features first, in schema order,
/// then record-only keys by name. Independent of argument order.
struct FeatureOrder {
    ranked: Vec<FeatureKey>,
}

impl FeatureOrder {
    fn of(a: &PredictionResult, b: &PredictionResult) -> Self {
        let mut rank: BTreeMap<FeatureKey, usize> = BTreeMap::new();
        for contribution in a.contributions.iter().chain(&b.contributions) {
            let entry = rank
                .entry(contribution.feature.clone())
                .or_insert(contribution.schema_index);
            *entry = (*entry).min(contribution.schema_index);
        }
        for key in a.feature_values.keys().chain(b.feature_values.keys()) {
            rank.entry(key.clone()).or_insert(usize::MAX);
        }

        let mut ranked: Vec<(usize, FeatureKey)> =
            rank.into_iter().map(|(key, index)| (index, key)).collect();
        ranked.sort();
        Self {
            ranked: ranked.into_iter().map(|(_, key)| key).collect(),
        }
    }

    fn features(&self) -> impl Iterator<Item = &FeatureKey> {
        self.ranked.iter()
    }
}
