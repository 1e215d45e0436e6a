#[path = "../support/mod.rs"]
mod support;

mod dispatch;

use cvd_agent::{
    inference::PredictionResult,
    router::{CapabilityRegistry, CapabilityRouter, Intent},
    session::{ScenarioRecord, SessionState},
};

use crate::support::{EchoCapability, xy_pipeline, xy_record};

pub fn full_registry() -> CapabilityRegistry {
    CapabilityRegistry::new()
        .with(EchoCapability::new(Intent::Knowledge))
        .with(EchoCapability::new(Intent::Explanation))
        .with(EchoCapability::new(Intent::Intervention))
}

pub fn router() -> CapabilityRouter {
    CapabilityRouter::with_default_keywords(full_registry()).expect("router should build")
}

pub fn prediction(x: f64, risk: f64) -> PredictionResult {
    xy_pipeline()
        .run_inference(xy_record(x, risk))
        .expect("inference should succeed")
}

pub fn state_with(
    current: Option<PredictionResult>,
    scenarios: Vec<(&str, PredictionResult)>,
) -> SessionState {
    let mut state = SessionState::default();
    if let Some(current) = current {
        state.set_current(current.feature_values.clone(), current);
    }
    state.scenario_history = scenarios
        .into_iter()
        .map(|(label, prediction)| ScenarioRecord {
            label: label.to_string(),
            prediction,
        })
        .collect();
    state
}
