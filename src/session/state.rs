use serde::{Deserialize, Serialize};

use crate::{
    inference::{FeatureRecord, PredictionResult},
    router::RetrievalToggles,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub label: String,
    pub prediction: PredictionResult,
}

/// Per-conversation state. Changed only by `analyze` and `add_scenario`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub current_prediction: Option<PredictionResult>,
    pub current_patient_record: Option<FeatureRecord>,
    /// Append-only, oldest first.
    pub scenario_history: Vec<ScenarioRecord>,
    pub retrieval_defaults: RetrievalToggles,
}

impl SessionState {
    pub fn with_retrieval_defaults(retrieval_defaults: RetrievalToggles) -> Self {
        Self {
            retrieval_defaults,
            ..Self::default()
        }
    }

    /// The most recently added scenario.
    pub fn latest_scenario(&self) -> Option<&ScenarioRecord> {
        self.scenario_history.last()
    }

    pub fn set_current(&mut self, record: FeatureRecord, prediction: PredictionResult) {
        self.current_patient_record = Some(record);
        self.current_prediction = Some(prediction);
    }

    /// Appends a scenario, labelling it `Scenario N` when no label is given.
    pub fn push_scenario(&mut self, label: Option<String>, prediction: PredictionResult) -> String {
        let label = label
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| format!("Scenario {}", self.scenario_history.len() + 1));
        self.scenario_history.push(ScenarioRecord {
            label: label.clone(),
            prediction,
        });
        label
    }
}
