use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    features::FeatureKey,
    inference::{FeatureRecord, PredictionResult},
    scenario::ScenarioDelta,
    session::ScenarioRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Knowledge,
    Explanation,
    Intervention,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Knowledge => "knowledge",
            Self::Explanation => "explanation",
            Self::Intervention => "intervention",
        };
        f.write_str(name)
    }
}

/// Which entry of the routing table selected the intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingRule {
    ExplicitTag,
    ClinicalQuestion,
    Research,
    Comparison,
    Explanation,
    PlanQuestionReroute,
    Plan,
    Default,
    /// Addressed to a capability by a session operation, not classified.
    Direct,
}

/// What a capability is asked to produce beyond its open-ended default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CapabilityRequest {
    #[default]
    Open,
    SuggestScenarios,
    ExplainFeature {
        feature: FeatureKey,
    },
}

fn default_enabled_true() -> bool {
    true
}

/// Optional retrieval features a capability may consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalToggles {
    #[serde(default = "default_enabled_true")]
    pub use_guidelines: bool,
    #[serde(default = "default_enabled_true")]
    pub use_literature: bool,
}

impl Default for RetrievalToggles {
    fn default() -> Self {
        Self {
            use_guidelines: true,
            use_literature: true,
        }
    }
}

impl RetrievalToggles {
    /// Per-call view; `self` is left untouched for the next request.
    pub fn resolve(self, overrides: Option<&RetrievalOverrides>) -> Self {
        let Some(overrides) = overrides else {
            return self;
        };
        Self {
            use_guidelines: overrides.use_guidelines.unwrap_or(self.use_guidelines),
            use_literature: overrides.use_literature.unwrap_or(self.use_literature),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RetrievalOverrides {
    #[serde(default)]
    pub use_guidelines: Option<bool>,
    #[serde(default)]
    pub use_literature: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOmission {
    EmptyHistory,
    NoCurrentPrediction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonContext {
    pub baseline: PredictionResult,
    pub scenario_label: String,
    pub scenario: PredictionResult,
    pub delta: ScenarioDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    NotRequested,
    Ready(Box<ComparisonContext>),
    Omitted { reason: ComparisonOmission },
}

impl ComparisonOutcome {
    pub fn ready(&self) -> Option<&ComparisonContext> {
        match self {
            Self::Ready(context) => Some(context),
            _ => None,
        }
    }
}

/// Everything a capability receives for one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedContext {
    pub intent: Intent,
    pub rule: RoutingRule,
    #[serde(default)]
    pub request: CapabilityRequest,
    pub message: String,
    pub retrieval: RetrievalToggles,
    pub current_prediction: Option<PredictionResult>,
    pub current_patient_record: Option<FeatureRecord>,
    pub scenario_history: Vec<ScenarioRecord>,
    pub comparison: ComparisonOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub source: String,
    pub locator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityReply {
    pub intent: Intent,
    pub text: String,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}
