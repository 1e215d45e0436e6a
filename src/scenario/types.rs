use serde::{Deserialize, Serialize};

use crate::{features::FeatureKey, inference::RiskLevel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureChange {
    pub feature: FeatureKey,
    pub from: f64,
    pub to: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionChange {
    pub feature: FeatureKey,
    pub delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OmissionReason {
    ZeroBaseline,
}

/// Percentage change against side "a", or an explicit marker that it was not computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RelativeChange {
    Computed { percent: f64 },
    Omitted { reason: OmissionReason },
}

impl RelativeChange {
    pub fn percent(self) -> Option<f64> {
        match self {
            Self::Computed { percent } => Some(percent),
            Self::Omitted { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub risk_delta: f64,
    pub relative_change: RelativeChange,
    pub from_level: RiskLevel,
    pub to_level: RiskLevel,
    pub feature_changes: Vec<FeatureChange>,
    /// Sorted by descending magnitude.
    pub attribution_changes: Vec<AttributionChange>,
}

impl ScenarioDelta {
    pub fn level_changed(&self) -> bool {
        self.from_level != self.to_level
    }

    pub fn feature_change(&self, feature: &str) -> Option<&FeatureChange> {
        self.feature_changes.iter().find(|c| c.feature == feature)
    }

    pub fn attribution_change(&self, feature: &str) -> Option<&AttributionChange> {
        self.attribution_changes.iter().find(|c| c.feature == feature)
    }
}
