use serde::{Deserialize, Serialize};

use crate::{
    capabilities::priorities::PriorityTier,
    features::{FeatureCategory, FeatureKey},
    inference::RiskLevel,
    router::{ComparisonOutcome, Intent},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassageKind {
    Guideline,
    Literature,
}

/// One retrieved snippet with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub kind: PassageKind,
    pub text: String,
    pub source: String,
    /// Page, PMID or similar pointer inside `source`.
    pub locator: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    Brief,
    #[default]
    Moderate,
    Detailed,
}

impl DetailLevel {
    pub fn factor_limit(self) -> usize {
        match self {
            Self::Brief => 3,
            Self::Moderate => 5,
            Self::Detailed => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionFocus {
    Lifestyle,
    Medical,
    #[default]
    All,
}

impl InterventionFocus {
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Lifestyle => "lifestyle modifications: diet, exercise, stress management",
            Self::Medical => "medical interventions: medications, clinical monitoring",
            Self::All => "both lifestyle and medical interventions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTimeframe {
    OneMonth,
    #[default]
    ThreeMonths,
    SixMonths,
}

impl PlanTimeframe {
    pub fn duration(self) -> &'static str {
        match self {
            Self::OneMonth => "1 month",
            Self::ThreeMonths => "3 months",
            Self::SixMonths => "6 months",
        }
    }

    pub fn max_goals(self) -> usize {
        match self {
            Self::OneMonth => 2,
            Self::ThreeMonths => 3,
            Self::SixMonths => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    IncreasesRisk,
    DecreasesRisk,
}

impl Direction {
    pub fn of(contribution: f64) -> Self {
        if contribution > 0.0 {
            Self::IncreasesRisk
        } else {
            Self::DecreasesRisk
        }
    }
}

/// A contribution enriched with catalog metadata, ready for a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorFact {
    pub feature: FeatureKey,
    pub name: String,
    pub category: FeatureCategory,
    pub value: Option<f64>,
    pub unit: String,
    pub normal_range: String,
    pub contribution: f64,
    pub direction: Direction,
    /// Set only when the factor is an intervention target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<PriorityTier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub binary_flag: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum GenerationTask {
    ExplainPrediction {
        detail: DetailLevel,
    },
    CompareScenarios {
        detail: DetailLevel,
    },
    RecommendInterventions {
        focus: InterventionFocus,
        timeframe: PlanTimeframe,
        max_goals: usize,
    },
    /// Propose what-if scenarios over the listed modifiable factors.
    SuggestScenarios {
        count: usize,
    },
    /// Explain the single factor in `factors`.
    ExplainFeature,
    AnswerQuestion,
}

/// Structured input handed to the text generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationContext {
    pub intent: Intent,
    pub task: GenerationTask,
    pub question: String,
    pub risk: Option<RiskSummary>,
    pub factors: Vec<FactorFact>,
    pub comparison: ComparisonOutcome,
    pub scenario_labels: Vec<String>,
    pub passages: Vec<Passage>,
}
