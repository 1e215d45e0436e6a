use serde::{Deserialize, Serialize};

use crate::{
    features::FeatureCatalog,
    inference::{Contribution, PredictionResult},
};

/// Contribution magnitude above which a factor is a high-priority target.
pub const HIGH_PRIORITY_IMPACT: f64 = 0.1;
/// Contribution magnitude above which a factor is a medium-priority target.
pub const MEDIUM_PRIORITY_IMPACT: f64 = 0.05;

const HIGH_PLAN_TARGETS: usize = 3;
const MEDIUM_PLAN_TARGETS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    /// Both thresholds are strict: an impact of exactly 0.1 is medium.
    pub fn of(impact: f64) -> Self {
        let magnitude = impact.abs();
        if magnitude > HIGH_PRIORITY_IMPACT {
            Self::High
        } else if magnitude > MEDIUM_PRIORITY_IMPACT {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Risk-increasing contributions on features an intervention can change, largest first.
pub fn modifiable_risk_factors(
    catalog: &FeatureCatalog,
    prediction: &PredictionResult,
    limit: usize,
) -> Vec<Contribution> {
    prediction
        .contributions
        .iter()
        .filter(|contribution| contribution.value > 0.0)
        .filter(|contribution| catalog.is_modifiable(&contribution.feature))
        .take(limit)
        .cloned()
        .collect()
}

/// Modifiable risk factors bucketed by impact, each tier in descending magnitude.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterventionPriorities {
    pub high: Vec<Contribution>,
    pub medium: Vec<Contribution>,
    pub low: Vec<Contribution>,
}

impl InterventionPriorities {
    pub fn of(catalog: &FeatureCatalog, prediction: &PredictionResult) -> Self {
        let mut priorities = Self::default();
        for contribution in modifiable_risk_factors(catalog, prediction, usize::MAX) {
            match PriorityTier::of(contribution.value) {
                PriorityTier::High => priorities.high.push(contribution),
                PriorityTier::Medium => priorities.medium.push(contribution),
                PriorityTier::Low => priorities.low.push(contribution),
            }
        }
        priorities
    }

    pub fn tier(&self, tier: PriorityTier) -> &[Contribution] {
        match tier {
            PriorityTier::High => &self.high,
            PriorityTier::Medium => &self.medium,
            PriorityTier::Low => &self.low,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.medium.is_empty() && self.low.is_empty()
    }

    /// Up to three high and two medium targets first; any slots left under `limit`
    /// go to the remaining factors in tier order.
    pub fn plan_targets(&self, limit: usize) -> Vec<(PriorityTier, Contribution)> {
        let mut picked = Vec::new();
        let mut rest = Vec::new();
        for (tier, quota) in [
            (PriorityTier::High, HIGH_PLAN_TARGETS),
            (PriorityTier::Medium, MEDIUM_PLAN_TARGETS),
            (PriorityTier::Low, 0),
        ] {
            let entries = self.tier(tier);
            let split = quota.min(entries.len());
            picked.extend(entries[..split].iter().map(|c| (tier, c.clone())));
            rest.extend(entries[split..].iter().map(|c| (tier, c.clone())));
        }
        picked.extend(rest);
        picked.truncate(limit);
        picked
    }
}
