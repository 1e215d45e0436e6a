use crate::inference::types::{
    AttributionResult, Contribution, FeatureRecord, PredictionResult, RiskLevel, by_magnitude,
};

pub const MODERATE_RISK_THRESHOLD: f64 = 0.30;
pub const HIGH_RISK_THRESHOLD: f64 = 0.70;
pub const POSITIVE_PREDICTION_THRESHOLD: f64 = 0.5;

/// The only place a raw score becomes a probability.
pub fn logistic(raw_score: f64) -> f64 {
    1.0 / (1.0 + (-raw_score).exp())
}

pub fn risk_level(risk_score: f64) -> RiskLevel {
    if risk_score < MODERATE_RISK_THRESHOLD {
        RiskLevel::Low
    } else if risk_score < HIGH_RISK_THRESHOLD {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    }
}

pub fn binary_flag(risk_score: f64) -> u8 {
    u8::from(risk_score >= POSITIVE_PREDICTION_THRESHOLD)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer;

impl RiskScorer {
    pub fn score(
        &self,
        attribution: AttributionResult,
        feature_values: FeatureRecord,
    ) -> PredictionResult {
        let raw_score = attribution.raw_score();
        let risk_score = logistic(raw_score);

        let mut contributions = attribution.contributions;
        contributions.sort_by(by_magnitude);

        PredictionResult {
            risk_score,
            risk_level: risk_level(risk_score),
            binary_flag: binary_flag(risk_score),
            base_value: attribution.base_value,
            raw_score,
            contributions,
            feature_values,
        }
    }
}

/// Risk-increasing contributions, largest first.
pub fn top_positive(result: &PredictionResult, n: usize) -> Vec<Contribution> {
    top_by_sign(result, n, |value| value > 0.0)
}

/// Protective contributions, most negative first.
pub fn top_negative(result: &PredictionResult, n: usize) -> Vec<Contribution> {
    top_by_sign(result, n, |value| value < 0.0)
}

fn top_by_sign(
    result: &PredictionResult,
    n: usize,
    keep: impl Fn(f64) -> bool,
) -> Vec<Contribution> {
    let mut selected: Vec<Contribution> = result
        .contributions
        .iter()
        .filter(|c| keep(c.value))
        .cloned()
        .collect();
    selected.sort_by(by_magnitude);
    selected.truncate(n);
    selected
}
