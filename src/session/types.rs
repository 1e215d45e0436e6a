use serde::{Deserialize, Serialize};

use crate::inference::{Contribution, PredictionResult};

/// Result of `Session::analyze`: the prediction and its strongest factors in each direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub prediction: PredictionResult,
    pub top_risk_factors: Vec<Contribution>,
    pub protective_factors: Vec<Contribution>,
}
