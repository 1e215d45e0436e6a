use crate::inference::{error::TransformError, types::RawAttribution};

/// Pretrained imputation transform. Missing values arrive as NaN.
pub trait ImputerPort: Send + Sync {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, TransformError>;
}

/// Pretrained scaling transform.
pub trait ScalerPort: Send + Sync {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, TransformError>;
}

/// Pretrained additive explainer: `base_value + sum(contributions)` is the model's raw output.
pub trait ExplainerPort: Send + Sync {
    fn explain(&self, row: &[f64]) -> Result<RawAttribution, TransformError>;
}
