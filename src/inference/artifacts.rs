use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{
    config::ModelConfig,
    features::FeatureSchema,
    inference::{
        error::{TransformError, invalid_input, shape_mismatch},
        pipeline::InferencePipeline,
        ports::{ExplainerPort, ImputerPort, ScalerPort},
        types::RawAttribution,
    },
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianImputer {
    pub statistics: Vec<f64>,
}

impl ImputerPort for MedianImputer {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, TransformError> {
        if row.len() != self.statistics.len() {
            return Err(shape_mismatch(self.statistics.len(), row.len()));
        }
        Ok(row
            .iter()
            .zip(&self.statistics)
            .map(|(value, fill)| if value.is_nan() { *fill } else { *value })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl ScalerPort for StandardScaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, TransformError> {
        if row.len() != self.mean.len() {
            return Err(shape_mismatch(self.mean.len(), row.len()));
        }
        if row.iter().any(|value| value.is_nan()) {
            return Err(invalid_input("scaler received NaN; impute before scaling"));
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| {
                // constant columns are fitted with zero variance
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (value - mean) / scale
            })
            .collect())
    }
}

/// Exact additive attribution of a linear logit model against a background point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearExplainer {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub background: Vec<f64>,
}

impl ExplainerPort for LinearExplainer {
    fn explain(&self, row: &[f64]) -> Result<RawAttribution, TransformError> {
        if row.len() != self.coefficients.len() {
            return Err(shape_mismatch(self.coefficients.len(), row.len()));
        }
        let base_value = self.intercept
            + self
                .coefficients
                .iter()
                .zip(&self.background)
                .map(|(coef, reference)| coef * reference)
                .sum::<f64>();
        let contributions = row
            .iter()
            .zip(self.coefficients.iter().zip(&self.background))
            .map(|(value, (coef, reference))| coef * (value - reference))
            .collect();
        Ok(RawAttribution {
            base_value,
            contributions,
        })
    }
}

/// Pretrained transforms serialised as one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifacts {
    pub feature_names: Vec<String>,
    pub imputer: MedianImputer,
    pub scaler: StandardScaler,
    pub explainer: LinearExplainer,
}

impl ModelArtifacts {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read model artifacts {}", path.display()))?;
        let artifacts: ModelArtifacts = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse model artifacts {}", path.display()))?;
        artifacts.check_widths()?;
        Ok(artifacts)
    }

    /// Loads from `model.artifacts_path`, already resolved against the config directory.
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let path = config
            .artifacts_path
            .as_deref()
            .context("model.artifacts_path is not configured")?;
        Self::load(path)
    }

    pub fn schema(&self) -> Result<FeatureSchema> {
        FeatureSchema::new(self.feature_names.clone())
            .context("invalid feature_names in model artifacts")
    }

    pub fn check_widths(&self) -> Result<()> {
        let width = self.feature_names.len();
        let widths = [
            ("imputer.statistics", self.imputer.statistics.len()),
            ("scaler.mean", self.scaler.mean.len()),
            ("scaler.scale", self.scaler.scale.len()),
            ("explainer.coefficients", self.explainer.coefficients.len()),
            ("explainer.background", self.explainer.background.len()),
        ];
        for (name, len) in widths {
            if len != width {
                return Err(anyhow!(
                    "model artifact {name} has {len} entries but feature_names has {width}"
                ));
            }
        }
        Ok(())
    }

    pub fn into_pipeline(self) -> Result<InferencePipeline> {
        self.check_widths()?;
        let schema = self.schema()?;
        Ok(InferencePipeline::new(
            schema,
            Arc::new(self.imputer),
            Arc::new(self.scaler),
            Arc::new(self.explainer),
        ))
    }
}
