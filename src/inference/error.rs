use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::FeatureKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformStage {
    /// The submitted record, before any transform runs.
    Input,
    Imputer,
    Scaler,
    Explainer,
}

impl fmt::Display for TransformStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Input => "input",
            Self::Imputer => "imputer",
            Self::Scaler => "scaler",
            Self::Explainer => "explainer",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformErrorKind {
    ShapeMismatch,
    InvalidInput,
    Internal,
}

/// What a pretrained transform reports when it refuses a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransformError {
    pub kind: TransformErrorKind,
    pub message: String,
    pub expected_width: Option<usize>,
}

impl TransformError {
    pub fn new(kind: TransformErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            expected_width: None,
        }
    }

    pub fn with_expected_width(mut self, width: usize) -> Self {
        self.expected_width = Some(width);
        self
    }
}

pub fn shape_mismatch(expected: usize, actual: usize) -> TransformError {
    TransformError::new(
        TransformErrorKind::ShapeMismatch,
        format!("expected {expected} features, got {actual}"),
    )
    .with_expected_width(expected)
}

pub fn invalid_input(message: impl Into<String>) -> TransformError {
    TransformError::new(TransformErrorKind::InvalidInput, message)
}

pub fn transform_internal(message: impl Into<String>) -> TransformError {
    TransformError::new(TransformErrorKind::Internal, message)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing features: {}", .features.join(", "))]
pub struct MissingFeatures {
    pub features: Vec<FeatureKey>,
}

/// Shape or type mismatch between a record and the pretrained transforms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage} rejected input (expected width {expected}, actual width {actual}): {detail}")]
pub struct PreprocessingError {
    pub stage: TransformStage,
    pub expected: usize,
    pub actual: usize,
    pub detail: String,
}

impl PreprocessingError {
    pub fn new(
        stage: TransformStage,
        expected: usize,
        actual: usize,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            expected,
            actual,
            detail: detail.into(),
        }
    }

    pub(crate) fn from_transform(
        stage: TransformStage,
        schema_width: usize,
        actual: usize,
        err: TransformError,
    ) -> Self {
        Self::new(
            stage,
            err.expected_width.unwrap_or(schema_width),
            actual,
            err.message,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error(transparent)]
    MissingFeatures(#[from] MissingFeatures),
    #[error(transparent)]
    Preprocessing(#[from] PreprocessingError),
}
