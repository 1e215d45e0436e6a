pub mod artifacts;
pub mod attribution;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod preprocess;
pub mod scorer;
pub mod types;
pub mod validator;

pub use artifacts::{LinearExplainer, MedianImputer, ModelArtifacts, StandardScaler};
pub use attribution::AttributionEngine;
pub use error::{
    InferenceError, MissingFeatures, PreprocessingError, TransformError, TransformErrorKind,
    TransformStage,
};
pub use pipeline::{InferencePipeline, RecordComparison};
pub use ports::{ExplainerPort, ImputerPort, ScalerPort};
pub use preprocess::Preprocessor;
pub use scorer::{RiskScorer, logistic, risk_level, top_negative, top_positive};
pub use types::{
    AttributionResult, Contribution, FeatureRecord, PredictionResult, PreprocessedVector,
    RawAttribution, RiskLevel,
};
pub use validator::FeatureValidator;
