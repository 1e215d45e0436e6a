#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cvd_agent::{
    capabilities::{
        GenerationContext, Passage, PassageKind, RetrievalError, RetrievalPort,
        TextGenerationPort,
    },
    features::FeatureSchema,
    inference::{
        ExplainerPort, FeatureRecord, ImputerPort, InferencePipeline, LinearExplainer,
        MedianImputer, RawAttribution, ScalerPort, StandardScaler, TransformError,
    },
    router::{CapabilityError, CapabilityPort, CapabilityReply, Intent, ResolvedContext},
};

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn schema(keys: &[&str]) -> FeatureSchema {
    FeatureSchema::new(keys.iter().copied()).expect("schema should be valid")
}

pub fn record(values: &[(&str, f64)]) -> FeatureRecord {
    values
        .iter()
        .fold(FeatureRecord::new(), |record, (key, value)| {
            record.with(*key, *value)
        })
}

/// Fills NaN with a fixed value and records each call.
pub struct RecordingImputer {
    pub fill: f64,
    pub log: CallLog,
}

impl ImputerPort for RecordingImputer {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, TransformError> {
        self.log
            .lock()
            .expect("log lock")
            .push(format!("imputer:{}", row.iter().filter(|v| v.is_nan()).count()));
        Ok(row
            .iter()
            .map(|value| if value.is_nan() { self.fill } else { *value })
            .collect())
    }
}

/// Identity scaler that records how many NaN it received.
pub struct RecordingScaler {
    pub log: CallLog,
}

impl ScalerPort for RecordingScaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, TransformError> {
        self.log
            .lock()
            .expect("log lock")
            .push(format!("scaler:{}", row.iter().filter(|v| v.is_nan()).count()));
        Ok(row.to_vec())
    }
}

/// Explainer driven by a closure over the preprocessed row.
pub struct ScriptedExplainer {
    script: Box<dyn Fn(&[f64]) -> Result<RawAttribution, TransformError> + Send + Sync>,
}

impl ScriptedExplainer {
    pub fn new(
        script: impl Fn(&[f64]) -> Result<RawAttribution, TransformError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
        }
    }

    /// `contribution_i = row_i`, so record values are the contributions.
    pub fn passthrough(base_value: f64) -> Self {
        Self::new(move |row| {
            Ok(RawAttribution {
                base_value,
                contributions: row.to_vec(),
            })
        })
    }
}

impl ExplainerPort for ScriptedExplainer {
    fn explain(&self, row: &[f64]) -> Result<RawAttribution, TransformError> {
        (self.script)(row)
    }
}

/// Imputer fills with 0, scaler is the identity, contributions equal the record values.
pub fn passthrough_pipeline(keys: &[&str], base_value: f64) -> InferencePipeline {
    InferencePipeline::new(
        schema(keys),
        Arc::new(MedianImputer {
            statistics: vec![0.0; keys.len()],
        }),
        Arc::new(StandardScaler {
            mean: vec![0.0; keys.len()],
            scale: vec![1.0; keys.len()],
        }),
        Arc::new(ScriptedExplainer::passthrough(base_value)),
    )
}

/// Two-feature linear model over `X` and `Y`: contributions are `0.05·X` and `Y`, base 0.
pub fn xy_pipeline() -> InferencePipeline {
    InferencePipeline::new(
        schema(&["X", "Y"]),
        Arc::new(MedianImputer {
            statistics: vec![0.0, 0.0],
        }),
        Arc::new(StandardScaler {
            mean: vec![0.0, 0.0],
            scale: vec![1.0, 1.0],
        }),
        Arc::new(LinearExplainer {
            intercept: 0.0,
            coefficients: vec![0.05, 1.0],
            background: vec![0.0, 0.0],
        }),
    )
}

pub fn logit(probability: f64) -> f64 {
    (probability / (1.0 - probability)).ln()
}

/// `X` as given; `Y` chosen so the risk score lands exactly on `risk`.
pub fn xy_record(x: f64, risk: f64) -> FeatureRecord {
    FeatureRecord::new()
        .with("X", x)
        .with("Y", logit(risk) - 0.05 * x)
}

/// Text generator that remembers every context it was handed.
#[derive(Default)]
pub struct RecordingGenerator {
    pub contexts: Mutex<Vec<GenerationContext>>,
    pub fail_with: Option<String>,
}

impl RecordingGenerator {
    pub fn failing(message: &str) -> Self {
        Self {
            contexts: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn last(&self) -> GenerationContext {
        self.contexts
            .lock()
            .expect("contexts lock")
            .last()
            .cloned()
            .expect("generator should have been called")
    }

    pub fn calls(&self) -> usize {
        self.contexts.lock().expect("contexts lock").len()
    }
}

#[async_trait]
impl TextGenerationPort for RecordingGenerator {
    async fn generate(&self, context: &GenerationContext) -> Result<String, CapabilityError> {
        self.contexts
            .lock()
            .expect("contexts lock")
            .push(context.clone());
        match &self.fail_with {
            Some(message) => Err(CapabilityError::Generation(message.clone())),
            None => Ok(format!("{:?} answer", context.intent)),
        }
    }
}

/// Retrieval backend returning canned passages and counting queries.
pub struct StaticRetrieval {
    pub kind: PassageKind,
    pub passages: usize,
    pub queries: Mutex<Vec<String>>,
}

impl StaticRetrieval {
    pub fn new(kind: PassageKind, passages: usize) -> Self {
        Self {
            kind,
            passages,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().expect("queries lock").len()
    }
}

#[async_trait]
impl RetrievalPort for StaticRetrieval {
    async fn retrieve(&self, query: &str, _k: usize) -> Result<Vec<Passage>, RetrievalError> {
        self.queries
            .lock()
            .expect("queries lock")
            .push(query.to_string());
        Ok((0..self.passages)
            .map(|index| Passage {
                kind: self.kind,
                text: format!("{:?} passage {index}", self.kind),
                source: format!("{:?}-source", self.kind).to_lowercase(),
                locator: format!("p{index}"),
            })
            .collect())
    }
}

pub struct FailingRetrieval;

#[async_trait]
impl RetrievalPort for FailingRetrieval {
    async fn retrieve(&self, _query: &str, _k: usize) -> Result<Vec<Passage>, RetrievalError> {
        Err(RetrievalError::Unavailable("index offline".to_string()))
    }
}

/// Capability that echoes and keeps the contexts it was dispatched.
pub struct EchoCapability {
    pub intent: Intent,
    pub seen: Mutex<Vec<ResolvedContext>>,
}

impl EchoCapability {
    pub fn new(intent: Intent) -> Arc<Self> {
        Arc::new(Self {
            intent,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn last(&self) -> ResolvedContext {
        self.seen
            .lock()
            .expect("seen lock")
            .last()
            .cloned()
            .expect("capability should have been dispatched")
    }
}

#[async_trait]
impl CapabilityPort for EchoCapability {
    fn intent(&self) -> Intent {
        self.intent
    }

    async fn handle(&self, context: ResolvedContext) -> Result<CapabilityReply, CapabilityError> {
        let text = context.message.clone();
        self.seen.lock().expect("seen lock").push(context);
        Ok(CapabilityReply {
            intent: self.intent,
            text,
            sources: Vec::new(),
        })
    }
}
