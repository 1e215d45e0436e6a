pub mod context;
pub mod error;
pub mod explanation;
pub mod intervention;
pub mod knowledge;
pub mod noop;
pub mod ports;
pub mod priorities;
pub mod retrieval;
pub mod suite;
pub mod types;

pub use context::{ContextBuilder, source_refs};
pub use error::RetrievalError;
pub use explanation::ExplanationCapability;
pub use intervention::InterventionCapability;
pub use knowledge::KnowledgeCapability;
pub use noop::NoopRetrieval;
pub use ports::{RetrievalPort, TextGenerationPort};
pub use priorities::{
    HIGH_PRIORITY_IMPACT, InterventionPriorities, MEDIUM_PRIORITY_IMPACT, PriorityTier,
    modifiable_risk_factors,
};
pub use retrieval::RetrievalSources;
pub use suite::CapabilitySuite;
pub use types::{
    DetailLevel, Direction, FactorFact, GenerationContext, GenerationTask, InterventionFocus,
    Passage, PassageKind, PlanTimeframe, RiskSummary,
};
