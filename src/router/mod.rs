pub mod classifier;
pub mod dispatch;
pub mod error;
pub mod keywords;
pub mod ports;
pub mod registry;
pub mod types;

pub use classifier::{CapabilityTag, Classification, IntentClassifier, RoutingFacts};
pub use dispatch::CapabilityRouter;
pub use error::{CapabilityError, RouterError};
pub use keywords::{KeywordExtensions, KeywordKind, KeywordSet, KeywordSets};
pub use ports::CapabilityPort;
pub use registry::CapabilityRegistry;
pub use types::{
    CapabilityReply, CapabilityRequest, ComparisonContext, ComparisonOmission, ComparisonOutcome, Intent,
    ResolvedContext, RetrievalOverrides, RetrievalToggles, RoutingRule, SourceRef,
};
