use thiserror::Error;

use crate::router::{keywords::KeywordKind, types::Intent};

/// Raised by a capability while handling a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("text generation failed: {0}")]
    Generation(String),
    #[error("invalid capability context: {0}")]
    InvalidContext(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("no capability is configured for intent '{0}'")]
    CapabilityUnavailable(Intent),
    #[error("{intent} capability failed: {source}")]
    CapabilityFailed {
        intent: Intent,
        #[source]
        source: CapabilityError,
    },
    #[error("keyword '{keyword}' in {kind:?} set cannot be compiled: {message}")]
    InvalidKeyword {
        kind: KeywordKind,
        keyword: String,
        message: String,
    },
    #[error("routing pattern '{pattern}' cannot be compiled: {message}")]
    InvalidPattern { pattern: String, message: String },
}
