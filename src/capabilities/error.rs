use thiserror::Error;

/// Reported by a retrieval backend. Capabilities degrade to no passages on any variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrievalError {
    #[error("retrieval backend unavailable: {0}")]
    Unavailable(String),
    #[error("retrieval query failed: {0}")]
    Failed(String),
}
