use async_trait::async_trait;

use crate::capabilities::{error::RetrievalError, ports::RetrievalPort, types::Passage};

/// Retrieval stand-in for deployments without a guideline or literature index.
#[derive(Debug, Clone, Default)]
pub struct NoopRetrieval;

#[async_trait]
impl RetrievalPort for NoopRetrieval {
    async fn retrieve(&self, _query: &str, _k: usize) -> Result<Vec<Passage>, RetrievalError> {
        Ok(Vec::new())
    }
}
