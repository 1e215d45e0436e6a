use async_trait::async_trait;

use crate::{
    capabilities::{
        error::RetrievalError,
        types::{GenerationContext, Passage},
    },
    router::CapabilityError,
};

#[async_trait]
pub trait TextGenerationPort: Send + Sync {
    async fn generate(&self, context: &GenerationContext) -> Result<String, CapabilityError>;
}

#[async_trait]
pub trait RetrievalPort: Send + Sync {
    /// At most `k` passages, best match first.
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Passage>, RetrievalError>;
}
