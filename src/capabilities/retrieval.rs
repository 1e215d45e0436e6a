use std::sync::Arc;

use crate::capabilities::{
    noop::NoopRetrieval,
    ports::RetrievalPort,
    types::{Passage, PassageKind},
};

/// Guideline and literature backends sharing one result budget.
#[derive(Clone)]
pub struct RetrievalSources {
    guidelines: Arc<dyn RetrievalPort>,
    literature: Arc<dyn RetrievalPort>,
    k: usize,
}

impl Default for RetrievalSources {
    fn default() -> Self {
        Self::new(Arc::new(NoopRetrieval), Arc::new(NoopRetrieval), 3)
    }
}

impl RetrievalSources {
    pub fn new(
        guidelines: Arc<dyn RetrievalPort>,
        literature: Arc<dyn RetrievalPort>,
        k: usize,
    ) -> Self {
        Self {
            guidelines,
            literature,
            k,
        }
    }

    pub async fn guidelines(&self, query: &str) -> Vec<Passage> {
        self.fetch(self.guidelines.as_ref(), PassageKind::Guideline, query)
            .await
    }

    pub async fn literature(&self, query: &str) -> Vec<Passage> {
        self.fetch(self.literature.as_ref(), PassageKind::Literature, query)
            .await
    }

    // Failures degrade to no passages; retrying belongs to the backend.
    async fn fetch(
        &self,
        port: &dyn RetrievalPort,
        kind: PassageKind,
        query: &str,
    ) -> Vec<Passage> {
        match port.retrieve(query, self.k).await {
            Ok(mut passages) => {
                passages.truncate(self.k);
                tracing::debug!(
                    target: "capabilities",
                    kind = ?kind,
                    passages = passages.len(),
                    "retrieval_completed"
                );
                passages
            }
            Err(err) => {
                tracing::warn!(
                    target: "capabilities",
                    kind = ?kind,
                    error = %err,
                    "retrieval_degraded"
                );
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for RetrievalSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalSources")
            .field("k", &self.k)
            .finish_non_exhaustive()
    }
}
