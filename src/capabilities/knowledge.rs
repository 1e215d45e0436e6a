use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    capabilities::{
        context::{ContextBuilder, source_refs},
        ports::TextGenerationPort,
        retrieval::RetrievalSources,
        types::GenerationTask,
    },
    router::{CapabilityError, CapabilityPort, CapabilityReply, Intent, ResolvedContext},
};

const PATIENT_FACTOR_LIMIT: usize = 5;

/// Answers general and clinical questions, grounded in guidelines and literature when enabled.
pub struct KnowledgeCapability {
    generator: Arc<dyn TextGenerationPort>,
    context: ContextBuilder,
    retrieval: RetrievalSources,
}

impl KnowledgeCapability {
    pub fn new(
        generator: Arc<dyn TextGenerationPort>,
        context: ContextBuilder,
        retrieval: RetrievalSources,
    ) -> Self {
        Self {
            generator,
            context,
            retrieval,
        }
    }
}

#[async_trait]
impl CapabilityPort for KnowledgeCapability {
    fn intent(&self) -> Intent {
        Intent::Knowledge
    }

    async fn handle(&self, resolved: ResolvedContext) -> Result<CapabilityReply, CapabilityError> {
        let mut passages = Vec::new();
        if resolved.retrieval.use_guidelines {
            passages.extend(self.retrieval.guidelines(&resolved.message).await);
        }
        if resolved.retrieval.use_literature {
            passages.extend(self.retrieval.literature(&resolved.message).await);
        }

        let factors = resolved
            .current_prediction
            .as_ref()
            .map(|prediction| self.context.strongest_factors(prediction, PATIENT_FACTOR_LIMIT))
            .unwrap_or_default();
        let generation =
            self.context
                .build(&resolved, GenerationTask::AnswerQuestion, factors, passages);

        let text = self.generator.generate(&generation).await?;
        Ok(CapabilityReply {
            intent: Intent::Knowledge,
            text,
            sources: source_refs(&generation.passages),
        })
    }
}
