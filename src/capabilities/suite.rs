use std::sync::Arc;

use crate::{
    capabilities::{
        context::ContextBuilder,
        explanation::ExplanationCapability,
        intervention::InterventionCapability,
        knowledge::KnowledgeCapability,
        noop::NoopRetrieval,
        ports::{RetrievalPort, TextGenerationPort},
        retrieval::RetrievalSources,
    },
    config::CapabilitiesConfig,
    features::FeatureCatalog,
    router::CapabilityRegistry,
};

/// Collaborators shared by the three generative capabilities.
pub struct CapabilitySuite {
    generator: Arc<dyn TextGenerationPort>,
    guidelines: Arc<dyn RetrievalPort>,
    literature: Arc<dyn RetrievalPort>,
    catalog: Arc<FeatureCatalog>,
    settings: CapabilitiesConfig,
}

impl CapabilitySuite {
    /// No retrieval backends, the CML-CVD catalog and default settings.
    pub fn new(generator: Arc<dyn TextGenerationPort>) -> Self {
        Self {
            generator,
            guidelines: Arc::new(NoopRetrieval),
            literature: Arc::new(NoopRetrieval),
            catalog: Arc::new(FeatureCatalog::cml_cvd()),
            settings: CapabilitiesConfig::default(),
        }
    }

    pub fn with_guidelines(mut self, guidelines: Arc<dyn RetrievalPort>) -> Self {
        self.guidelines = guidelines;
        self
    }

    pub fn with_literature(mut self, literature: Arc<dyn RetrievalPort>) -> Self {
        self.literature = literature;
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<FeatureCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_settings(mut self, settings: CapabilitiesConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn into_registry(self) -> CapabilityRegistry {
        let context = ContextBuilder::new(self.catalog);
        let retrieval =
            RetrievalSources::new(self.guidelines, self.literature, self.settings.retrieval_k);

        CapabilityRegistry::new()
            .with(Arc::new(ExplanationCapability::new(
                self.generator.clone(),
                context.clone(),
                self.settings.explanation_detail,
            )))
            .with(Arc::new(InterventionCapability::new(
                self.generator.clone(),
                context.clone(),
                retrieval.clone(),
                self.settings.intervention_focus,
                self.settings.plan_timeframe,
            )))
            .with(Arc::new(KnowledgeCapability::new(
                self.generator,
                context,
                retrieval,
            )))
    }
}
