use std::{collections::BTreeMap, sync::Arc};

use crate::router::{ports::CapabilityPort, types::Intent};

/// Capabilities keyed by the intent they answer. At most one per intent.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    capabilities: BTreeMap<Intent, Arc<dyn CapabilityPort>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, capability: Arc<dyn CapabilityPort>) -> Self {
        self.register(capability);
        self
    }

    /// Registers `capability`, returning whichever capability it replaced.
    pub fn register(
        &mut self,
        capability: Arc<dyn CapabilityPort>,
    ) -> Option<Arc<dyn CapabilityPort>> {
        let intent = capability.intent();
        let replaced = self.capabilities.insert(intent, capability);
        if replaced.is_some() {
            tracing::warn!(target: "router", intent = %intent, "capability_replaced");
        }
        replaced
    }

    pub fn get(&self, intent: Intent) -> Option<Arc<dyn CapabilityPort>> {
        self.capabilities.get(&intent).cloned()
    }

    pub fn contains(&self, intent: Intent) -> bool {
        self.capabilities.contains_key(&intent)
    }

    pub fn intents(&self) -> impl Iterator<Item = Intent> + '_ {
        self.capabilities.keys().copied()
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("intents", &self.intents().collect::<Vec<_>>())
            .finish()
    }
}
