#[path = "../support/mod.rs"]
mod support;


use std::sync::Arc;

use cvd_agent::{
    router::{CapabilityRegistry, CapabilityRouter, Intent, RetrievalToggles},
    session::Session,
};

use crate::support::{EchoCapability, xy_pipeline};

pub fn echo_session() -> Session {
    let registry = CapabilityRegistry::new()
        .with(EchoCapability::new(Intent::Knowledge))
        .with(EchoCapability::new(Intent::Explanation))
        .with(EchoCapability::new(Intent::Intervention));
    let router = CapabilityRouter::with_default_keywords(registry).expect("router");
    Session::new(
        Arc::new(xy_pipeline()),
        Arc::new(router),
        RetrievalToggles::default(),
    )
}
