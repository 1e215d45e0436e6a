use async_trait::async_trait;

use crate::router::{
    error::CapabilityError,
    types::{CapabilityReply, Intent, ResolvedContext},
};

#[async_trait]
pub trait CapabilityPort: Send + Sync {
    /// The single intent this capability answers.
    fn intent(&self) -> Intent;

    async fn handle(&self, context: ResolvedContext) -> Result<CapabilityReply, CapabilityError>;
}
