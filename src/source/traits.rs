use async_trait::async_trait;

use crate::detect::asset::AssetDescriptor;

/// Terminal result of loading one asset. Every variant counts as settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Ready,
    Failed(String),
    TimedOut,
}

impl ProbeOutcome {
    pub fn ok(&self) -> bool {
        matches!(self, ProbeOutcome::Ready)
    }
}

/// Capability that warms a single asset. Implementations never fail;
/// errors are folded into the returned outcome.
#[async_trait]
pub trait AssetProbe: Send + Sync {
    async fn probe(&self, asset: &AssetDescriptor) -> ProbeOutcome;
}
