//! Code-splitting hook backed by a [`ChunkPolicy`]

use crate::bundler::ChunkPolicy;

use super::Plugin;

/// Answers `manual_chunks` from a chunk policy
pub struct ManualChunksPlugin {
    policy: ChunkPolicy,
}

impl ManualChunksPlugin {
    pub fn new(policy: ChunkPolicy) -> Self {
        Self { policy }
    }
}

impl Default for ManualChunksPlugin {
    fn default() -> Self {
        Self::new(ChunkPolicy::default())
    }
}

impl Plugin for ManualChunksPlugin {
    fn name(&self) -> &str {
        "manual-chunks"
    }

    fn manual_chunks(&self, module_id: &str) -> Option<String> {
        self.policy.assign(module_id).map(str::to_string)
    }
}
