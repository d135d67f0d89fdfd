//! Code-splitting decisions
//!
//! The bundler asks the `manual_chunks` hook about every module while it
//! finalizes the dependency graph. This module holds the policy answering
//! that question and the grouping of a module list into chunks.

mod chunk;
mod policy;

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

pub use chunk::{Chunk, ChunkType};
pub use policy::{builtin_rules, ChunkPolicy, ChunkRule, ChunkVariant, VENDOR_CHUNK};

/// Name of the group for modules without an explicit assignment
pub const DEFAULT_CHUNK: &str = "(default)";

/// Modules grouped by chunk
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChunkPlan {
    /// Manual chunks in first-seen order, then the default group if non-empty
    pub chunks: Vec<Chunk>,
}

impl ChunkPlan {
    /// Chunk containing a module id
    pub fn chunk_for(&self, module_id: &str) -> Option<&Chunk> {
        self.chunks
            .iter()
            .find(|c| c.module_ids.iter().any(|id| id == module_id))
    }

    /// Manual chunk names, in order
    pub fn names(&self) -> Vec<&str> {
        self.chunks
            .iter()
            .filter(|c| c.chunk_type == ChunkType::Manual)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Total number of modules across all chunks
    pub fn module_count(&self) -> usize {
        self.chunks.iter().map(Chunk::len).sum()
    }
}

/// Group module ids into chunks using `assign`.
///
/// Each distinct id lands in exactly one chunk; repeated ids are kept once.
pub fn plan_chunks<'a, F, I>(assign: F, module_ids: I) -> ChunkPlan
where
    F: Fn(&str) -> Option<String>,
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut order: Vec<String> = Vec::new();
    let mut manual: HashMap<String, Vec<String>> = HashMap::new();
    let mut unassigned = Vec::new();

    for id in module_ids {
        if !seen.insert(id) {
            continue;
        }

        match assign(id) {
            Some(name) => {
                debug!("{} -> {}", id, name);
                if !manual.contains_key(&name) {
                    order.push(name.clone());
                }
                manual.entry(name).or_default().push(id.to_string());
            }
            None => unassigned.push(id.to_string()),
        }
    }

    let mut chunks: Vec<Chunk> = order
        .into_iter()
        .filter_map(|name| {
            let ids = manual.remove(&name)?;
            Some(Chunk::manual(name, ids))
        })
        .collect();

    if !unassigned.is_empty() {
        chunks.push(Chunk::default_group(unassigned));
    }

    ChunkPlan { chunks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plan_groups_by_policy() {
        let policy = ChunkPolicy::default();
        let ids = [
            "node_modules/react/index.js",
            "src/main.tsx",
            "node_modules/@radix-ui/react-dialog/index.js",
            "node_modules/react-dom/index.js",
            "node_modules/@radix-ui/react-tooltip/index.js",
            "src/App.tsx",
            "node_modules/react/index.js",
        ];

        let plan = plan_chunks(|id| policy.assign(id).map(str::to_string), ids);

        assert_eq!(plan.names(), vec!["vendor", "radix-dialog", "radix-ui"]);
        assert_eq!(
            plan.chunk_for("node_modules/react-dom/index.js").map(|c| c.name.as_str()),
            Some("vendor")
        );
        assert_eq!(plan.chunks[0].module_ids.len(), 2);

        let default = plan.chunks.last().unwrap();
        assert_eq!(default.chunk_type, ChunkType::Default);
        assert_eq!(default.module_ids, vec!["src/main.tsx", "src/App.tsx"]);
        assert_eq!(plan.module_count(), 6);
    }

    #[test]
    fn test_every_module_in_exactly_one_chunk() {
        let policy = ChunkPolicy::default();
        let ids = [
            "node_modules/lucide-react/dist/esm/icons/x.js",
            "node_modules/@radix-ui/react-select/index.js",
            "node_modules/framer-motion/dist/index.mjs",
            "node_modules/clsx/index.js",
            "src/lib/utils.ts",
        ];

        let plan = plan_chunks(|id| policy.assign(id).map(str::to_string), ids);

        for id in ids {
            let owners = plan
                .chunks
                .iter()
                .filter(|c| c.module_ids.iter().any(|m| m == id))
                .count();
            assert_eq!(owners, 1, "{}", id);
        }
    }

    #[test]
    fn test_plan_serializes() {
        let plan = plan_chunks(|_| None, ["src/a.ts"]);
        let json = serde_json::to_value(&plan).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "chunks": [{ "name": "(default)", "type": "default", "module_ids": ["src/a.ts"] }]
            })
        );
    }
}
