//! Chunk assignment policy
//!
//! Maps a resolved module path to the name of the output chunk it belongs
//! to. Rules are checked in order and the first match wins, so every
//! third-party module lands in exactly one chunk.

use serde::{Deserialize, Serialize};

use crate::utils::path_to_module_id;

/// Chunk that groups React, ReactDOM and every unlisted dependency
pub const VENDOR_CHUNK: &str = "vendor";

/// A refinement inside a rule, checked before falling back to the rule's chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChunkVariant {
    /// Matches when the module id contains any of these
    pub patterns: Vec<String>,

    /// Chunk name to assign
    pub chunk: String,
}

/// One ordered policy rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChunkRule {
    /// Matches when the module id contains any of these
    pub patterns: Vec<String>,

    /// Chunk name when no variant matches
    pub chunk: String,

    /// Narrower chunks for subsets of the matched modules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<ChunkVariant>,
}

impl ChunkRule {
    pub fn new(patterns: &[&str], chunk: &str) -> Self {
        Self {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            chunk: chunk.to_string(),
            variants: Vec::new(),
        }
    }

    pub fn with_variant(mut self, patterns: &[&str], chunk: &str) -> Self {
        self.variants.push(ChunkVariant {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            chunk: chunk.to_string(),
        });
        self
    }

    fn matches(&self, module_id: &str) -> bool {
        contains_any(module_id, &self.patterns)
    }

    fn resolve(&self, module_id: &str) -> &str {
        self.variants
            .iter()
            .find(|v| contains_any(module_id, &v.patterns))
            .map_or(self.chunk.as_str(), |v| v.chunk.as_str())
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

/// Rules for a React application bundle
pub fn builtin_rules() -> Vec<ChunkRule> {
    vec![
        // React core shares the vendor chunk so it loads with its dependents
        ChunkRule::new(&["node_modules/react/", "node_modules/react-dom/"], VENDOR_CHUNK),
        ChunkRule::new(&["node_modules/react-router"], "react-router"),
        ChunkRule::new(&["node_modules/@tanstack/react-query"], "react-query"),
        ChunkRule::new(&["node_modules/framer-motion"], "framer-motion"),
        ChunkRule::new(&["node_modules/@radix-ui"], "radix-ui")
            .with_variant(&["dialog", "alert-dialog"], "radix-dialog")
            .with_variant(&["select", "dropdown"], "radix-select"),
        ChunkRule::new(&["node_modules/lucide-react"], "lucide-icons"),
        ChunkRule::new(&["node_modules"], VENDOR_CHUNK),
    ]
}

/// Ordered chunk rules
#[derive(Debug, Clone)]
pub struct ChunkPolicy {
    rules: Vec<ChunkRule>,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }
}

impl ChunkPolicy {
    /// Policy with user rules checked ahead of the built-in ones.
    ///
    /// React core stays first: it must share the vendor chunk whatever the
    /// user rules say.
    pub fn with_rules(user_rules: Vec<ChunkRule>) -> Self {
        let mut builtin = builtin_rules().into_iter();
        let rules = builtin
            .next()
            .into_iter()
            .chain(user_rules)
            .chain(builtin)
            .collect();
        Self { rules }
    }

    /// Policy made only of the given rules
    pub fn from_rules(rules: Vec<ChunkRule>) -> Self {
        Self { rules }
    }

    /// Chunk name for a module, or None to leave it to default grouping
    pub fn assign(&self, module_id: &str) -> Option<&str> {
        let id = path_to_module_id(module_id);
        self.rules
            .iter()
            .find(|rule| rule.matches(&id))
            .map(|rule| rule.resolve(&id))
    }
}
