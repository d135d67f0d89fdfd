//! Output chunks for code splitting

use serde::Serialize;

/// How a chunk got its modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkType {
    /// Named by the `manual_chunks` hook
    Manual,
    /// Left to the bundler's entry/dynamic-import grouping
    Default,
}

/// A chunk is a group of modules that will be bundled together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Chunk name (used for output filename)
    pub name: String,

    /// Type of chunk
    #[serde(rename = "type")]
    pub chunk_type: ChunkType,

    /// Module ids included in this chunk
    pub module_ids: Vec<String>,
}

impl Chunk {
    /// Create a new manual chunk
    pub fn manual(name: String, module_ids: Vec<String>) -> Self {
        Self {
            name,
            chunk_type: ChunkType::Manual,
            module_ids,
        }
    }

    /// Create the group of modules without an explicit assignment
    pub fn default_group(module_ids: Vec<String>) -> Self {
        Self {
            name: super::DEFAULT_CHUNK.to_string(),
            chunk_type: ChunkType::Default,
            module_ids,
        }
    }

    /// Check if chunk is empty
    pub fn is_empty(&self) -> bool {
        self.module_ids.is_empty()
    }

    /// Number of modules in chunk
    pub fn len(&self) -> usize {
        self.module_ids.len()
    }
}
