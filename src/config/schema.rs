//! Configuration schema definitions

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::bundler::ChunkRule;
use crate::plugins::ResourceHintsOptions;

use super::ConfigError;

/// HTML hint plugin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HintsConfig {
    /// Inject modulepreload/prefetch hints
    #[serde(default = "default_true")]
    pub resource_hints: bool,

    /// Clean up stylesheet links and style preloads
    #[serde(default = "default_true")]
    pub css_preload: bool,

    /// Non-vendor scripts that get a modulepreload
    #[serde(default = "default_critical_scripts")]
    pub critical_scripts: usize,

    /// Substring identifying the vendor chunk
    #[serde(default = "default_vendor_marker")]
    pub vendor_marker: String,

    /// Existing modulepreload hints containing one of these are replaced
    #[serde(default = "default_stale_markers")]
    pub stale_markers: Vec<String>,
}

impl Default for HintsConfig {
    fn default() -> Self {
        Self {
            resource_hints: true,
            css_preload: true,
            critical_scripts: default_critical_scripts(),
            vendor_marker: default_vendor_marker(),
            stale_markers: default_stale_markers(),
        }
    }
}

impl HintsConfig {
    pub fn resource_hints_options(&self) -> ResourceHintsOptions {
        ResourceHintsOptions {
            critical_scripts: self.critical_scripts,
            vendor_marker: self.vendor_marker.clone(),
            stale_markers: self.stale_markers.clone(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_critical_scripts() -> usize {
    2
}

fn default_vendor_marker() -> String {
    "vendor".to_string()
}

fn default_stale_markers() -> Vec<String> {
    vec!["vendor".to_string(), "index-".to_string()]
}

/// Which files `process` picks up inside a directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessConfig {
    /// Globs relative to the processed directory
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Globs excluded even when included
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: Vec::new(),
        }
    }
}

fn default_include() -> Vec<String> {
    vec!["**/*.html".to_string()]
}

impl ProcessConfig {
    /// Compile the include/exclude globs
    pub fn matcher(&self) -> Result<FileMatcher, ConfigError> {
        Ok(FileMatcher {
            include: build_globset(&self.include)?,
            exclude: build_globset(&self.exclude)?,
        })
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::InvalidGlob {
        pattern: patterns.join(", "),
        source,
    })
}

/// Compiled include/exclude globs
#[derive(Debug, Clone)]
pub struct FileMatcher {
    include: GlobSet,
    exclude: GlobSet,
}

impl FileMatcher {
    /// Check a path relative to the processed directory
    pub fn is_match(&self, relative: &Path) -> bool {
        self.include.is_match(relative) && !self.exclude.is_match(relative)
    }
}

/// Code-splitting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChunksConfig {
    /// Register the manual_chunks policy
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Extra rules, checked before the built-in ones
    #[serde(default)]
    pub rules: Vec<ChunkRule>,
}

impl Default for ChunksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rules: Vec::new(),
        }
    }
}
