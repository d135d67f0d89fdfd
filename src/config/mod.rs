//! Configuration handling for Hintweave
//!
//! Parses and manages hintweave.toml configuration files.

mod schema;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use schema::*;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "hintweave.toml";

/// Invalid values in an otherwise well-formed config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("hints.critical_scripts must be at least 1")]
    NoCriticalScripts,

    #[error("hints.vendor_marker must not be empty")]
    EmptyVendorMarker,

    #[error("hints.stale_markers must not contain empty strings")]
    EmptyStaleMarker,

    #[error("invalid glob '{pattern}'")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("chunk rule #{index} needs a non-empty chunk name and at least one non-empty pattern")]
    InvalidChunkRule { index: usize },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTML hint plugins
    #[serde(default)]
    pub hints: HintsConfig,

    /// File selection for `process`
    #[serde(default)]
    pub process: ProcessConfig,

    /// Code-splitting policy
    #[serde(default)]
    pub chunks: ChunksConfig,
}

impl Config {
    /// Load configuration from a file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to load {}", path.display()))
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse hintweave.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or fall back to defaults when `path` is the default
    /// file name and no such file exists
    pub fn discover(path: &str) -> Result<Self> {
        if path == CONFIG_FILE && !Path::new(path).exists() {
            debug!("No {} found, using defaults", CONFIG_FILE);
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.hints.critical_scripts == 0 {
            return Err(ConfigError::NoCriticalScripts);
        }

        if self.hints.vendor_marker.is_empty() {
            return Err(ConfigError::EmptyVendorMarker);
        }

        if self.hints.stale_markers.iter().any(String::is_empty) {
            return Err(ConfigError::EmptyStaleMarker);
        }

        self.process.matcher()?;

        for (index, rule) in self.chunks.rules.iter().enumerate() {
            let patterns_ok = !rule.patterns.is_empty() && rule.patterns.iter().all(|p| !p.is_empty());
            let variants_ok = rule
                .variants
                .iter()
                .all(|v| !v.chunk.is_empty() && !v.patterns.is_empty() && v.patterns.iter().all(|p| !p.is_empty()));

            if rule.chunk.is_empty() || !patterns_ok || !variants_ok {
                return Err(ConfigError::InvalidChunkRule { index });
            }
        }

        Ok(())
    }
}

/// Config file written by `hintweave init`
pub fn default_config_toml() -> &'static str {
    r#"# Hintweave configuration

[hints]
# Inject modulepreload/prefetch hints before the entry module script
resource_hints = true
# Strip crossorigin from stylesheet links and drop duplicate style preloads
css_preload = true
# Non-vendor scripts preloaded eagerly; later scripts are prefetched
critical_scripts = 2
vendor_marker = "vendor"
stale_markers = ["vendor", "index-"]

[process]
include = ["**/*.html"]
exclude = []

[chunks]
enabled = true

# Rules are checked before the built-in Radix/Lucide/vendor table.
# React and ReactDOM always stay in the vendor chunk.
# [[chunks.rules]]
# patterns = ["node_modules/zod"]
# chunk = "zod"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert!(config.hints.resource_hints);
        assert!(config.hints.css_preload);
        assert_eq!(config.hints.critical_scripts, 2);
        assert_eq!(config.hints.stale_markers, vec!["vendor", "index-"]);
        assert!(config.chunks.enabled);
        assert!(config.process.matcher().unwrap().is_match(Path::new("index.html")));
    }

    #[test]
    fn test_init_template_parses() {
        let config = Config::parse(default_config_toml()).unwrap();

        assert_eq!(config.hints.vendor_marker, "vendor");
        assert!(config.chunks.rules.is_empty());
    }

    #[test]
    fn test_chunk_rules_parse() {
        let config = Config::parse(
            r#"
            [[chunks.rules]]
            patterns = ["node_modules/zod"]
            chunk = "zod"
            "#,
        )
        .unwrap();

        assert_eq!(config.chunks.rules.len(), 1);
        assert_eq!(config.chunks.rules[0].chunk, "zod");
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(Config::parse("[hints]\ncritical = 3\n").is_err());
        assert!(Config::parse("[server]\nport = 1\n").is_err());
    }

    #[test]
    fn test_validation_errors() {
        let err = Config::parse("[hints]\ncritical_scripts = 0\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NoCriticalScripts)
        ));

        let err = Config::parse("[process]\ninclude = [\"[\"]\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidGlob { .. })
        ));

        let err = Config::parse("[[chunks.rules]]\npatterns = []\nchunk = \"x\"\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidChunkRule { index: 0 })
        ));
    }

    #[test]
    fn test_load_reads_file_and_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hints.toml");
        std::fs::write(&path, "[hints]\ncritical_scripts = 3\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.hints.critical_scripts, 3);
        assert!(config.hints.resource_hints);

        let missing = dir.path().join("missing.toml");
        let err = Config::load(&missing).unwrap_err();
        assert!(format!("{err:#}").contains("missing.toml"));
    }

    #[test]
    fn test_matcher_excludes() {
        let config = Config::parse("[process]\nexclude = [\"vendor/**\"]\n").unwrap();
        let matcher = config.process.matcher().unwrap();

        assert!(matcher.is_match(Path::new("docs/index.html")));
        assert!(!matcher.is_match(Path::new("vendor/widget.html")));
        assert!(!matcher.is_match(Path::new("assets/index.js")));
    }
}
