//! Hintweave library
//!
//! HTML resource-hint plugins, the plugin hook registry, and the
//! code-splitting chunk policy.

pub mod cli;
pub mod config;
pub mod bundler;
pub mod html;
pub mod plugins;
pub mod utils;

pub use cli::Cli;
pub use config::Config;
pub use bundler::{ChunkPolicy, plan_chunks};
pub use plugins::{CssPreloadPlugin, PluginManager, ResourceHintsPlugin};
