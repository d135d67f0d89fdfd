//! Plugin system for Hintweave
//!
//! Provides a Vite/Rollup-style hook API. HTML plugins run on the
//! `transform_index_html` hook once per generated HTML entry point; chunk
//! plugins answer the `manual_chunks` hook once per module.

mod css_preload;
mod manual_chunks;
mod resource_hints;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::bundler::ChunkPolicy;
use crate::config::Config;

pub use css_preload::CssPreloadPlugin;
pub use manual_chunks::ManualChunksPlugin;
pub use resource_hints::{ResourceHint, ResourceHintsOptions, ResourceHintsPlugin};

/// When an HTML hook runs relative to the others
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum HookOrder {
    /// Before regular hooks
    Pre,
    /// Registration order
    #[default]
    Normal,
    /// After every other document transform
    Post,
}

/// Context passed to `transform_index_html`
#[derive(Debug, Clone)]
pub struct HtmlContext {
    /// Path of the HTML entry point being processed
    pub path: PathBuf,
}

impl HtmlContext {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Result of a `transform_index_html` hook
pub enum TransformResult {
    /// Continue to next plugin (no transformation)
    Skip,
    /// Rewritten document
    Transformed(String),
}

/// Plugin trait - implement this to create a Hintweave plugin
pub trait Plugin: Send + Sync {
    /// Plugin name for logging and debugging
    fn name(&self) -> &str;

    /// Ordering of this plugin's HTML hook
    fn order(&self) -> HookOrder {
        HookOrder::Normal
    }

    /// Rewrite a generated HTML document
    /// Return TransformResult::Skip to leave it unchanged
    fn transform_index_html(&self, _html: &str, _ctx: &HtmlContext) -> Result<TransformResult> {
        Ok(TransformResult::Skip)
    }

    /// Name the output chunk a module belongs to
    /// Return None to let other plugins (or default grouping) decide
    fn manual_chunks(&self, _module_id: &str) -> Option<String> {
        None
    }
}

/// HTML plugin backed by a plain function
pub struct FnPlugin<F> {
    name: String,
    order: HookOrder,
    handler: F,
}

impl<F> FnPlugin<F>
where
    F: Fn(&str, &HtmlContext) -> String + Send + Sync,
{
    pub fn new(name: impl Into<String>, order: HookOrder, handler: F) -> Self {
        Self {
            name: name.into(),
            order,
            handler,
        }
    }
}

impl<F> Plugin for FnPlugin<F>
where
    F: Fn(&str, &HtmlContext) -> String + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn order(&self) -> HookOrder {
        self.order
    }

    fn transform_index_html(&self, html: &str, ctx: &HtmlContext) -> Result<TransformResult> {
        Ok(TransformResult::Transformed((self.handler)(html, ctx)))
    }
}

/// Plugin manager
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginManager {
    /// Create an empty plugin manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager with the built-in plugins enabled in `config`.
    ///
    /// The injector registers before the normalizer so both run at `Post`
    /// in that order.
    pub fn from_config(config: &Config) -> Self {
        let mut manager = Self::new();

        if config.hints.resource_hints {
            manager.register(Arc::new(ResourceHintsPlugin::with_options(
                config.hints.resource_hints_options(),
            )));
        }
        if config.hints.css_preload {
            manager.register(Arc::new(CssPreloadPlugin::new()));
        }
        if config.chunks.enabled {
            let policy = ChunkPolicy::with_rules(config.chunks.rules.clone());
            manager.register(Arc::new(ManualChunksPlugin::new(policy)));
        }

        manager
    }

    /// Register a plugin
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        debug!("Registered plugin: {}", plugin.name());
        self.plugins.push(plugin);
    }

    /// Register a function as an HTML hook
    pub fn register_fn<F>(&mut self, name: &str, order: HookOrder, handler: F)
    where
        F: Fn(&str, &HtmlContext) -> String + Send + Sync + 'static,
    {
        self.register(Arc::new(FnPlugin::new(name, order, handler)));
    }

    /// Names of registered plugins, in registration order
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run transform_index_html hooks: `Pre`, then `Normal`, then `Post`,
    /// registration order within each group
    pub fn transform_index_html(&self, html: &str, ctx: &HtmlContext) -> Result<String> {
        let mut ordered: Vec<&Arc<dyn Plugin>> = self.plugins.iter().collect();
        ordered.sort_by_key(|p| p.order());

        let mut current = html.to_string();
        for plugin in ordered {
            let result = plugin
                .transform_index_html(&current, ctx)
                .with_context(|| format!("Plugin '{}' failed on {}", plugin.name(), ctx.path.display()))?;

            match result {
                TransformResult::Skip => continue,
                TransformResult::Transformed(html) => {
                    if html != current {
                        debug!("{} rewrote {}", plugin.name(), ctx.path.display());
                    }
                    current = html;
                }
            }
        }

        Ok(current)
    }

    /// Run manual_chunks hooks; the first plugin to name a chunk wins
    pub fn manual_chunks(&self, module_id: &str) -> Option<String> {
        self.plugins.iter().find_map(|p| p.manual_chunks(module_id))
    }
}
