//! Resource hint injection
//!
//! Puts `modulepreload` hints for the vendor chunk and the first critical
//! scripts ahead of the entry module script, and downgrades every later
//! script to a `prefetch`. Vendor code is requested first so application
//! chunks never wait on a second round trip for it.

use std::collections::HashSet;
use std::fmt;

use anyhow::Result;
use tracing::debug;

use crate::html::{self, DocumentScanner, Edit, RegexScanner, ScriptRef};

use super::{HookOrder, HtmlContext, Plugin, TransformResult};

/// A hint to emit into the document head
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceHint {
    /// `<link rel="modulepreload" crossorigin>`
    ModulePreload(String),
    /// `<link rel="prefetch" as="script">`
    Prefetch(String),
}

impl ResourceHint {
    pub fn href(&self) -> &str {
        match self {
            ResourceHint::ModulePreload(href) | ResourceHint::Prefetch(href) => href,
        }
    }
}

impl fmt::Display for ResourceHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceHint::ModulePreload(href) => write!(
                f,
                r#"<link rel="modulepreload" crossorigin href="{}" />"#,
                html::escape_attribute(href)
            ),
            ResourceHint::Prefetch(href) => write!(
                f,
                r#"<link rel="prefetch" href="{}" as="script" />"#,
                html::escape_attribute(href)
            ),
        }
    }
}

/// Tuning for [`ResourceHintsPlugin`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHintsOptions {
    /// Number of non-vendor scripts that get a modulepreload
    pub critical_scripts: usize,

    /// Substring identifying the vendor chunk
    pub vendor_marker: String,

    /// Existing modulepreload hints whose href contains one of these are dropped
    pub stale_markers: Vec<String>,
}

impl Default for ResourceHintsOptions {
    fn default() -> Self {
        Self {
            critical_scripts: 2,
            vendor_marker: "vendor".to_string(),
            stale_markers: vec!["vendor".to_string(), "index-".to_string()],
        }
    }
}

/// Injects modulepreload/prefetch hints before the entry module script
pub struct ResourceHintsPlugin<S = RegexScanner> {
    options: ResourceHintsOptions,
    scanner: S,
}

impl ResourceHintsPlugin {
    pub fn new() -> Self {
        Self::with_options(ResourceHintsOptions::default())
    }

    pub fn with_options(options: ResourceHintsOptions) -> Self {
        Self::with_scanner(options, RegexScanner)
    }
}

impl Default for ResourceHintsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DocumentScanner> ResourceHintsPlugin<S> {
    pub fn with_scanner(options: ResourceHintsOptions, scanner: S) -> Self {
        Self { options, scanner }
    }

    /// Hints for a list of scripts, in the order they should be written.
    ///
    /// The first script containing the vendor marker is preloaded first.
    /// The next `critical_scripts` scripts without the marker are preloaded
    /// when they are modules; every script after them is prefetched.
    pub fn plan(&self, scripts: &[ScriptRef]) -> Vec<ResourceHint> {
        let marker = self.options.vendor_marker.as_str();
        let vendor = scripts.iter().find(|s| s.src.contains(marker));
        let others: Vec<&ScriptRef> = scripts.iter().filter(|s| !s.src.contains(marker)).collect();
        let split = self.options.critical_scripts.min(others.len());
        let (critical, deferred) = others.split_at(split);

        let mut hints = Vec::new();

        if let Some(vendor) = vendor.filter(|s| s.is_module()) {
            hints.push(ResourceHint::ModulePreload(vendor.src.clone()));
        }

        hints.extend(
            critical
                .iter()
                .filter(|s| s.is_module())
                .map(|s| ResourceHint::ModulePreload(s.src.clone())),
        );

        hints.extend(deferred.iter().map(|s| ResourceHint::Prefetch(s.src.clone())));

        hints
    }

    /// Rewrite a document with resource hints
    pub fn apply(&self, html: &str) -> String {
        let scripts = self.scanner.scripts(html);
        let stylesheets = self.scanner.stylesheets(html);
        debug!("Found {} script(s), {} stylesheet(s)", scripts.len(), stylesheets.len());

        let hints = self.plan(&scripts);
        if hints.is_empty() {
            return html.to_string();
        }

        // Stale hint removal never touches script tags, so the anchor is
        // present in the cleaned text exactly when it is present in `html`
        let cleaned = html::remove_spans(html, self.stale_hints(html, &hints));
        let Some(anchor) = self.scanner.first_module_script(&cleaned) else {
            debug!("No module script to anchor hints on");
            return html.to_string();
        };

        let edit = match html::line_indent(&cleaned, anchor.start) {
            Some(indent) => {
                let eol = html::line_ending(&cleaned, anchor.start);
                let text: String = hints.iter().map(|h| format!("{indent}{h}{eol}")).collect();
                Edit::insert(anchor.start - indent.len(), text)
            }
            None => Edit::insert(anchor.start, hints.iter().map(ToString::to_string).collect::<String>()),
        };

        debug!("Injected {} resource hint(s)", hints.len());
        html::apply_edits(&cleaned, vec![edit])
    }

    /// Existing hints to drop before inserting `hints`: modulepreloads for
    /// stale bundler chunks, and anything that would duplicate a new hint
    fn stale_hints(&self, html: &str, hints: &[ResourceHint]) -> Vec<std::ops::Range<usize>> {
        let wanted: HashSet<&str> = hints.iter().map(ResourceHint::href).collect();

        let module_preloads = self.scanner.links(html, "modulepreload").into_iter().filter(|link| {
            link.href.as_deref().is_some_and(|href| {
                wanted.contains(href) || self.options.stale_markers.iter().any(|m| href.contains(m.as_str()))
            })
        });

        let prefetches = self
            .scanner
            .links(html, "prefetch")
            .into_iter()
            .filter(|link| link.href.as_deref().is_some_and(|href| wanted.contains(href)));

        module_preloads.chain(prefetches).map(|link| link.span).collect()
    }
}

impl<S: DocumentScanner> Plugin for ResourceHintsPlugin<S> {
    fn name(&self) -> &str {
        "resource-hints"
    }

    fn order(&self) -> HookOrder {
        HookOrder::Post
    }

    fn transform_index_html(&self, html: &str, _ctx: &HtmlContext) -> Result<TransformResult> {
        Ok(TransformResult::Transformed(self.apply(html)))
    }
}
