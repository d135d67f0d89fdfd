//! Stylesheet link cleanup
//!
//! Stylesheets are fetched same-origin, so `crossorigin` on their links only
//! splits the connection pool. Style preloads emitted by more than one step
//! are collapsed to the first.

use anyhow::Result;
use tracing::debug;

use crate::html::{self, DocumentScanner, Edit, RegexScanner};

use super::{HookOrder, HtmlContext, Plugin, TransformResult};

/// Strips `crossorigin` from stylesheet links and removes duplicate style preloads
pub struct CssPreloadPlugin<S = RegexScanner> {
    scanner: S,
}

impl CssPreloadPlugin {
    pub fn new() -> Self {
        Self::with_scanner(RegexScanner)
    }
}

impl Default for CssPreloadPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DocumentScanner> CssPreloadPlugin<S> {
    pub fn with_scanner(scanner: S) -> Self {
        Self { scanner }
    }

    /// Rewrite a document's stylesheet links
    pub fn apply(&self, html: &str) -> String {
        let html = self.strip_crossorigin(html);
        self.dedupe_style_preloads(html)
    }

    fn strip_crossorigin(&self, html: &str) -> String {
        let edits: Vec<Edit> = self
            .scanner
            .stylesheets(html)
            .into_iter()
            .filter(|link| link.is_css())
            .filter_map(|link| {
                let cleaned = self.scanner.remove_attribute(&link.raw, "crossorigin");
                (cleaned != link.raw).then(|| Edit::replace(link.span, cleaned))
            })
            .collect();

        if !edits.is_empty() {
            debug!("Removed crossorigin from {} stylesheet link(s)", edits.len());
        }
        html::apply_edits(html, edits)
    }

    fn dedupe_style_preloads(&self, html: String) -> String {
        let preloads: Vec<_> = self
            .scanner
            .links(&html, "preload")
            .into_iter()
            .filter(|link| link.is_as("style"))
            .collect();

        if preloads.len() <= 1 {
            return html;
        }

        debug!("Removed {} duplicate style preload(s)", preloads.len() - 1);
        html::remove_spans(&html, preloads.into_iter().skip(1).map(|link| link.span))
    }
}

impl<S: DocumentScanner> Plugin for CssPreloadPlugin<S> {
    fn name(&self) -> &str {
        "css-preload"
    }

    fn order(&self) -> HookOrder {
        HookOrder::Post
    }

    fn transform_index_html(&self, html: &str, _ctx: &HtmlContext) -> Result<TransformResult> {
        Ok(TransformResult::Transformed(self.apply(html)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strips_crossorigin_from_css_links_only() {
        let html = r#"<head>
    <link rel="stylesheet" crossorigin href="/assets/index-a.css">
    <link rel="stylesheet" href="/assets/print.css?v=3" CROSSORIGIN="anonymous" media="print">
    <link rel="stylesheet" crossorigin href="https://fonts.example.com/css2?family=Inter">
    <script type="module" crossorigin src="/assets/index-a.js"></script>
</head>"#;

        let expected = r#"<head>
    <link rel="stylesheet" href="/assets/index-a.css">
    <link rel="stylesheet" href="/assets/print.css?v=3" media="print">
    <link rel="stylesheet" crossorigin href="https://fonts.example.com/css2?family=Inter">
    <script type="module" crossorigin src="/assets/index-a.js"></script>
</head>"#;

        assert_eq!(CssPreloadPlugin::new().apply(html), expected);
    }

    #[test]
    fn test_keeps_first_style_preload() {
        let html = r#"<head>
    <link rel="preload" as="style" href="/a.css">
    <link rel="preload" as="font" href="/inter.woff2" crossorigin>
    <link rel="preload" as="style" href="/b.css">
    <link rel="preload" as="style" href="/a.css">
    <link rel="stylesheet" href="/a.css">
</head>"#;

        let expected = r#"<head>
    <link rel="preload" as="style" href="/a.css">
    <link rel="preload" as="font" href="/inter.woff2" crossorigin>
    <link rel="stylesheet" href="/a.css">
</head>"#;

        let out = CssPreloadPlugin::new().apply(html);

        assert_eq!(out, expected);
        assert_eq!(RegexScanner.links(&out, "preload").iter().filter(|l| l.is_as("style")).count(), 1);
    }

    #[test]
    fn test_single_style_preload_is_untouched() {
        let html = r#"<link rel="preload" as="style" href="/a.css"><link rel="stylesheet" href="/a.css">"#;

        assert_eq!(CssPreloadPlugin::new().apply(html), html);
        assert_eq!(CssPreloadPlugin::new().apply("<html></html>"), "<html></html>");
    }

    #[test]
    fn test_case_insensitive_preload_match() {
        let html = "<LINK REL=\"Preload\" AS=\"Style\" href=\"/a.css\">\n<link rel='preload' as='style' href='/b.css'>\n";

        assert_eq!(
            CssPreloadPlugin::new().apply(html),
            "<LINK REL=\"Preload\" AS=\"Style\" href=\"/a.css\">\n"
        );
    }
}
