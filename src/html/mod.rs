//! Text-level HTML scanning
//!
//! Hint plugins never build a document tree. They ask a [`DocumentScanner`]
//! for the tags they care about and splice the raw text by byte span, so a
//! structured parser can replace [`RegexScanner`] without touching callers.

mod scanner;

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

pub use scanner::RegexScanner;

/// `href` values that point at a CSS file, optionally followed by a query or fragment
static CSS_HREF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.css(?:[?#][^\s]*)?$").unwrap()
});

/// How a `<script>` element is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// `type="module"`
    Module,
    /// Any other script
    Classic,
}

/// A `<script src>` reference found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRef {
    /// Value of the `src` attribute, character references decoded
    pub src: String,

    /// Loading kind
    pub kind: ScriptKind,
}

impl ScriptRef {
    pub fn is_module(&self) -> bool {
        self.kind == ScriptKind::Module
    }
}

/// A `<link rel="stylesheet">` reference found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetRef {
    /// Value of the `href` attribute
    pub href: String,

    /// Tag text exactly as it appears in the document
    pub raw: String,

    /// Byte span of `raw` in the document
    pub span: Range<usize>,
}

impl StylesheetRef {
    /// Whether the link points at a `.css` file
    pub fn is_css(&self) -> bool {
        CSS_HREF_REGEX.is_match(&self.href)
    }
}

/// Any `<link>` element with a given `rel`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTag {
    /// Value of the `href` attribute with character references decoded
    pub href: Option<String>,

    /// Value of the `as` attribute, if present
    pub as_type: Option<String>,

    /// Tag text exactly as it appears in the document
    pub raw: String,

    /// Byte span of `raw` in the document
    pub span: Range<usize>,
}

impl LinkTag {
    /// Check the `as` attribute, ignoring ASCII case
    pub fn is_as(&self, value: &str) -> bool {
        self.as_type
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case(value))
    }
}

/// Finds tags in raw HTML text.
///
/// Implementations are best effort: malformed or unmatched markup is skipped,
/// never reported.
pub trait DocumentScanner: Send + Sync {
    /// Every `<script>` element carrying a non-empty `src`, in document order
    fn scripts(&self, html: &str) -> Vec<ScriptRef>;

    /// Every `<link>` whose `rel` contains the given token, in document order
    fn links(&self, html: &str, rel: &str) -> Vec<LinkTag>;

    /// Span of the first `<script type="module">` opening tag
    fn first_module_script(&self, html: &str) -> Option<Range<usize>>;

    /// Remove every occurrence of attribute `name` from a single tag's text
    fn remove_attribute(&self, tag: &str, name: &str) -> String;

    /// Every stylesheet link carrying an `href`, in document order
    fn stylesheets(&self, html: &str) -> Vec<StylesheetRef> {
        self.links(html, "stylesheet")
            .into_iter()
            .filter_map(|link| {
                let href = link.href?;
                Some(StylesheetRef {
                    href,
                    raw: link.raw,
                    span: link.span,
                })
            })
            .collect()
    }
}

/// A text replacement over a byte span of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Range<usize>,
    pub replacement: String,
}

impl Edit {
    pub fn replace(span: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at..at, text)
    }

    pub fn delete(span: Range<usize>) -> Self {
        Self::replace(span, String::new())
    }
}

/// Apply non-overlapping edits to a document.
///
/// Edits may be given in any order. An edit overlapping one already applied
/// is dropped.
pub fn apply_edits(html: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| (e.span.start, e.span.end));

    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;

    for edit in edits {
        if edit.span.start < cursor || edit.span.end > html.len() {
            continue;
        }
        out.push_str(&html[cursor..edit.span.start]);
        out.push_str(&edit.replacement);
        cursor = edit.span.end;
    }

    out.push_str(&html[cursor..]);
    out
}

/// Delete tags from a document.
///
/// A tag that sits alone on its line takes the whole line with it, so
/// removing a tag never leaves a blank line behind.
pub fn remove_spans<I>(html: &str, spans: I) -> String
where
    I: IntoIterator<Item = Range<usize>>,
{
    let edits = spans
        .into_iter()
        .map(|span| Edit::delete(line_span(html, span)))
        .collect();
    apply_edits(html, edits)
}

static ATTRIBUTE_ENTITIES: &[(&str, char)] = &[
    ("&amp;", '&'),
    ("&quot;", '"'),
    ("&#34;", '"'),
    ("&apos;", '\''),
    ("&#39;", '\''),
    ("&lt;", '<'),
    ("&gt;", '>'),
];

/// Escape text for use inside a double-quoted attribute value
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode the character references that [`escape_attribute`] and common
/// bundlers write into attribute values. Unknown references are kept as is.
pub fn unescape_attribute(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = ATTRIBUTE_ENTITIES
            .iter()
            .find(|(entity, _)| rest.starts_with(*entity));

        match decoded {
            Some(&(entity, c)) => {
                out.push(c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Line terminator used by the line containing `pos`; `\n` when that line
/// is the last one
pub fn line_ending(html: &str, pos: usize) -> &'static str {
    match html[pos..].find('\n') {
        Some(i) if html[..pos + i].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Leading whitespace of the line containing `pos`, when nothing but
/// whitespace precedes `pos` on that line
pub fn line_indent(html: &str, pos: usize) -> Option<&str> {
    let line_start = html[..pos].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &html[line_start..pos];
    prefix
        .chars()
        .all(|c| c == ' ' || c == '\t')
        .then_some(prefix)
}

/// Expand a tag span to its full line (newline included) when the tag is
/// the only thing on it
fn line_span(html: &str, span: Range<usize>) -> Range<usize> {
    let Some(indent) = line_indent(html, span.start) else {
        return span;
    };

    let rest = &html[span.end..];
    let line_end = rest.find('\n').map_or(html.len(), |i| span.end + i + 1);
    let trailing = html[span.end..line_end].trim_end_matches(['\n', '\r']);
    if !trailing.chars().all(|c| c == ' ' || c == '\t') {
        return span;
    }

    (span.start - indent.len())..line_end
}
