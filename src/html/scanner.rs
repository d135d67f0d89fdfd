//! Regex-based document scanner

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{unescape_attribute, DocumentScanner, LinkTag, ScriptKind, ScriptRef};

static SCRIPT_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<script\b[^>]*>").unwrap()
});

static LINK_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<link\b[^>]*>").unwrap()
});

/// One attribute: name, then an optional double-quoted, single-quoted or bare value
static ATTRIBUTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#,
    )
    .unwrap()
});

/// A parsed attribute with its byte span inside the tag text
struct Attribute<'a> {
    name: &'a str,
    value: Option<&'a str>,
    span: Range<usize>,
}

/// Parse the attributes of a single opening tag, skipping the tag name
fn attributes(tag: &str) -> Vec<Attribute<'_>> {
    // Offset by one to step over '<'
    let Some(body) = tag.get(1..) else {
        return Vec::new();
    };

    ATTRIBUTE_REGEX
        .captures_iter(body)
        .skip(1)
        .filter_map(|caps: Captures<'_>| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str());
            Some(Attribute {
                name,
                value,
                span: (whole.start() + 1)..(whole.end() + 1),
            })
        })
        .collect()
}

fn attribute<'a>(attrs: &[Attribute<'a>], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(name))
        .and_then(|a| a.value)
}

fn is_module_type(attrs: &[Attribute<'_>]) -> bool {
    attribute(attrs, "type").is_some_and(|t| t.trim().eq_ignore_ascii_case("module"))
}

fn has_rel(attrs: &[Attribute<'_>], rel: &str) -> bool {
    attribute(attrs, "rel")
        .is_some_and(|value| value.split_ascii_whitespace().any(|t| t.eq_ignore_ascii_case(rel)))
}

/// Scanner that matches opening tags with regular expressions
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexScanner;

impl RegexScanner {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentScanner for RegexScanner {
    fn scripts(&self, html: &str) -> Vec<ScriptRef> {
        SCRIPT_TAG_REGEX
            .find_iter(html)
            .filter_map(|m| {
                let attrs = attributes(m.as_str());
                let src = attribute(&attrs, "src").filter(|s| !s.is_empty())?;
                let kind = if is_module_type(&attrs) {
                    ScriptKind::Module
                } else {
                    ScriptKind::Classic
                };
                Some(ScriptRef {
                    src: unescape_attribute(src),
                    kind,
                })
            })
            .collect()
    }

    fn links(&self, html: &str, rel: &str) -> Vec<LinkTag> {
        LINK_TAG_REGEX
            .find_iter(html)
            .filter_map(|m| {
                let attrs = attributes(m.as_str());
                if !has_rel(&attrs, rel) {
                    return None;
                }
                Some(LinkTag {
                    href: attribute(&attrs, "href").map(unescape_attribute),
                    as_type: attribute(&attrs, "as").map(unescape_attribute),
                    raw: m.as_str().to_string(),
                    span: m.range(),
                })
            })
            .collect()
    }

    fn first_module_script(&self, html: &str) -> Option<Range<usize>> {
        SCRIPT_TAG_REGEX
            .find_iter(html)
            .find(|m| is_module_type(&attributes(m.as_str())))
            .map(|m| m.range())
    }

    fn remove_attribute(&self, tag: &str, name: &str) -> String {
        let mut out = String::with_capacity(tag.len());
        let mut cursor = 0;

        for attr in attributes(tag) {
            if !attr.name.eq_ignore_ascii_case(name) {
                continue;
            }
            // Take the whitespace separating it from the previous token too
            let start = tag[..attr.span.start].trim_end().len().max(cursor);
            out.push_str(&tag[cursor..start]);
            cursor = attr.span.end;
        }

        out.push_str(&tag[cursor..]);
        out
    }
}
