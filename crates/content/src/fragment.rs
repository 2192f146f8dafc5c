use regex::{Captures, Regex};
use tracing::debug;

use crate::ContentError;

pub const DEFAULT_TITLE: &str = "2020 Master Pitch";
pub const DOCUMENT_TITLE_SUFFIX: &str = " - AI Takeover Strategy";
pub const FALLBACK_MESSAGE: &str = "Failed to load content. Try reloading.";

const SLIDE_CLASS: &str = "webdeck-slide";
const STRIPPED_TAGS: &[&str] = &["header", "nav"];
const STRIPPED_CLASSES: &[&str] = &["site-header", "header-nav", "nav-helper", "site-footer"];
const STRIPPED_IDS: &[&str] = &["progressBar", "scrollIndicator"];
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Fragment ready for insertion into the content area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedFragment {
    pub title: String,
    pub html: String,
    pub slide_count: u16,
}

impl SanitizedFragment {
    pub fn document_title(&self) -> String {
        format!("{}{DOCUMENT_TITLE_SUFFIX}", self.title)
    }

    /// Markup rendered in place of the fragment when the fetch fails.
    pub fn fallback_html() -> String {
        format!("<div class=\"panel\">{FALLBACK_MESSAGE}</div>")
    }
}

#[derive(Debug)]
struct TagToken<'a> {
    start: usize,
    end: usize,
    name: String,
    closing: bool,
    self_closing: bool,
    attrs: &'a str,
}

/// Strips scripts, inline handlers and duplicate page chrome from a fragment.
///
/// This is not a security boundary; it keeps the injected fragment from
/// re-rendering the host page's header, navigation and progress widgets.
#[derive(Debug, Clone)]
pub struct FragmentSanitizer {
    body: Regex,
    body_close: Regex,
    script_pair: Regex,
    script_open: Regex,
    tag: Regex,
    handler_attr: Regex,
    class_attr: Regex,
    id_attr: Regex,
    heading: Regex,
    any_tag: Regex,
    whitespace: Regex,
}

impl FragmentSanitizer {
    pub fn new() -> Result<Self, ContentError> {
        Ok(Self {
            body: Regex::new(r"(?is)<body\b[^>]*>")?,
            body_close: Regex::new(r"(?i)</body\s*>")?,
            script_pair: Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>")?,
            script_open: Regex::new(r"(?is)<script\b.*$")?,
            tag: Regex::new(r#"<(/?)([A-Za-z][A-Za-z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)?,
            handler_attr: Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#)?,
            class_attr: Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)?,
            id_attr: Regex::new(r#"(?i)\bid\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)?,
            heading: Regex::new(r"(?is)<h[1-3]\b[^>]*>(.*?)</h[1-3]\s*>")?,
            any_tag: Regex::new(r"(?s)<[^>]*>")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    pub fn sanitize(&self, raw: &str) -> SanitizedFragment {
        let body = self.body_inner(raw);
        let without_scripts = self.strip_scripts(body);
        let without_handlers = self.strip_handlers(&without_scripts);
        let html = self.strip_chrome(&without_handlers);
        let title = self.first_heading(&html).unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let slide_count = self.count_slides(&html);
        debug!(
            raw_bytes = raw.len(),
            sanitized_bytes = html.len(),
            slide_count,
            %title,
            "sanitized content fragment"
        );

        SanitizedFragment {
            title,
            html: html.trim().to_string(),
            slide_count,
        }
    }

    fn body_inner<'a>(&self, raw: &'a str) -> &'a str {
        let Some(open) = self.body.find(raw) else {
            return raw;
        };
        let rest = &raw[open.end()..];
        match self.body_close.find(rest) {
            Some(close) => &rest[..close.start()],
            None => rest,
        }
    }

    fn strip_scripts(&self, html: &str) -> String {
        let paired = self.script_pair.replace_all(html, "");
        // An unterminated script swallows the rest of the document.
        self.script_open.replace_all(&paired, "").into_owned()
    }

    fn strip_handlers(&self, html: &str) -> String {
        self.tag
            .replace_all(html, |caps: &Captures<'_>| {
                self.handler_attr.replace_all(&caps[0], "").into_owned()
            })
            .into_owned()
    }

    fn tokens<'a>(&self, html: &'a str) -> Vec<TagToken<'a>> {
        self.tag
            .captures_iter(html)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let attrs = caps.get(3).map_or("", |m| m.as_str());
                Some(TagToken {
                    start: whole.start(),
                    end: whole.end(),
                    name: caps[2].to_ascii_lowercase(),
                    closing: !caps[1].is_empty(),
                    self_closing: attrs.trim_end().ends_with('/'),
                    attrs,
                })
            })
            .collect()
    }

    fn attr_value<'a>(pattern: &Regex, attrs: &'a str) -> Option<&'a str> {
        let caps = pattern.captures(attrs)?;
        caps.get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
    }

    fn has_class(&self, attrs: &str, class: &str) -> bool {
        Self::attr_value(&self.class_attr, attrs)
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    fn is_chrome(&self, token: &TagToken<'_>) -> bool {
        if STRIPPED_TAGS.contains(&token.name.as_str()) {
            return true;
        }
        if STRIPPED_CLASSES
            .iter()
            .any(|class| self.has_class(token.attrs, class))
        {
            return true;
        }
        Self::attr_value(&self.id_attr, token.attrs).is_some_and(|id| STRIPPED_IDS.contains(&id))
    }

    fn strip_chrome(&self, html: &str) -> String {
        let tokens = self.tokens(html);
        let mut out = String::with_capacity(html.len());
        let mut cursor = 0usize;
        let mut i = 0usize;

        while i < tokens.len() {
            let token = &tokens[i];
            if token.closing || !self.is_chrome(token) {
                i += 1;
                continue;
            }

            out.push_str(&html[cursor..token.start]);
            if token.self_closing || VOID_TAGS.contains(&token.name.as_str()) {
                cursor = token.end;
                i += 1;
                continue;
            }

            let mut depth = 1usize;
            let mut j = i + 1;
            let mut close_end = None;
            while j < tokens.len() {
                let inner = &tokens[j];
                if inner.name == token.name {
                    if inner.closing {
                        depth -= 1;
                        if depth == 0 {
                            close_end = Some(inner.end);
                            break;
                        }
                    } else if !inner.self_closing {
                        depth += 1;
                    }
                }
                j += 1;
            }

            debug!(tag = %token.name, "removing duplicate chrome from fragment");
            match close_end {
                Some(end) => {
                    cursor = end;
                    i = j + 1;
                }
                None => {
                    cursor = html.len();
                    break;
                }
            }
        }

        out.push_str(&html[cursor..]);
        out
    }

    fn first_heading(&self, html: &str) -> Option<String> {
        let caps = self.heading.captures(html)?;
        let text = self.any_tag.replace_all(&caps[1], " ");
        let text = decode_entities(&text);
        let text = self.whitespace.replace_all(text.trim(), " ").into_owned();
        (!text.is_empty()).then_some(text)
    }

    fn count_slides(&self, html: &str) -> u16 {
        let count = self
            .tokens(html)
            .iter()
            .filter(|token| !token.closing && self.has_class(token.attrs, SLIDE_CLASS))
            .count();
        u16::try_from(count).unwrap_or(u16::MAX)
    }
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let numeric = entity.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        match tail.find(';').filter(|end| *end <= 10) {
            Some(end) => match decode_entity(&tail[..end]) {
                Some(ch) => {
                    out.push(ch);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = tail;
                }
            },
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "tests/fragment_tests.rs"]
mod tests;
