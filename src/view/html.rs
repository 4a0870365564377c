//! Banner heading markup.
//!
//! Headings typed in design mode may carry `<br/>` and coloured
//! `<span class='…'>` tags. [`heading_parts`] keeps exactly those and turns
//! everything else into plain text, which the templates then escape.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HeadingPart {
    Text(String),
    Break,
    SpanOpen(String),
    SpanClose,
}

/// Removes anything tag-shaped, `<...>` including an unterminated trailing tag.
pub fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match (ch, in_tag) {
            ('<', _) => in_tag = true,
            ('>', true) => in_tag = false,
            (_, false) => out.push(ch),
            _ => {}
        }
    }
    out
}

pub fn heading_parts(markup: &str) -> Vec<HeadingPart> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut rest = markup;

    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        let Some(len) = rest[start..].find('>') else {
            text.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let tag = &rest[start..=start + len];
        let lowered = tag.to_ascii_lowercase();
        let part = if matches!(lowered.as_str(), "<br/>" | "<br>" | "<br />") {
            Some(HeadingPart::Break)
        } else if lowered == "</span>" {
            Some(HeadingPart::SpanClose)
        } else {
            span_class(tag).map(|class| HeadingPart::SpanOpen(class.to_string()))
        };
        match part {
            Some(part) => {
                if !text.is_empty() {
                    parts.push(HeadingPart::Text(std::mem::take(&mut text)));
                }
                parts.push(part);
            }
            None => text.push_str(tag),
        }
        rest = &rest[start + len + 1..];
    }

    text.push_str(rest);
    if !text.is_empty() {
        parts.push(HeadingPart::Text(text));
    }
    parts
}

fn span_class(tag: &str) -> Option<&str> {
    let inner = tag.strip_prefix("<span")?.strip_suffix('>')?.trim();
    let value = inner.strip_prefix("class=")?;
    let quote = value.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    value[1..].strip_suffix(quote)
}
