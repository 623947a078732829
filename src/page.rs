//! HTML pages with addressable containers.
//!
//! A [`Page`] keeps the document as text. [`Page::container`] finds an
//! element by its `id` attribute and hands out a [`Container`] that edits
//! that element's inner HTML in place. Only what the renderer needs is
//! understood: start tags, quoted attributes, nesting of same-named
//! elements, void elements, comments, and raw-text elements such as
//! `<script>` whose content is never markup.

use anyhow::{Result, bail};

use crate::render::RenderTarget;

/// Elements that never have content.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content runs verbatim up to their end tag.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

/// Characters a container id may not contain: whitespace is never part of an
/// id, and the rest would need entity escaping inside the attribute value.
fn is_forbidden_in_id(c: char) -> bool {
    c.is_whitespace() || matches!(c, '&' | '"' | '\'' | '<' | '>')
}

/// Rejects ids that cannot be written into, or matched against, an `id`
/// attribute verbatim.
pub fn check_id(id: &str) -> Result<()> {
    if id.is_empty() || id.contains(is_forbidden_in_id) {
        bail!(
            "Invalid container id '{}'. Ids must be non-empty and contain no whitespace or any of & \" ' < >.",
            id
        );
    }
    Ok(())
}

/// An HTML document held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    html: String,
}

impl Page {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Minimal document whose body is a single empty container.
    pub fn with_container(id: &str) -> Result<Self> {
        check_id(id)?;
        Ok(Self::new(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Releases</title>
</head>
<body>
<div id="{}"></div>
</body>
</html>
"#,
            id
        )))
    }

    /// Finds the element with the given `id`.
    ///
    /// Returns `None` when no such element exists, or when it is a void,
    /// self-closing, or unterminated element.
    pub fn container(&mut self, id: &str) -> Option<Container<'_>> {
        let (start, end) = find_element(&self.html, id)?;
        Some(Container {
            html: &mut self.html,
            start,
            end,
        })
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

/// Handle on one element of a [`Page`].
#[derive(Debug)]
pub struct Container<'a> {
    html: &'a mut String,
    start: usize,
    end: usize,
}

impl Container<'_> {
    pub fn inner_html(&self) -> &str {
        &self.html[self.start..self.end]
    }
}

impl RenderTarget for Container<'_> {
    fn replace_content(&mut self, html: &str) {
        self.html.replace_range(self.start..self.end, html);
        self.end = self.start + html.len();
    }

    fn append_child(&mut self, html: &str) {
        self.html.insert_str(self.end, html);
        self.end += html.len();
    }
}

/// A container that is not part of any page.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Fragment {
    html: String,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner_html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

impl RenderTarget for Fragment {
    fn replace_content(&mut self, html: &str) {
        self.html.clear();
        self.html.push_str(html);
    }

    fn append_child(&mut self, html: &str) {
        self.html.push_str(html);
    }
}

#[derive(Debug)]
struct StartTag {
    name: String,
    id: Option<String>,
    /// Byte offset just past the closing `>`.
    end: usize,
    self_closing: bool,
}

/// Byte range of the inner HTML of the element with the given id.
fn find_element(html: &str, id: &str) -> Option<(usize, usize)> {
    let mut pos = 0;
    while let Some(offset) = html[pos..].find('<') {
        let start = pos + offset;
        if html[start..].starts_with("<!--") {
            pos = skip_comment(html, start)?;
            continue;
        }
        let Some(tag) = parse_start_tag(html, start) else {
            pos = start + 1;
            continue;
        };

        let raw_text = !tag.self_closing && RAW_TEXT_ELEMENTS.contains(&tag.name.as_str());
        if tag.id.as_deref() == Some(id) {
            if tag.self_closing || VOID_ELEMENTS.contains(&tag.name.as_str()) {
                return None;
            }
            let close = if raw_text {
                find_raw_text_end(html, &tag.name, tag.end)?
            } else {
                find_end_tag(html, &tag.name, tag.end)?
            };
            return Some((tag.end, close));
        }
        pos = if raw_text {
            find_raw_text_end(html, &tag.name, tag.end)?
        } else {
            tag.end
        };
    }
    None
}

/// Offset just past the `-->` of the comment starting at `start`.
fn skip_comment(html: &str, start: usize) -> Option<usize> {
    let body = start + "<!--".len();
    html[body..].find("-->").map(|end| body + end + "-->".len())
}

/// Offset of the `</name` that ends a raw-text element whose start tag ended at `from`.
fn find_raw_text_end(html: &str, name: &str, from: usize) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets intact.
    let rest = html[from..].to_ascii_lowercase();
    let needle = format!("</{}", name);
    let mut pos = 0;
    while let Some(offset) = rest[pos..].find(&needle) {
        let start = pos + offset;
        match rest.as_bytes().get(start + needle.len()) {
            Some(b) if b.is_ascii_alphanumeric() || *b == b'-' => pos = start + needle.len(),
            _ => return Some(from + start),
        }
    }
    None
}

/// Parses the start tag beginning at `start` (which must index a `<`).
fn parse_start_tag(html: &str, start: usize) -> Option<StartTag> {
    let bytes = html.as_bytes();
    let mut i = start + 1;
    if !bytes.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    let name = html[start + 1..i].to_ascii_lowercase();

    let attrs_start = i;
    let mut quote = None;
    while i < bytes.len() {
        match (quote, bytes[i]) {
            (Some(q), b) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b @ (b'"' | b'\'')) => quote = Some(b),
            (None, b'>') => break,
            (None, _) => {}
        }
        i += 1;
    }
    if i >= bytes.len() {
        return None;
    }

    let attrs = &html[attrs_start..i];
    Some(StartTag {
        name,
        id: attribute(attrs, "id"),
        end: i + 1,
        self_closing: attrs.trim_end().ends_with('/'),
    })
}

/// Value of the attribute `wanted` in a start tag's attribute text.
fn attribute(attrs: &str, wanted: &str) -> Option<String> {
    let bytes = attrs.as_bytes();
    let mut i = 0;
    loop {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }

        let name_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'/')
        {
            i += 1;
        }
        let name = &attrs[name_start..i];

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut value = "";
        if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i) {
                Some(&(q @ (b'"' | b'\''))) => {
                    let value_start = i + 1;
                    let len = attrs[value_start..].find(q as char)?;
                    value = &attrs[value_start..value_start + len];
                    i = value_start + len + 1;
                }
                _ => {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    value = &attrs[value_start..i];
                }
            }
        }

        if name.eq_ignore_ascii_case(wanted) {
            return Some(value.to_string());
        }
    }
}

/// Offset of the `</name>` matching a start tag that ended at `from`.
fn find_end_tag(html: &str, name: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = from;
    while let Some(offset) = html[pos..].find('<') {
        let start = pos + offset;
        if html[start..].starts_with("<!--") {
            pos = skip_comment(html, start)?;
        } else if html[start + 1..].starts_with('/') {
            let rest = &html[start + 2..];
            let close = rest.find('>')?;
            if rest[..close].trim().eq_ignore_ascii_case(name) {
                depth -= 1;
                if depth == 0 {
                    return Some(start);
                }
            }
            pos = start + 2 + close + 1;
        } else if let Some(tag) = parse_start_tag(html, start) {
            if tag.self_closing {
                pos = tag.end;
            } else if RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) {
                pos = find_raw_text_end(html, &tag.name, tag.end)?;
            } else {
                if tag.name == name {
                    depth += 1;
                }
                pos = tag.end;
            }
        } else {
            pos = start + 1;
        }
    }
    None
}
