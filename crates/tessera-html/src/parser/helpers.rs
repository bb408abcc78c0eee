//! Input scanning helpers for the tree builder.
//!
//! Each `consume_*` method either recognises a construct at the cursor,
//! inserts the matching node and advances past it, or leaves the cursor
//! untouched and returns `false` so the next rule can try.

use tessera_dom::{ElementData, NodeId, NodeType};

use super::tree_builder::{ParseIssueKind, TreeBuilder, starts_with_ignore_ascii_case};
use crate::attributes::scan_attributes;
use crate::elements::{RAW_TEXT_ELEMENTS, is_auto_close_element, is_void_element};
use crate::entities::decode_entities;

// =============================================================================
// Cursor Helpers
// =============================================================================

impl TreeBuilder {
    /// Input from the cursor to the end.
    pub(super) fn remaining(&self) -> &str {
        &self.input[self.pos..]
    }

    /// Step over one whole character.
    fn advance_one_char(&mut self) {
        self.pos += self.remaining().chars().next().map_or(1, char::len_utf8);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    /// Append `node` to the current node.
    fn insert_node(&mut self, node: NodeId) {
        let parent = self.current_node();
        self.tree.append_child(parent, node);
    }

    /// Allocate an element carrying the scanned attributes of `attribute_text`.
    fn create_element(&mut self, tag_name: &str, namespace: Option<String>, attribute_text: &str) -> NodeId {
        let scanned = scan_attributes(attribute_text);
        let mut data = ElementData::new(tag_name);
        data.namespace = namespace;
        data.attrs = scanned.attributes;
        data.boolean_attrs = scanned.boolean_attributes;
        self.tree.alloc(NodeType::Element(data))
    }
}

// =============================================================================
// Markup Constructs
// =============================================================================

impl TreeBuilder {
    /// `<!--...-->`: the content between the markers, unprocessed.
    pub(super) fn consume_comment(&mut self) -> bool {
        let Some((contents, consumed)) = delimited(self.remaining(), "<!--", "-->") else {
            return false;
        };
        let contents = contents.to_string();
        let node = self.tree.create_comment(contents);
        self.insert_node(node);
        self.pos += consumed;
        true
    }

    /// `<![CDATA[...]]>`
    pub(super) fn consume_cdata(&mut self) -> bool {
        let Some((contents, consumed)) = delimited(self.remaining(), "<![CDATA[", "]]>") else {
            return false;
        };
        let contents = contents.to_string();
        let node = self.tree.create_cdata(contents);
        self.insert_node(node);
        self.pos += consumed;
        true
    }

    /// `<script ...>...</script>` and `<style ...>...</style>`.
    ///
    /// The body runs to the first case-insensitive closing tag and becomes a
    /// single raw text child. Without a closing tag this returns `false` and
    /// the start tag is handled like any other.
    pub(super) fn consume_raw_text_element(&mut self) -> bool {
        let rest = self.remaining();
        let Some(&tag) = RAW_TEXT_ELEMENTS.iter().find(|tag| opens_tag(rest, tag)) else {
            return false;
        };
        let Some(open_end) = find_tag_end(rest) else {
            return false;
        };
        let close = format!("</{tag}>");
        let body_start = open_end + 1;
        let Some(body_len) = find_ignore_ascii_case(&rest[body_start..], &close) else {
            return false;
        };

        let attribute_text = strip_self_closing(&rest[1 + tag.len()..open_end]).to_string();
        let body = rest[body_start..body_start + body_len].to_string();
        let consumed = body_start + body_len + close.len();

        let element = self.create_element(tag, None, &attribute_text);
        if !body.is_empty() {
            let text = self.tree.create_text(body);
            self.tree.append_child(element, text);
        }
        self.insert_node(element);
        self.pos += consumed;
        true
    }

    /// Any other `<`: a start tag, an end tag, or garbage.
    pub(super) fn consume_tag(&mut self) {
        let Some(end) = find_tag_end(self.remaining()) else {
            self.record_issue(ParseIssueKind::UnterminatedTag);
            self.advance_one_char();
            return;
        };
        let chunk = self.remaining()[..=end].to_string();

        if chunk[1..].trim_start().starts_with('/') {
            self.close_element(&chunk);
        } else if !self.open_element(&chunk) {
            self.record_issue(ParseIssueKind::UnparseableTag);
            self.advance_one_char();
            return;
        }
        self.pos += chunk.len();
    }

    /// Longest run of text before the next `<`.
    pub(super) fn consume_text(&mut self) {
        let rest = self.remaining();
        let len = rest.find('<').unwrap_or(rest.len());
        if len == 0 {
            self.advance_one_char();
            return;
        }

        let raw = &rest[..len];
        let text = if self.normalize_whitespace {
            decode_entities(&collapse_whitespace(raw))
        } else {
            decode_entities(raw)
        };
        self.pos += len;

        let node = self.tree.create_text(text);
        self.insert_node(node);
    }

    /// Pop the stack down to and including the nearest open element whose
    /// qualified name matches. The document node is never popped, and a
    /// closer with no match is ignored.
    fn close_element(&mut self, chunk: &str) {
        let Some(name) = closing_tag_name(chunk) else {
            self.record_issue(ParseIssueKind::UnparseableTag);
            return;
        };

        let matching = (1..self.stack_of_open_elements.len()).rev().find(|&i| {
            self.tree
                .as_element(self.stack_of_open_elements[i])
                .is_some_and(|e| e.qualified_name().eq_ignore_ascii_case(name))
        });
        match matching {
            Some(index) => self.stack_of_open_elements.truncate(index),
            None => self.record_issue(ParseIssueKind::UnmatchedClosingTag),
        }
    }

    /// Handle a start tag chunk (`<name ...>`, `<name .../>`). Returns
    /// `false` if the chunk has no valid tag name.
    fn open_element(&mut self, chunk: &str) -> bool {
        let body = &chunk[1..chunk.len() - 1];
        let name_len = body.bytes().take_while(|&b| is_tag_name_byte(b)).count();
        if name_len == 0 {
            return false;
        }

        let name = body[..name_len].to_ascii_lowercase();
        let attribute_text = strip_self_closing(&body[name_len..]);
        let (namespace, local) = match name.split_once(':') {
            Some((prefix, local)) => (Some(prefix.to_string()), local.to_string()),
            None => (None, name.clone()),
        };
        let is_void = is_void_element(&local) || chunk.ends_with("/>");

        // <li>One<li>Two: the second <li> closes the first.
        if is_auto_close_element(&local)
            && self.stack_of_open_elements.len() > 1
            && self.tree.is_element_named(self.current_node(), &local)
        {
            let _ = self.stack_of_open_elements.pop();
        }

        let element = self.create_element(&local, namespace, attribute_text);
        self.insert_node(element);
        if !is_void {
            self.stack_of_open_elements.push(element);
        }
        true
    }
}

// =============================================================================
// Free Scanning Functions
// =============================================================================

/// Characters allowed in a tag name.
const fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'@' | b'_' | b':' | b'.' | b'-')
}

/// Content between `open` and the first following `close`, plus the total
/// length consumed.
fn delimited<'a>(input: &'a str, open: &str, close: &str) -> Option<(&'a str, usize)> {
    let body = input.strip_prefix(open)?;
    let end = body.find(close)?;
    Some((&body[..end], open.len() + end + close.len()))
}

/// Whether `input` starts with `<tag` followed by whitespace, `/` or `>`.
fn opens_tag(input: &str, tag: &str) -> bool {
    input.starts_with('<')
        && starts_with_ignore_ascii_case(&input[1..], tag)
        && input
            .as_bytes()
            .get(1 + tag.len())
            .is_some_and(|&b| b.is_ascii_whitespace() || b == b'/' || b == b'>')
}

/// Index of the `>` that ends the tag starting at `input[0]`, skipping any
/// `>` inside single- or double-quoted runs.
fn find_tag_end(input: &str) -> Option<usize> {
    let mut in_single = false;
    let mut in_double = false;
    for (i, b) in input.bytes().enumerate().skip(1) {
        match b {
            b'\'' if !in_double => in_single = !in_single,
            b'"' if !in_single => in_double = !in_double,
            b'>' if !in_single && !in_double => return Some(i),
            _ => {}
        }
    }
    None
}

/// Name from a closing tag chunk: `<`, optional whitespace, `/`, optional
/// whitespace, name, optional whitespace, `>`.
fn closing_tag_name(chunk: &str) -> Option<&str> {
    let name = chunk
        .strip_prefix('<')?
        .strip_suffix('>')?
        .trim_start()
        .strip_prefix('/')?
        .trim();
    (!name.is_empty() && name.bytes().all(is_tag_name_byte)).then_some(name)
}

/// Attribute text without the trailing `/` of a self-closing tag.
fn strip_self_closing(attribute_text: &str) -> &str {
    let trimmed = attribute_text.trim_end();
    trimmed.strip_suffix('/').unwrap_or(trimmed)
}

/// Byte offset of the first ASCII case-insensitive occurrence of `needle`.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Collapse every ASCII whitespace run to one space. A non-breaking space
/// is content and stays.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_end_skips_quoted_gt() {
        assert_eq!(find_tag_end(r#"<a title="1 > 0">x"#), Some(16));
        assert_eq!(find_tag_end("<a title='>'"), None);
    }

    #[test]
    fn closing_tag_name_allows_inner_whitespace() {
        assert_eq!(closing_tag_name("< / svg:g >"), Some("svg:g"));
        assert_eq!(closing_tag_name("</div x>"), None);
        assert_eq!(closing_tag_name("</>"), None);
    }

    #[test]
    fn collapse_keeps_non_breaking_space() {
        assert_eq!(collapse_whitespace("a\u{00A0}\u{00A0}b \t\n c"), "a\u{00A0}\u{00A0}b c");
    }

    #[test]
    fn raw_text_tag_needs_delimiter() {
        assert!(opens_tag("<script>", "script"));
        assert!(opens_tag("<STYLE media=x>", "style"));
        assert!(!opens_tag("<scripts>", "script"));
    }
}
