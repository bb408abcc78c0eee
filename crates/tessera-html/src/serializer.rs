//! Markup serialization.
//!
//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! Two modes share one walker:
//!
//! - **Minified** reconstructs the markup exactly as parsed, escaping text
//!   and attribute values.
//! - **Pretty** indents four spaces per level, but only reformats a node's
//!   children when inserting whitespace cannot change how the document
//!   renders (see [`can_reformat_children`]).

use tessera_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::elements::{is_inline_element, is_raw_text_element, is_void_element, preserves_whitespace};

/// One level of pretty-print indentation.
const INDENT: &str = "    ";

/// Serialization entry points on [`DomTree`].
pub trait ToHtml {
    /// Serialize the subtree at `node`. `indent_level` is the starting depth
    /// for pretty printing and is ignored when `minify` is set.
    fn to_html(&self, node: NodeId, minify: bool, indent_level: usize) -> String;

    /// Serialize the whole document without inserted whitespace.
    fn to_minified_html(&self) -> String;

    /// Serialize the whole document with indentation where it is safe.
    fn to_pretty_html(&self) -> String;
}

impl ToHtml for DomTree {
    fn to_html(&self, node: NodeId, minify: bool, indent_level: usize) -> String {
        to_html(self, node, minify, indent_level)
    }

    fn to_minified_html(&self) -> String {
        to_html(self, self.root(), true, 0)
    }

    fn to_pretty_html(&self) -> String {
        to_html(self, self.root(), false, 0)
    }
}

/// Serialize the subtree at `node`.
///
/// An XML declaration and doctype attached to `node` come first, each
/// followed by a newline in pretty mode.
#[must_use]
pub fn to_html(tree: &DomTree, node: NodeId, minify: bool, indent_level: usize) -> String {
    let mut serializer = Serializer {
        tree,
        minify,
        out: String::new(),
    };
    serializer.write_preamble(node);
    serializer.write_subtree(node, indent_level);
    serializer.out
}

struct Serializer<'a> {
    tree: &'a DomTree,
    minify: bool,
    out: String,
}

/// One pending step of the walk. Children are pushed in reverse so they pop
/// in document order, each followed by whatever separates it from the next.
enum Frame {
    /// Write a node's opening markup and schedule its contents.
    /// `leading_indent` is false when the node continues a line started by
    /// its parent.
    Open {
        id: NodeId,
        level: usize,
        leading_indent: bool,
    },
    /// Write an element's end tag.
    Close(String),
    Newline,
    Indent(usize),
    /// Drop the newlines written after the last child of the document node.
    TrimNewlines,
}

impl Serializer<'_> {
    fn newline(&mut self) {
        if !self.minify {
            self.out.push('\n');
        }
    }

    fn indent(&mut self, level: usize) {
        if !self.minify {
            self.out.push_str(&INDENT.repeat(level));
        }
    }

    fn write_preamble(&mut self, node: NodeId) {
        let Some(slot) = self.tree.get(node) else {
            return;
        };
        for line in [&slot.xml_declaration, &slot.doctype].into_iter().flatten() {
            if !line.is_empty() {
                self.out.push_str(line);
                self.newline();
            }
        }
    }

    /// Write the subtree at `root`, keeping pending work on an explicit
    /// stack the way the tree builder keeps its open elements.
    fn write_subtree(&mut self, root: NodeId, level: usize) {
        let mut stack = vec![Frame::Open {
            id: root,
            level,
            leading_indent: true,
        }];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Open {
                    id,
                    level,
                    leading_indent,
                } => self.open_node(id, level, leading_indent, &mut stack),
                Frame::Close(name) => {
                    self.out.push_str("</");
                    self.out.push_str(&name);
                    self.out.push('>');
                }
                Frame::Newline => self.newline(),
                Frame::Indent(level) => self.indent(level),
                Frame::TrimNewlines => {
                    let trimmed = self.out.trim_end_matches('\n').len();
                    self.out.truncate(trimmed);
                }
            }
        }
    }

    fn open_node(&mut self, id: NodeId, level: usize, leading_indent: bool, stack: &mut Vec<Frame>) {
        let tree = self.tree;
        let Some(node) = tree.get(id) else {
            return;
        };
        match &node.node_type {
            NodeType::Document => self.open_document(id, level, stack),
            NodeType::Element(data) => {
                if leading_indent {
                    self.indent(level);
                }
                self.open_element(id, data, level, stack);
            }
            NodeType::Text(text) => self.write_text(id, text),
            NodeType::Comment(text) => {
                if leading_indent {
                    self.indent(level);
                }
                self.out.push_str("<!--");
                self.out.push_str(text);
                self.out.push_str("-->");
            }
            NodeType::Cdata(text) => {
                if leading_indent {
                    self.indent(level);
                }
                self.out.push_str("<![CDATA[");
                self.out.push_str(text);
                self.out.push_str("]]>");
            }
        }
    }

    /// The synthetic document node renders only its children, one per line
    /// when that is safe.
    fn open_document(&self, id: NodeId, level: usize, stack: &mut Vec<Frame>) {
        let tree = self.tree;
        let reformat = !self.minify && can_reformat_children(tree, id);
        if reformat {
            stack.push(Frame::TrimNewlines);
        }
        for &child in tree.children(id).iter().rev() {
            if reformat && is_blank_text(tree, child) {
                continue;
            }
            if reformat {
                stack.push(Frame::Newline);
            }
            stack.push(Frame::Open {
                id: child,
                level,
                leading_indent: reformat,
            });
        }
    }

    /// Write the start tag now; the children and end tag go on the stack.
    fn open_element(&mut self, id: NodeId, data: &ElementData, level: usize, stack: &mut Vec<Frame>) {
        let tree = self.tree;
        let name = data.qualified_name();

        self.out.push('<');
        self.out.push_str(&name);
        for (key, value) in &data.attrs {
            self.out.push(' ');
            self.out.push_str(key);
            if !data.is_boolean_attribute(key) {
                self.out.push_str("=\"");
                self.out.push_str(&escape_attribute(value));
                self.out.push('"');
            }
        }
        self.out.push('>');

        if is_void_element(&data.tag_name) {
            return;
        }
        stack.push(Frame::Close(name));

        match tree.children(id) {
            [] => {}
            &[only] if tree.as_text(only).is_some() => {
                let text = tree.as_text(only).unwrap_or_default();
                let svg_title = data.tag_name.eq_ignore_ascii_case("title")
                    && tree
                        .parent(id)
                        .is_some_and(|parent| tree.is_element_named(parent, "svg"));
                if svg_title {
                    let collapsed = collapse_whitespace(text, |c| c.is_ascii_whitespace());
                    self.out.push_str(&escape_text(collapsed.trim_matches(' ')));
                } else {
                    self.write_text(only, text);
                }
            }
            children if !self.minify && can_reformat_children(tree, id) => {
                self.newline();
                stack.push(Frame::Indent(level));
                for &child in children.iter().rev() {
                    if is_blank_text(tree, child) {
                        continue;
                    }
                    stack.push(Frame::Newline);
                    stack.push(Frame::Open {
                        id: child,
                        level: level + 1,
                        leading_indent: true,
                    });
                }
            }
            children => {
                for &child in children.iter().rev() {
                    stack.push(Frame::Open {
                        id: child,
                        level: level + 1,
                        leading_indent: false,
                    });
                }
            }
        }
    }

    fn write_text(&mut self, id: NodeId, text: &str) {
        let tree = self.tree;
        let parent_tag = tree
            .parent(id)
            .and_then(|parent| tree.as_element(parent))
            .map(|e| e.tag_name.as_str());

        if parent_tag.is_some_and(is_raw_text_element) {
            self.out.push_str(text);
            return;
        }

        let escaped = escape_text(text);
        if self.minify || is_blank(text) || parent_tag.is_some_and(preserves_whitespace) {
            self.out.push_str(&escaped);
        } else {
            self.out
                .push_str(&collapse_whitespace(&escaped, |c| matches!(c, ' ' | '\t' | '\r' | '\n')));
        }
    }
}

/// Whether a node's children can be placed on their own indented lines
/// without changing rendering: the node is not inline-level, no child
/// element is inline-level, and no child text has visible content.
#[must_use]
pub fn can_reformat_children(tree: &DomTree, id: NodeId) -> bool {
    if tree.as_element(id).is_some_and(|e| is_inline_element(&e.tag_name)) {
        return false;
    }
    tree.children(id).iter().all(|&child| {
        match tree.get(child).map(|n| &n.node_type) {
            Some(NodeType::Text(text)) => is_blank(text),
            Some(NodeType::Element(e)) => !is_inline_element(&e.tag_name),
            _ => true,
        }
    })
}

/// Whitespace in the HTML sense: space, tab, CR, LF, FF. A non-breaking
/// space is content.
fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_whitespace())
}

fn is_blank_text(tree: &DomTree, id: NodeId) -> bool {
    tree.as_text(id).is_some_and(is_blank)
}

/// Replace each run of characters matching `is_space` with one space.
fn collapse_whitespace(text: &str, is_space: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if is_space(c) {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Escape text content: `& < > " '` and the non-breaking space.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value. Apostrophes stay bare so values
/// like `:class="'active'"` survive a round trip.
#[must_use]
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the subtree at `id` as an indented outline, one node per line.
#[must_use]
pub fn dump_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    let mut stack = vec![(id, 0)];
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        out.push_str(&"  ".repeat(depth));
        out.push_str(&dump_line(&node.node_type));
        out.push('\n');
        stack.extend(tree.children(id).iter().rev().map(|&child| (child, depth + 1)));
    }
    out
}

fn dump_line(node_type: &NodeType) -> String {
    match node_type {
        NodeType::Document => "root".to_string(),
        NodeType::Element(data) => {
            let attrs: Vec<String> = data
                .attrs
                .iter()
                .map(|(k, v)| {
                    if data.is_boolean_attribute(k) {
                        k.clone()
                    } else {
                        format!("{k}=\"{v}\"")
                    }
                })
                .collect();
            if attrs.is_empty() {
                format!("<{}>", data.qualified_name())
            } else {
                format!("<{} {}>", data.qualified_name(), attrs.join(" "))
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            format!("\"{display}\"")
        }
        NodeType::Comment(data) => format!("<!-- {data} -->"),
        NodeType::Cdata(data) => format!("<![CDATA[{data}]]>"),
    }
}

/// Print [`dump_tree`] output to stdout.
pub fn print_tree(tree: &DomTree, id: NodeId) {
    print!("{}", dump_tree(tree, id));
}
