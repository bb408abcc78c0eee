//! High-level document API for Tessera.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - parse markup into a [`Document`] with its recovery report
//! - **Queries** - CSS selectors and tag-name lookups from the document root
//! - **Serialization** - minified and pretty HTML output
//! - **Style Inlining** - move `<style>` rules onto `style` attributes
//!
//! # Not Yet Implemented
//!
//! - Resource loading (external stylesheets, images)
//! - Script execution

/// `<style>` rule inlining.
pub mod inline;

pub use tessera_common as common;
pub use tessera_css as css;
pub use tessera_dom as dom;
pub use tessera_html as html;

pub use inline::{InlineStyles, to_inlined_html};
pub use tessera_css::SelectorQuery;
pub use tessera_dom::{DomTree, NodeId, NodeKind, NodeList};
pub use tessera_html::{ParseOptions, ParseReport, ToHtml};

use tessera_html::parse_document_with_report;

/// A parsed document.
///
/// Owns the node tree and remembers what the parser had to recover from.
/// Every method works from the document root; use [`Document::tree`] for
/// node-level access.
#[derive(Debug, Clone)]
pub struct Document {
    tree: DomTree,
    report: ParseReport,
}

/// Parse `markup` into a [`Document`].
///
/// Never fails: malformed markup is recovered from and recorded in
/// [`Document::parse_report`].
///
/// # Example
/// ```ignore
/// let doc = parse_document("<ul><li>One<li>Two</ul>", &ParseOptions::default());
/// assert_eq!(doc.query_selector_all("li").len(), 2);
/// ```
#[must_use]
pub fn parse_document(markup: &str, options: &ParseOptions) -> Document {
    let (tree, report) = parse_document_with_report(markup, options);
    Document { tree, report }
}

impl Document {
    /// The node serialization and queries start from.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// The underlying tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The underlying tree, for mutation.
    pub const fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Give up the wrapper and keep the tree.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    /// What the parser recovered from. Empty for trees built by hand.
    #[must_use]
    pub const fn parse_report(&self) -> &ParseReport {
        &self.report
    }

    /// Serialize the whole document.
    #[must_use]
    pub fn to_html(&self, minify: bool) -> String {
        self.tree.to_html(self.root(), minify, 0)
    }

    /// Serialize the whole document with indentation where it is safe.
    #[must_use]
    pub fn to_pretty_html(&self) -> String {
        self.to_html(false)
    }

    /// Inline the document's `<style>` rules and serialize the result.
    ///
    /// Matched elements keep their new `style` attribute afterwards; the
    /// `<style>` elements themselves are left untouched in this document.
    pub fn to_inlined_html(&mut self, minify: bool) -> String {
        let root = self.root();
        self.tree.to_inlined_html(root, minify)
    }

    /// All elements matching `selector`, in document order.
    #[must_use]
    pub fn query_selector_all(&self, selector: &str) -> NodeList {
        self.tree.query_selector_all(self.root(), selector)
    }

    /// The first element matching `selector`.
    #[must_use]
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.tree.query_selector(self.root(), selector)
    }

    /// All elements named `tag_name` (ASCII case-insensitive, `*` for any).
    #[must_use]
    pub fn get_elements_by_tag_name(&self, tag_name: &str) -> NodeList {
        self.tree.get_elements_by_tag_name(self.root(), tag_name)
    }

    /// Every Text node in the document.
    #[must_use]
    pub fn all_text_nodes(&self) -> NodeList {
        self.tree.all_text_nodes(self.root())
    }

    /// Every Comment node in the document.
    #[must_use]
    pub fn all_comment_nodes(&self) -> NodeList {
        self.tree.all_comment_nodes(self.root())
    }

    /// The `<!DOCTYPE ...>` text, if the input had one.
    #[must_use]
    pub fn doctype(&self) -> Option<&str> {
        self.tree.doctype()
    }

    /// The `<?xml ...?>` text, if the input had one.
    #[must_use]
    pub fn xml_declaration(&self) -> Option<&str> {
        self.tree.xml_declaration()
    }
}

impl From<DomTree> for Document {
    fn from(tree: DomTree) -> Self {
        Self {
            tree,
            report: ParseReport::default(),
        }
    }
}
