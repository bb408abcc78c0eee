//! Stylesheet parsing and selector matching for Tessera.
//!
//! # Scope
//!
//! This crate implements:
//! - **Rule splitting**: top-level style rules and at-rules with their
//!   source text, and declaration blocks as ordered property maps
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, ID, universal and attribute selectors
//!   - Compound selectors
//!   - Descendant, child and sibling combinators
//!   - Comma-separated selector lists
//!   - `querySelector`/`querySelectorAll` over a [`DomTree`]
//!
//! # Not Implemented
//!
//! - Tokenization per CSS Syntax Level 3
//! - Cascade, specificity and computed values
//! - Pseudo-classes (parsed, never match)

/// Rule and declaration parsing.
pub mod parser;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;

pub use parser::{CssRule, Declarations, RuleKind, parse_css, parse_declarations};
pub use selector::{
    SelectorError, SelectorList, SelectorQuery, css_matches, parse_selector_list, query_all,
    query_first,
};

use tessera_dom::{DomTree, NodeId, NodeList};

/// [HTML Standard § 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// All `<style>` elements at or below `root`, in document order.
#[must_use]
pub fn style_elements(tree: &DomTree, root: NodeId) -> NodeList {
    tree.elements_by_tag_name(root, "style")
}

/// The stylesheet text of one `<style>` element: its Text children
/// concatenated.
#[must_use]
pub fn style_text(tree: &DomTree, style: NodeId) -> String {
    tree.children(style)
        .iter()
        .filter_map(|&child| tree.as_text(child))
        .collect()
}

/// Parse every `<style>` element at or below `root`, in document order.
#[must_use]
pub fn document_stylesheets(tree: &DomTree, root: NodeId) -> Vec<(NodeId, Vec<CssRule>)> {
    style_elements(tree, root)
        .iter()
        .map(|style| (style, parse_css(&style_text(tree, style))))
        .collect()
}
