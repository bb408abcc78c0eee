//! Tolerant tree construction.
//!
//! The builder makes one forward pass over the input and never rejects
//! markup: stray closers are ignored, unterminated tags are skipped one
//! character at a time, and anything left open at the end is closed
//! implicitly.

/// Input scanning helpers for the tree builder.
mod helpers;
/// Parse options, recovery report and the tree builder itself.
pub mod tree_builder;

pub use tree_builder::{ParseIssue, ParseIssueKind, ParseOptions, ParseReport, TreeBuilder};

use tessera_dom::DomTree;

/// Parse `markup` into a tree.
///
/// # Example
/// ```ignore
/// let tree = parse_document("<ul><li>One<li>Two</ul>", &ParseOptions::default());
/// ```
#[must_use]
pub fn parse_document(markup: &str, options: &ParseOptions) -> DomTree {
    TreeBuilder::new(markup, options).run()
}

/// Parse `markup`, also returning what the builder had to recover from.
#[must_use]
pub fn parse_document_with_report(markup: &str, options: &ParseOptions) -> (DomTree, ParseReport) {
    TreeBuilder::new(markup, options).run_with_report()
}
