//! Tolerant HTML/XML parsing and serialization for Tessera.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tree builder**: a forward-only scanner with a stack of open elements
//!   that never fails. Malformed input is recovered from and reported in a
//!   [`ParseReport`].
//!   - Comments, CDATA sections and raw `<script>`/`<style>` bodies
//!   - Void, self-closing and auto-closing (`<li>`, `<p>`, ...) elements
//!   - Namespaced tags (`<svg:rect>`) and framework attributes (`@click`, `:class`)
//!   - A leading XML declaration and doctype
//!
//! - **Serializer** ([WHATWG § 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments))
//!   - Minified output that mirrors the parsed markup
//!   - Pretty output that only reformats where whitespace is insignificant
//!
//! # Not Implemented
//!
//! - Insertion modes and implied `<head>`/`<body>`
//! - Foster parenting and the adoption agency algorithm
//! - Encoding sniffing

/// Start-tag attribute scanning.
pub mod attributes;
/// Void, inline, auto-close and raw-text element tables.
pub mod elements;
/// Character reference decoding.
pub mod entities;
/// Markup to tree construction.
pub mod parser;
/// Tree to markup serialization.
pub mod serializer;

pub use parser::{
    ParseIssue, ParseIssueKind, ParseOptions, ParseReport, TreeBuilder, parse_document,
    parse_document_with_report,
};
pub use serializer::{ToHtml, dump_tree, print_tree, to_html};
