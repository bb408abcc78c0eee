//! The tree builder.
//!
//! Modelled loosely on [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction),
//! without insertion modes: a single stack of open elements and a byte
//! cursor that only moves forward.

use std::fmt;
use std::sync::Arc;

use strum_macros::Display;
use tessera_common::warning::warn_once;
use tessera_dom::{DomTree, NodeId};

/// Hook run on the raw input before anything else.
pub type PreprocessFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Options controlling how markup is turned into a tree.
#[derive(Clone, Default)]
pub struct ParseOptions {
    /// Collapse every whitespace run in text to a single space.
    pub normalize_whitespace: bool,
    /// Transform applied to the input before parsing. An empty result yields
    /// an empty document.
    pub preprocess: Option<PreprocessFn>,
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("normalize_whitespace", &self.normalize_whitespace)
            .field("preprocess", &self.preprocess.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl ParseOptions {
    /// Default options: whitespace kept, no preprocessing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable whitespace normalization in text runs.
    #[must_use]
    pub fn with_normalize_whitespace(mut self, enabled: bool) -> Self {
        self.normalize_whitespace = enabled;
        self
    }

    /// Install a preprocessing hook.
    #[must_use]
    pub fn with_preprocess<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.preprocess = Some(Arc::new(hook));
        self
    }
}

/// Kinds of malformed input the builder recovers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ParseIssueKind {
    /// A closing tag with no matching open element.
    #[strum(to_string = "unmatched closing tag")]
    UnmatchedClosingTag,
    /// A `<` with no tag-terminating `>` after it.
    #[strum(to_string = "unterminated tag")]
    UnterminatedTag,
    /// A `<...>` chunk that is neither a valid start tag nor a valid end tag.
    #[strum(to_string = "unparseable tag")]
    UnparseableTag,
}

/// One recovery event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What went wrong.
    pub kind: ParseIssueKind,
    /// Byte offset into the trimmed input (after the preamble) where the
    /// problem starts.
    pub offset: usize,
    /// The offending source text, shortened.
    pub snippet: String,
}

/// Everything the builder recovered from while parsing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    issues: Vec<ParseIssue>,
}

impl ParseReport {
    /// All recovery events in input order.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Number of events of the given kind.
    #[must_use]
    pub fn count(&self, kind: ParseIssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }

    /// True if the input needed no recovery at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Longest snippet kept in a [`ParseIssue`].
const SNIPPET_CHARS: usize = 24;

/// Builds a [`DomTree`] from markup.
pub struct TreeBuilder {
    /// Trimmed input with the preamble removed.
    pub(super) input: String,
    /// Byte cursor into `input`. Only ever moves forward.
    pub(super) pos: usize,
    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// Starts with the synthetic document node, which is never popped.
    pub(super) stack_of_open_elements: Vec<NodeId>,
    /// The tree under construction.
    pub(super) tree: DomTree,
    /// Copied from [`ParseOptions::normalize_whitespace`].
    pub(super) normalize_whitespace: bool,
    /// Recovery events so far.
    issues: Vec<ParseIssue>,
    /// `<!DOCTYPE ...>` captured ahead of the markup.
    doctype: Option<String>,
    /// `<?xml ...?>` captured ahead of the markup.
    xml_declaration: Option<String>,
}

impl TreeBuilder {
    /// Prepare a builder: run the preprocess hook, trim, and capture the
    /// XML declaration and doctype.
    #[must_use]
    pub fn new(markup: &str, options: &ParseOptions) -> Self {
        let mut builder = Self {
            input: String::new(),
            pos: 0,
            stack_of_open_elements: vec![NodeId::ROOT],
            tree: DomTree::new(),
            normalize_whitespace: options.normalize_whitespace,
            issues: Vec::new(),
            doctype: None,
            xml_declaration: None,
        };

        let preprocessed = options
            .preprocess
            .as_ref()
            .map_or_else(|| markup.to_string(), |hook| hook(markup));
        if preprocessed.is_empty() {
            return builder;
        }

        let mut input = preprocessed.trim();
        if let Some((declaration, rest)) = split_xml_declaration(input) {
            builder.xml_declaration = Some(declaration.to_string());
            input = rest.trim_start();
        }
        if let Some((doctype, rest)) = split_doctype(input) {
            builder.doctype = Some(doctype.to_string());
            input = rest.trim_start();
        }
        builder.input = input.to_string();
        builder
    }

    /// Run the builder to completion.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_report().0
    }

    /// Run the builder, also returning the recovery report.
    #[must_use]
    pub fn run_with_report(mut self) -> (DomTree, ParseReport) {
        while self.pos < self.input.len() {
            self.step();
        }
        self.finish()
    }

    /// One dispatch iteration. Every branch advances the cursor.
    fn step(&mut self) {
        if self.consume_comment() || self.consume_cdata() || self.consume_raw_text_element() {
            return;
        }
        if self.remaining().starts_with('<') {
            self.consume_tag();
        } else {
            self.consume_text();
        }
    }

    /// Close everything still open, pick the document root and attach the
    /// preamble to it.
    fn finish(mut self) -> (DomTree, ParseReport) {
        // [§ 13.2.6.5 The end](https://html.spec.whatwg.org/multipage/parsing.html#the-end)
        // "Pop all the nodes off the stack of open elements."
        self.stack_of_open_elements.truncate(1);

        let promoted = match self.tree.children(NodeId::ROOT) {
            &[only] if self.tree.is_element_named(only, "html") => Some(only),
            _ => None,
        };
        if let Some(html) = promoted {
            self.tree.remove(html);
            self.tree.set_root(html);
        }
        self.tree.set_doctype(self.doctype.take());
        self.tree.set_xml_declaration(self.xml_declaration.take());

        for issue in &self.issues {
            warn_once("HTML Parser", &format!("recovered from {}", issue.kind));
        }

        (self.tree, ParseReport { issues: self.issues })
    }

    /// Record a recovery event at the current cursor position.
    pub(super) fn record_issue(&mut self, kind: ParseIssueKind) {
        let snippet = self.remaining().chars().take(SNIPPET_CHARS).collect();
        self.issues.push(ParseIssue {
            kind,
            offset: self.pos,
            snippet,
        });
    }
}

/// Split a leading `<?xml ...?>` (ASCII case-insensitive) off `input`.
fn split_xml_declaration(input: &str) -> Option<(&str, &str)> {
    if !starts_with_ignore_ascii_case(input, "<?xml") {
        return None;
    }
    let end = input.find('>')?;
    let declaration = &input[..=end];
    (declaration.len() >= "<?xml?>".len() && declaration.ends_with("?>"))
        .then(|| (declaration, &input[end + 1..]))
}

/// Split a leading `<!DOCTYPE ...>` (ASCII case-insensitive) off `input`.
fn split_doctype(input: &str) -> Option<(&str, &str)> {
    if !starts_with_ignore_ascii_case(input, "<!doctype") {
        return None;
    }
    let end = input.find('>')?;
    Some((&input[..=end], &input[end + 1..]))
}

pub(super) fn starts_with_ignore_ascii_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}
