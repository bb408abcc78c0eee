//! CSS Selector parsing and matching
//!
//! This module implements the subset of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) that markup
//! queries and style inlining need: type, class, ID, universal and attribute
//! selectors, compound selectors, the four combinators and comma-separated
//! selector lists.
//!
//! Parsing produces a [`SelectorList`] AST; matching walks it right to left
//! from the subject element.

mod parse;

use std::fmt;

use strum_macros::Display;
use tessera_common::warning::warn_once;
use tessera_dom::{DomTree, ElementData, NodeId, NodeList};

pub use parse::{SelectorError, parse_selector_list};

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    ///
    /// Stored lowercased. Examples: `div`, `p`, `span`
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// "An ID selector is a hash (#, U+0023) immediately followed by the
    /// ID value, which is an identifier."
    Id(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*) and represents the
    /// qualified name of any element type."
    Universal,

    /// A pseudo-class or pseudo-element, kept as written (`:hover`,
    /// `::before`, `:nth-child(2)`). Static markup has no interactive or
    /// generated state, so it never matches, but a rule using it still
    /// parses and is left in place by the inliner.
    NeverMatch(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeSelector),
}

/// Attribute selectors per [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors).
///
/// Values are stored with surrounding quotes removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]`: "Represents an element with the att attribute"
    Exists(String),

    /// `[attr=value]`: "Represents an element with the att attribute whose
    /// value is exactly 'val'."
    ///
    /// `[attr=]` matches an attribute present with an empty value, which
    /// includes boolean attributes.
    Equals(String, String),

    /// `[attr~=value]`: one of the whitespace-separated words is exactly 'val'.
    Includes(String, String),

    /// `[attr|=value]`: exactly 'val' or 'val' followed by '-'.
    DashMatch(String, String),

    /// `[attr^=value]`: begins with 'val'.
    PrefixMatch(String, String),

    /// `[attr$=value]`: ends with 'val'.
    SuffixMatch(String, String),

    /// `[attr*=value]`: contains at least one instance of 'val'.
    SubstringMatch(String, String),
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The list of simple selectors that make up this compound selector.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
///
/// Displays as the canonical separator written between two compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    #[strum(serialize = " ")]
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    #[strum(serialize = " > ")]
    Child,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    #[strum(serialize = " + ")]
    NextSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that follows
    /// element A (not necessarily immediately), where A and B share the same
    /// parent."
    #[strum(serialize = " ~ ")]
    SubsequentSibling,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a chain of one or more compound selectors separated
/// by combinators."
///
/// Example: `section.main ul li`
/// ```text
/// subject: [li]
/// combinators: [(Descendant, [ul]), (Descendant, [section.main])]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector (the subject of the selector).
    /// "The elements represented by a complex selector are the elements matched
    /// by the last compound selector in the complex selector."
    pub subject: CompoundSelector,

    /// Chain of (combinator, compound) pairs going left from the subject.
    /// Empty for a lone compound selector.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// "A list of simple/compound/complex selectors is a comma-separated list of
/// simple, compound, or complex selectors."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    /// The comma-separated branches, in source order.
    pub selectors: Vec<ComplexSelector>,
}

// =============================================================================
// Matching
// =============================================================================

impl SelectorList {
    /// A node matches the list if it matches any branch.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.selectors.iter().any(|selector| selector.matches(tree, node))
    }
}

impl ComplexSelector {
    /// Check if this is a lone compound selector (no combinators).
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.combinators.is_empty()
    }

    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Only element nodes can match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        compound_matches(&self.subject, tree, node) && chain_matches(&self.combinators, tree, node)
    }
}

impl CompoundSelector {
    /// Whether every simple selector matches `element`.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        self.simple_selectors.iter().all(|simple| simple.matches(element))
    }
}

/// Match the remaining combinator chain starting from `node`, which already
/// matched the compound to the right.
///
/// Ancestor and sibling searches try every candidate, so `div p` matches a
/// `<p>` inside `<div><section><div>` even when the nearest `div` fails the
/// rest of the chain.
fn chain_matches(chain: &[(Combinator, CompoundSelector)], tree: &DomTree, node: NodeId) -> bool {
    let Some(((combinator, compound), rest)) = chain.split_first() else {
        return true;
    };
    let continues = |candidate: NodeId| {
        compound_matches(compound, tree, candidate) && chain_matches(rest, tree, candidate)
    };
    match combinator {
        Combinator::Descendant => tree.ancestors(node).any(continues),
        Combinator::Child => tree.parent(node).is_some_and(continues),
        Combinator::NextSibling => tree
            .preceding_siblings(node)
            .find(|&sibling| tree.as_element(sibling).is_some())
            .is_some_and(continues),
        Combinator::SubsequentSibling => tree.preceding_siblings(node).any(continues),
    }
}

fn compound_matches(compound: &CompoundSelector, tree: &DomTree, node: NodeId) -> bool {
    tree.as_element(node).is_some_and(|element| compound.matches(element))
}

impl SimpleSelector {
    /// Check if this simple selector matches the given element.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Type(name) => element.tag_name.eq_ignore_ascii_case(name),
            Self::Class(class_name) => element.has_class(class_name),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Universal => true,
            Self::NeverMatch(_) => false,
            Self::Attribute(attribute) => attribute.matches(element),
        }
    }
}

impl AttributeSelector {
    /// Check the attribute condition against `element`.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        let value_of = |name: &str| element.attrs.get(name).map(String::as_str);
        match self {
            Self::Exists(name) => value_of(name).is_some(),
            Self::Equals(name, val) => value_of(name) == Some(val.as_str()),
            Self::Includes(name, val) => {
                value_of(name).is_some_and(|v| v.split_ascii_whitespace().any(|w| w == val))
            }
            Self::DashMatch(name, val) => value_of(name).is_some_and(|v| {
                v == val || v.strip_prefix(val.as_str()).is_some_and(|rest| rest.starts_with('-'))
            }),
            Self::PrefixMatch(name, val) => {
                value_of(name).is_some_and(|v| !val.is_empty() && v.starts_with(val.as_str()))
            }
            Self::SuffixMatch(name, val) => {
                value_of(name).is_some_and(|v| !val.is_empty() && v.ends_with(val.as_str()))
            }
            Self::SubstringMatch(name, val) => {
                value_of(name).is_some_and(|v| !val.is_empty() && v.contains(val.as_str()))
            }
        }
    }
}

// =============================================================================
// Queries
// =============================================================================

/// Parse `selector`, reporting a syntax error once through the warning sink.
fn parse_or_warn(selector: &str) -> Option<SelectorList> {
    match parse_selector_list(selector) {
        Ok(list) => Some(list),
        Err(error) => {
            warn_once("CSS", &error.to_string());
            None
        }
    }
}

/// Whether `node` matches `selector`. An unparseable selector matches nothing.
#[must_use]
pub fn matches(selector: &str, tree: &DomTree, node: NodeId) -> bool {
    parse_or_warn(selector).is_some_and(|list| list.matches(tree, node))
}

/// Alias of [`matches`] under the name the stylesheet tooling uses.
#[must_use]
pub fn css_matches(selector: &str, tree: &DomTree, node: NodeId) -> bool {
    matches(selector, tree, node)
}

/// Every element at or below `root` matching `selector`, in document order.
/// A node matching several comma-separated branches appears once.
#[must_use]
pub fn query_all(tree: &DomTree, root: NodeId, selector: &str) -> NodeList {
    let Some(list) = parse_or_warn(selector) else {
        return NodeList::new();
    };
    tree.inclusive_descendants(root)
        .filter(|&node| list.matches(tree, node))
        .collect()
}

/// The first element at or below `root` matching `selector`.
#[must_use]
pub fn query_first(tree: &DomTree, root: NodeId, selector: &str) -> Option<NodeId> {
    let list = parse_or_warn(selector)?;
    tree.inclusive_descendants(root)
        .find(|&node| list.matches(tree, node))
}

/// Selector queries on a [`DomTree`].
pub trait SelectorQuery {
    /// [§ 4.2.6 querySelectorAll](https://dom.spec.whatwg.org/#dom-parentnode-queryselectorall)
    fn query_selector_all(&self, root: NodeId, selector: &str) -> NodeList;

    /// [§ 4.2.6 querySelector](https://dom.spec.whatwg.org/#dom-parentnode-queryselector)
    fn query_selector(&self, root: NodeId, selector: &str) -> Option<NodeId>;

    /// Elements at or below `root` with the given tag name, case-insensitive.
    fn get_elements_by_tag_name(&self, root: NodeId, tag_name: &str) -> NodeList;

    /// [§ 4.9 matches](https://dom.spec.whatwg.org/#dom-element-matches)
    fn matches_selector(&self, node: NodeId, selector: &str) -> bool;
}

impl SelectorQuery for DomTree {
    fn query_selector_all(&self, root: NodeId, selector: &str) -> NodeList {
        query_all(self, root, selector)
    }

    fn query_selector(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        query_first(self, root, selector)
    }

    fn get_elements_by_tag_name(&self, root: NodeId, tag_name: &str) -> NodeList {
        self.elements_by_tag_name(root, tag_name)
    }

    fn matches_selector(&self, node: NodeId, selector: &str) -> bool {
        matches(selector, self, node)
    }
}

// =============================================================================
// Canonical text form
// =============================================================================

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => f.write_str(name),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Id(name) => write!(f, "#{name}"),
            Self::Universal => f.write_str("*"),
            Self::NeverMatch(pseudo) => f.write_str(pseudo),
            Self::Attribute(attribute) => write!(f, "{attribute}"),
        }
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, op, value) = match self {
            Self::Exists(name) => return write!(f, "[{name}]"),
            Self::Equals(name, value) => (name, "=", value),
            Self::Includes(name, value) => (name, "~=", value),
            Self::DashMatch(name, value) => (name, "|=", value),
            Self::PrefixMatch(name, value) => (name, "^=", value),
            Self::SuffixMatch(name, value) => (name, "$=", value),
            Self::SubstringMatch(name, value) => (name, "*=", value),
        };
        write!(f, "[{name}{op}\"{value}\"]")
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for simple in &self.simple_selectors {
            write!(f, "{simple}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (combinator, compound) in self.combinators.iter().rev() {
            write!(f, "{compound}{combinator}")?;
        }
        write!(f, "{}", self.subject)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}
