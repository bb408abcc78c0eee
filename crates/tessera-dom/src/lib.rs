//! Node tree for the Tessera markup toolkit.
//!
//! This crate provides an arena-based tree modelled on the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), trimmed down to the
//! node kinds a tolerant HTML/XML parser produces: a synthetic document
//! wrapper, elements, text, comments and CDATA sections.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues.
//! Detached nodes keep their arena slot; they simply become unreachable from
//! [`DomTree::root`] and every traversal skips them.

mod mutation;
mod node_list;
mod traversal;

use indexmap::{IndexMap, IndexSet};
use strum_macros::Display;

pub use node_list::NodeList;
pub use traversal::{AncestorIterator, Descendants, PrecedingSiblingIterator};

/// Map of attribute names to values for an element, in source order.
pub type AttributesMap = IndexMap<String, String>;

/// A type-safe index into the node tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The synthetic document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
///
/// This node stores indices for parent/child/sibling relationships,
/// enabling O(1) traversal in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    /// "An object A's next sibling is the object immediately following A
    /// in the children of A's parent."
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    /// "An object A's previous sibling is the object immediately preceding A
    /// in the children of A's parent."
    pub prev_sibling: Option<NodeId>,

    /// Raw `<!DOCTYPE ...>` text captured ahead of the markup.
    ///
    /// Only ever set on the node serving as the document root.
    pub doctype: Option<String>,

    /// Raw `<?xml ...?>` declaration captured ahead of the markup.
    pub xml_declaration: Option<String>,
}

impl Node {
    fn detached(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
            doctype: None,
            xml_declaration: None,
        }
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    ///
    /// The synthetic wrapper the parser builds around fragment input. It
    /// renders only its children.
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    /// "Text nodes are known as text."
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    /// "Comment nodes are known as comments."
    Comment(String),
    /// [§ 4.11 Interface CDATASection](https://dom.spec.whatwg.org/#interface-cdatasection)
    ///
    /// Content between `<![CDATA[` and `]]>`, kept verbatim.
    Cdata(String),
}

impl NodeType {
    /// The payload-free discriminator for this node type.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Document => NodeKind::Document,
            Self::Element(_) => NodeKind::Element,
            Self::Text(_) => NodeKind::Text,
            Self::Comment(_) => NodeKind::Comment,
            Self::Cdata(_) => NodeKind::Cdata,
        }
    }
}

/// Payload-free node kind, used for dumps and log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    /// The synthetic document wrapper.
    #[strum(serialize = "root")]
    Document,
    /// An element.
    Element,
    /// A text run.
    Text,
    /// A comment.
    Comment,
    /// A CDATA section.
    Cdata,
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name..."
///
/// NOTE: `namespace` holds the *prefix* written in the source (`svg` in
/// `<svg:rect>`), not a namespace URI. No prefix resolution happens.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element's namespace prefix", if the tag was written `prefix:local`.
    pub namespace: Option<String>,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
    /// Attribute names that were written without a value (`checked`).
    ///
    /// These are also present in `attrs` with an empty value.
    pub boolean_attrs: IndexSet<String>,
}

impl ElementData {
    /// Create element data with the given local name and no attributes.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// Returns the class names from the class attribute.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the element belongs to."
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .map(String::as_str)
            .unwrap_or_default()
            .split_whitespace()
    }

    /// Whether `name` is one of the element's classes.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes().any(|class| class == name)
    }

    /// [§ 4.9](https://dom.spec.whatwg.org/#concept-element-qualified-name)
    ///
    /// "An element's qualified name is its local name if its namespace prefix
    /// is null; otherwise its namespace prefix, followed by ":", followed by
    /// its local name."
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", self.tag_name),
            _ => self.tag_name.clone(),
        }
    }

    /// Whether `name` was written as a value-less attribute.
    #[must_use]
    pub fn is_boolean_attribute(&self, name: &str) -> bool {
        self.boolean_attrs.contains(name)
    }
}

/// Arena-based node tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree. A tree is a finite hierarchical
/// tree structure."
///
/// All nodes live in a contiguous vector and refer to each other by index.
/// The synthetic [`NodeType::Document`] node always occupies slot 0
/// ([`NodeId::ROOT`]), but the *document root* may be re-pointed at another
/// node with [`DomTree::set_root`] (the parser does this when the whole input
/// is a single `<html>` element).
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes ever allocated, indexed by `NodeId`.
    nodes: Vec<Node>,
    /// The node serialization and queries start from.
    root: NodeId,
}

impl DomTree {
    /// Create a new tree holding just the synthetic document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeType::Document)],
            root: NodeId::ROOT,
        }
    }

    /// The document root.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Re-point the document root.
    pub const fn set_root(&mut self, id: NodeId) {
        self.root = id;
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of allocated arena slots, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty (it always holds at least the document node).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(node_type));
        id
    }

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-document-createelement)
    ///
    /// Allocate a detached element with no attributes.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeType::Element(ElementData::new(tag_name)))
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Text(text.into()))
    }

    /// Allocate a detached comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Comment(text.into()))
    }

    /// Allocate a detached CDATA section.
    pub fn create_cdata(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Cdata(text.into()))
    }

    /// The kind of the node, or `None` for an out-of-range id.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(|n| n.node_type.kind())
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Raw payload of a text, comment or CDATA node.
    #[must_use]
    pub fn contents(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) | NodeType::Comment(s) | NodeType::Cdata(s) => Some(s.as_str()),
            NodeType::Document | NodeType::Element(_) => None,
        })
    }

    /// Whether the node is an element with the given local name
    /// (ASCII case-insensitive).
    #[must_use]
    pub fn is_element_named(&self, id: NodeId, tag_name: &str) -> bool {
        self.as_element(id)
            .is_some_and(|e| e.tag_name.eq_ignore_ascii_case(tag_name))
    }

    // ===== Attributes =====

    /// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-getattribute)
    ///
    /// `None` means the attribute is absent, which is distinct from
    /// `Some("")` (present with an empty value).
    #[must_use]
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id)
            .and_then(|e| e.attrs.get(name))
            .map(String::as_str)
    }

    /// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-hasattribute)
    #[must_use]
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.as_element(id).is_some_and(|e| e.attrs.contains_key(name))
    }

    /// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-setattribute)
    ///
    /// An existing attribute keeps its position. The name stops being a
    /// boolean attribute. No-op on non-elements.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.as_element_mut(id) {
            let _ = element.attrs.insert(name.to_string(), value.into());
            let _ = element.boolean_attrs.shift_remove(name);
        }
    }

    /// Set a value-less attribute: stored with an empty value and rendered bare.
    pub fn set_boolean_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(element) = self.as_element_mut(id) {
            let _ = element.attrs.insert(name.to_string(), String::new());
            let _ = element.boolean_attrs.insert(name.to_string());
        }
    }

    /// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-removeattribute)
    ///
    /// Removes both the value and the boolean flag.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(element) = self.as_element_mut(id) {
            let _ = element.attrs.shift_remove(name);
            let _ = element.boolean_attrs.shift_remove(name);
        }
    }

    /// All attributes of an element, in insertion order.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> Option<&AttributesMap> {
        self.as_element(id).map(|e| &e.attrs)
    }

    // ===== Preamble =====

    /// The doctype attached to the document root.
    #[must_use]
    pub fn doctype(&self) -> Option<&str> {
        self.get(self.root).and_then(|n| n.doctype.as_deref())
    }

    /// Attach a doctype to the document root.
    pub fn set_doctype(&mut self, doctype: Option<String>) {
        let root = self.root;
        if let Some(node) = self.get_mut(root) {
            node.doctype = doctype;
        }
    }

    /// The XML declaration attached to the document root.
    #[must_use]
    pub fn xml_declaration(&self) -> Option<&str> {
        self.get(self.root).and_then(|n| n.xml_declaration.as_deref())
    }

    /// Attach an XML declaration to the document root.
    pub fn set_xml_declaration(&mut self, declaration: Option<String>) {
        let root = self.root;
        if let Some(node) = self.get_mut(root) {
            node.xml_declaration = declaration;
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
