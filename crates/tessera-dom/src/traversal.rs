//! Navigation, iterators and subtree collections.

use crate::{DomTree, NodeId, NodeList, NodeType};

impl DomTree {
    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// "An object A is called a descendant of an object B, if either A is a
    /// child of B or A is a child of an object C that is a descendant of B."
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> PrecedingSiblingIterator<'_> {
        PrecedingSiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
        }
    }

    /// Pre-order iteration over the descendants of `id`, excluding `id`.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// [§ 4.2.6](https://dom.spec.whatwg.org/#concept-tree-inclusive-descendant)
    ///
    /// "An inclusive descendant is an object or one of its descendants."
    ///
    /// Pre-order iteration starting with `id` itself.
    #[must_use]
    pub fn inclusive_descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    ///
    /// When the parser promoted an `<html>` element to be the root, that
    /// element is the document element.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        if self.as_element(self.root).is_some() {
            return Some(self.root);
        }
        self.children(self.root)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Text, comment and CDATA nodes return their payload. Any other node
    /// returns the concatenated text of its descendant text nodes in document
    /// order; comments and CDATA below it contribute nothing.
    #[must_use]
    pub fn inner_text(&self, id: NodeId) -> String {
        if let Some(contents) = self.contents(id) {
            return contents.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.as_text(d))
            .collect()
    }

    /// All descendant text nodes, in pre-order.
    #[must_use]
    pub fn all_text_nodes(&self, id: NodeId) -> NodeList {
        self.descendants(id)
            .filter(|&d| matches!(self.get(d).map(|n| &n.node_type), Some(NodeType::Text(_))))
            .collect()
    }

    /// All descendant comment nodes, in pre-order.
    #[must_use]
    pub fn all_comment_nodes(&self, id: NodeId) -> NodeList {
        self.descendants(id)
            .filter(|&d| matches!(self.get(d).map(|n| &n.node_type), Some(NodeType::Comment(_))))
            .collect()
    }

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-document-getelementsbytagname)
    ///
    /// Elements whose local or qualified name equals `tag_name` (ASCII
    /// case-insensitive), starting with `id` itself, in pre-order. `*`
    /// selects every element.
    #[must_use]
    pub fn elements_by_tag_name(&self, id: NodeId, tag_name: &str) -> NodeList {
        self.inclusive_descendants(id)
            .filter(|&d| {
                self.as_element(d).is_some_and(|e| {
                    tag_name == "*"
                        || e.tag_name.eq_ignore_ascii_case(tag_name)
                        || e.qualified_name().eq_ignore_ascii_case(tag_name)
                })
            })
            .collect()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over preceding siblings of a node.
pub struct PrecedingSiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for PrecedingSiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.prev_sibling(id);
        Some(id)
    }
}

/// Pre-order (document order) iterator over a subtree.
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
