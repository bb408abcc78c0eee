//! Tree mutation: insertion, removal and content replacement.
//!
//! Every method here keeps the three relationships in step: the parent's
//! `children` list, the child's `parent` back-reference, and the
//! `prev_sibling`/`next_sibling` links of the child and its neighbours.

use crate::{DomTree, NodeId, NodeType};

impl DomTree {
    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`, updating all
    /// relationships. A child attached elsewhere is detached first. There is
    /// no cycle detection.
    ///
    /// # Panics
    ///
    /// Panics if `parent` or `child` was not allocated in this tree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.nodes[child.0].parent.is_some() {
            self.detach(child);
        }

        // Get the current last child of parent (if any) to set up sibling links
        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Detach `node` from its parent. Its subtree stays attached to it and
    /// moves as a unit; the arena slot is not reclaimed.
    ///
    /// # Panics
    ///
    /// Panics if `node` was not allocated in this tree.
    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    /// Remove `child` from `parent`. Does nothing if `child` belongs to a
    /// different parent.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
    }

    /// Remove `node`; for a comment, also strip every literal occurrence of
    /// the comment's text from the text siblings directly before and after it.
    ///
    /// Templating systems sometimes duplicate a comment's payload into the
    /// surrounding text; this undoes that in one call. Other node kinds are
    /// removed exactly as by [`DomTree::remove`].
    ///
    /// # Panics
    ///
    /// Panics if `node` was not allocated in this tree.
    pub fn remove_with_content(&mut self, node: NodeId) {
        let comment = match self.get(node).map(|n| &n.node_type) {
            Some(NodeType::Comment(text)) if !text.is_empty() => Some(text.clone()),
            _ => None,
        };

        if let Some(comment) = comment {
            let neighbours = [self.prev_sibling(node), self.next_sibling(node)];
            for sibling in neighbours.into_iter().flatten() {
                if let Some(NodeType::Text(text)) = self.get_mut(sibling).map(|n| &mut n.node_type) {
                    *text = text.replace(comment.as_str(), "");
                }
            }
        }

        self.detach(node);
    }

    /// [§ 4.2.1 Insert](https://dom.spec.whatwg.org/#concept-node-insert)
    ///
    /// Insert `new_node` as the sibling immediately before `reference`.
    ///
    /// NOTE: This is a silent no-op when `reference` has no parent, and when
    /// `new_node` is `reference` itself.
    ///
    /// # Panics
    ///
    /// Panics if `new_node` was not allocated in this tree.
    pub fn insert_before(&mut self, reference: NodeId, new_node: NodeId) {
        self.insert_adjacent(reference, new_node, 0);
    }

    /// Insert `new_node` as the sibling immediately after `reference`.
    ///
    /// Same no-op rules and panics as [`DomTree::insert_before`].
    pub fn insert_after(&mut self, reference: NodeId, new_node: NodeId) {
        self.insert_adjacent(reference, new_node, 1);
    }

    /// Move all children of `from` to the end of `to`'s children, preserving
    /// their order.
    ///
    /// # Panics
    ///
    /// Panics if `from` or `to` was not allocated in this tree.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        let children = self.nodes[from.0].children.clone();
        for child in children {
            self.append_child(to, child);
        }
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Text, comment and CDATA nodes get their payload replaced. Elements and
    /// the document lose all children and, if `text` is non-empty, gain a
    /// single new text child.
    pub fn set_inner_text(&mut self, node: NodeId, text: &str) {
        let Some(slot) = self.get_mut(node) else {
            return;
        };
        if let NodeType::Text(contents) | NodeType::Comment(contents) | NodeType::Cdata(contents) =
            &mut slot.node_type
        {
            *contents = text.to_string();
            return;
        }

        let children = slot.children.clone();
        for child in children {
            self.detach(child);
        }
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(node, text_node);
        }
    }

    /// Copy the subtree rooted at `node` into `target`, returning the id of
    /// the copy. The copy is detached; preamble data travels with the node.
    ///
    /// # Panics
    ///
    /// Panics if `node` was not allocated in this tree.
    pub fn deep_clone_into(&self, node: NodeId, target: &mut Self) -> NodeId {
        let copy = self.clone_node_into(node, target);
        let mut pending = vec![(node, copy)];
        while let Some((source, copy_parent)) = pending.pop() {
            for &child in &self.nodes[source.0].children {
                let child_copy = self.clone_node_into(child, target);
                target.append_child(copy_parent, child_copy);
                pending.push((child, child_copy));
            }
        }
        copy
    }

    // ===== Internal helpers =====

    /// Allocate a detached copy of `node` alone in `target`.
    fn clone_node_into(&self, node: NodeId, target: &mut Self) -> NodeId {
        let source = &self.nodes[node.0];
        let copy = target.alloc(source.node_type.clone());
        if let Some(slot) = target.get_mut(copy) {
            slot.doctype.clone_from(&source.doctype);
            slot.xml_declaration.clone_from(&source.xml_declaration);
        }
        copy
    }

    /// Splice `new_node` into `reference`'s parent at `reference`'s index plus
    /// `offset`.
    fn insert_adjacent(&mut self, reference: NodeId, new_node: NodeId, offset: usize) {
        if reference == new_node || self.parent(reference).is_none() {
            return;
        }
        self.detach(new_node);

        let Some(parent) = self.parent(reference) else {
            return;
        };
        let Some(index) = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == reference)
        else {
            return;
        };

        self.nodes[parent.0].children.insert(index + offset, new_node);
        self.nodes[new_node.0].parent = Some(parent);
        self.relink_siblings(parent);
    }

    /// Unlink `node` from its parent and neighbours.
    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return;
        };
        let prev = self.nodes[node.0].prev_sibling.take();
        let next = self.nodes[node.0].next_sibling.take();

        self.nodes[parent.0].children.retain(|&c| c != node);

        if let Some(prev) = prev {
            self.nodes[prev.0].next_sibling = next;
        }
        if let Some(next) = next {
            self.nodes[next.0].prev_sibling = prev;
        }
    }

    /// Recompute sibling links for every child of `parent` from its
    /// `children` list.
    fn relink_siblings(&mut self, parent: NodeId) {
        let children = self.nodes[parent.0].children.clone();
        for (i, &child) in children.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| children[p]);
            let next = children.get(i + 1).copied();
            self.nodes[child.0].prev_sibling = prev;
            self.nodes[child.0].next_sibling = next;
        }
    }
}
