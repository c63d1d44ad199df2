//! XML tree (arena-based allocation)

use crate::namespace::NamespaceScope;
use crate::node::{Node, NodeData, QName};
use crate::NodeId;

/// Arena-based XML tree
///
/// Index 0 is always the document node. Mutation is limited to value
/// overwrite: element text content and attribute values may change,
/// the element structure does not.
#[derive(Debug)]
pub struct XmlTree {
    nodes: Vec<Node>,
}

impl XmlTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree holds only the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Allocate an element node (not yet attached)
    pub fn create_element(&mut self, name: QName) -> NodeId {
        self.push(Node::element(name))
    }

    /// Allocate a text node (not yet attached)
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Allocate a comment node (not yet attached)
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content.to_string()))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append a node as the last child of a parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last = self.nodes[parent.0 as usize].last_child;

        {
            let node = &mut self.nodes[child.0 as usize];
            node.parent = parent;
            node.prev_sibling = prev_last;
            node.next_sibling = NodeId::NONE;
        }

        if prev_last.is_valid() {
            self.nodes[prev_last.0 as usize].next_sibling = child;
        } else {
            self.nodes[parent.0 as usize].first_child = child;
        }
        self.nodes[parent.0 as usize].last_child = child;
    }

    /// Unlink a node from its parent (the arena slot stays allocated)
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id.0 as usize];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = next;
        } else {
            self.nodes[parent.0 as usize].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.0 as usize].prev_sibling = prev;
        } else {
            self.nodes[parent.0 as usize].last_child = prev;
        }

        let node = &mut self.nodes[id.0 as usize];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Iterate direct children in document order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Iterate all descendants in document (pre-) order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// XPath string-value: concatenated text of all descendant text nodes
    pub fn string_value(&self, id: NodeId) -> String {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(t)) => t.clone(),
            Some(NodeData::Element(_)) | Some(NodeData::Document) => {
                let mut out = String::new();
                for (_, node) in self.descendants(id) {
                    if let Some(text) = node.as_text() {
                        out.push_str(text);
                    }
                }
                out
            }
            _ => String::new(),
        }
    }

    /// Overwrite an element's text content in place
    ///
    /// The first text child is rewritten and any further text children
    /// are detached; an element with no text child gains one. Element
    /// children are untouched and the element itself keeps its identity.
    pub fn set_text(&mut self, id: NodeId, value: &str) {
        tracing::trace!(node = id.0, "overwriting text content");
        let text_children: Vec<NodeId> = self
            .children(id)
            .filter(|(_, n)| n.is_text())
            .map(|(cid, _)| cid)
            .collect();

        match text_children.split_first() {
            Some((first, rest)) => {
                if let NodeData::Text(content) = &mut self.nodes[first.0 as usize].data {
                    value.clone_into(content);
                }
                for extra in rest {
                    self.detach(*extra);
                }
            }
            None => {
                let text = self.create_text(value);
                self.append_child(id, text);
            }
        }
    }

    /// Namespace bindings in force at an element
    ///
    /// Walks the ancestor chain from the document down, so inner
    /// redeclarations shadow outer ones. Recomputed per element.
    pub fn namespace_scope(&self, id: NodeId) -> NamespaceScope {
        let mut chain = Vec::new();
        let mut current = id;
        while current.is_valid() {
            chain.push(current);
            current = self.get(current).map_or(NodeId::NONE, |n| n.parent);
        }

        let mut scope = NamespaceScope::new();
        for ancestor in chain.into_iter().rev() {
            if let Some(elem) = self.get(ancestor).and_then(Node::as_element) {
                for (prefix, uri) in &elem.namespace_decls {
                    scope.declare(prefix.as_deref(), uri);
                }
            }
        }
        scope
    }
}

impl Default for XmlTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a XmlTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Iterator over all descendants, document order
pub struct Descendants<'a> {
    tree: &'a XmlTree,
    root: NodeId,
    next: NodeId,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;

        // Advance: child, then sibling, then climb until the root
        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut current = id;
            loop {
                if current == self.root {
                    break NodeId::NONE;
                }
                let n = self.tree.get(current)?;
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                current = n.parent;
                if !current.is_valid() {
                    break NodeId::NONE;
                }
            }
        };

        Some((id, node))
    }
}
