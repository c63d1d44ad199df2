//! Document - high-level wrapper over a tree

use crate::{Node, NodeId, XmlTree};

/// XML document
#[derive(Debug)]
pub struct Document {
    tree: XmlTree,
}

impl Document {
    /// Wrap a finished tree
    pub fn new(tree: XmlTree) -> Self {
        Self { tree }
    }

    /// The root element, if the document has one
    pub fn document_element(&self) -> Option<NodeId> {
        self.tree
            .children(self.tree.root())
            .find(|(_, n)| n.is_element())
            .map(|(id, _)| id)
    }

    /// Access the tree
    pub fn tree(&self) -> &XmlTree {
        &self.tree
    }

    /// Access the tree mutably
    pub fn tree_mut(&mut self) -> &mut XmlTree {
        &mut self.tree
    }

    /// Convenience: node lookup
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(XmlTree::new())
    }
}
