//! xform DOM - XML document tree
//!
//! Arena-based XML tree with namespace-aware names and in-place
//! value mutation.

mod document;
mod namespace;
mod node;
mod tree;

pub use document::Document;
pub use namespace::NamespaceScope;
pub use node::{Attribute, ElementData, Node, NodeData, QName};
pub use tree::{Children, Descendants, XmlTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this id refers to a node
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::NONE
    }
}
