//! XML node representation
//!
//! Nodes use NodeId links instead of pointers; element names and
//! attributes are namespace-qualified.

use crate::NodeId;

/// Namespace-qualified name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Prefix as written in the source document, if any
    pub prefix: Option<String>,
    /// Local part
    pub local: String,
    /// Resolved namespace URI, if the name is in a namespace
    pub uri: Option<String>,
}

impl QName {
    /// A name with no namespace
    pub fn local(local: &str) -> Self {
        Self {
            prefix: None,
            local: local.to_string(),
            uri: None,
        }
    }

    /// A name in a namespace
    pub fn qualified(prefix: Option<&str>, local: &str, uri: &str) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            local: local.to_string(),
            uri: Some(uri.to_string()),
        }
    }

    /// True if local part and namespace URI both match
    #[inline]
    pub fn matches(&self, uri: Option<&str>, local: &str) -> bool {
        self.local == local && self.uri.as_deref() == uri
    }
}

/// XML node
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create a new element node
    pub fn element(name: QName) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(name)))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::with_data(NodeData::Text(content))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Create a comment node
    pub fn comment(content: String) -> Self {
        Self::with_data(NodeData::Comment(content))
    }

    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
    /// Processing instruction
    ProcessingInstruction { target: String, data: String },
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name (qualified)
    pub name: QName,
    /// Attributes in document order
    pub attrs: Vec<Attribute>,
    /// Namespace declarations carried on this element
    /// (prefix, URI); None prefix is the default namespace
    pub namespace_decls: Vec<(Option<String>, String)>,
}

impl ElementData {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            namespace_decls: Vec::new(),
        }
    }

    /// Get an attribute value by local name, ignoring namespace
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.local == local && a.name.uri.is_none())
            .map(|a| a.value.as_str())
    }

    /// Get an attribute value by namespace URI and local name
    pub fn attr_ns(&self, uri: &str, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.matches(Some(uri), local))
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, overwriting an existing one with the same name
    pub fn set_attr(&mut self, name: QName, value: String) {
        for attr in self.attrs.iter_mut() {
            if attr.name == name {
                attr.value = value;
                return;
            }
        }
        self.attrs.push(Attribute { name, value });
    }
}

/// Attribute
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}
