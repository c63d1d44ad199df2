//! Instance - the mutable form data document

use xform_dom::{Document, NamespaceScope, Node};
use xform_xpath::{NodeRef, Variables, XPathPool};

use crate::error::EventError;

/// Owns the data document a form operates on
///
/// The instance is the only component that mutates the data document.
/// Mutation overwrites the value of an existing addressed node; no
/// element nodes are added or removed.
#[derive(Debug)]
pub struct Instance {
    document: Document,
    pool: XPathPool,
}

impl Instance {
    /// Wrap a parsed data document
    pub fn new(document: Document, pool: XPathPool) -> Self {
        Self { document, pool }
    }

    /// The current data document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Read-only scalar evaluation of a path expression
    pub fn evaluate(
        &self,
        expr: &str,
        bindings: &NamespaceScope,
    ) -> Result<String, EventError> {
        let compiled = self.pool.checkout(expr)?;
        Ok(compiled.string_value(&self.document, bindings, &Variables::new())?)
    }

    /// Resolve a path to exactly one node and overwrite its value
    ///
    /// Zero or multiple matches fail; picking one silently would make
    /// the mutation target depend on document layout.
    pub fn set_value(
        &mut self,
        expr: &str,
        bindings: &NamespaceScope,
        new_value: &str,
    ) -> Result<(), EventError> {
        let target = {
            let compiled = self.pool.checkout(expr)?;
            let value = compiled.evaluate(&self.document, bindings, &Variables::new())?;
            let nodes = value.nodes();
            if nodes.len() != 1 {
                return Err(EventError::TargetNotFound {
                    path: expr.to_string(),
                    matches: nodes.len(),
                });
            }
            nodes[0].clone()
        };

        tracing::debug!("setting value at '{expr}'");
        match target {
            NodeRef::Node(id) => self.document.tree_mut().set_text(id, new_value),
            NodeRef::Attribute { element, name } => {
                if let Some(elem) = self
                    .document
                    .tree_mut()
                    .get_mut(element)
                    .and_then(Node::as_element_mut)
                {
                    elem.set_attr(name, new_value.to_string());
                }
            }
        }
        Ok(())
    }

    /// Serialize the current document
    pub fn read(&self) -> Result<String, EventError> {
        Ok(xform_xml::serialize(&self.document)?)
    }
}
