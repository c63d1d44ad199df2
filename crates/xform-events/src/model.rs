//! Model - schema/binding metadata document
//!
//! Carried through the cycle for collaborators; this engine does not
//! interpret it.

use xform_dom::Document;

/// Pass-through wrapper around the model document
#[derive(Debug)]
pub struct Model {
    document: Document,
}

impl Model {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}
