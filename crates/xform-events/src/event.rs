//! Incoming event descriptor

use std::collections::HashMap;

use xform_dom::Document;

use crate::error::EventError;

/// One incoming event: which control it came from and what it is
/// called, plus an optional bag of custom attributes.
#[derive(Debug, Clone)]
pub struct EventDescriptor {
    source_control_id: String,
    name: String,
    custom: HashMap<String, Vec<String>>,
}

impl EventDescriptor {
    /// Build a descriptor directly
    pub fn new(source_control_id: &str, name: &str) -> Self {
        Self {
            source_control_id: source_control_id.to_string(),
            name: name.to_string(),
            custom: HashMap::new(),
        }
    }

    /// Read the descriptor from an event document's root element
    ///
    /// `source-control-id` and `name` are required; any other
    /// attribute lands in the custom bag.
    pub fn from_document(document: &Document) -> Result<Self, EventError> {
        let root = document
            .document_element()
            .ok_or(EventError::NoRootElement)?;
        let elem = document
            .get(root)
            .and_then(|n| n.as_element())
            .ok_or(EventError::NoRootElement)?;

        let source_control_id = elem
            .attr("source-control-id")
            .ok_or(EventError::MissingEventAttribute("source-control-id"))?
            .to_string();
        let name = elem
            .attr("name")
            .ok_or(EventError::MissingEventAttribute("name"))?
            .to_string();

        let mut descriptor = Self {
            source_control_id,
            name,
            custom: HashMap::new(),
        };
        for attr in &elem.attrs {
            if attr.name.uri.is_none()
                && !matches!(attr.name.local.as_str(), "source-control-id" | "name")
            {
                descriptor.set_attribute(&attr.name.local, vec![attr.value.clone()]);
            }
        }
        Ok(descriptor)
    }

    /// Identifier of the control the event was dispatched from
    pub fn source_control_id(&self) -> &str {
        &self.source_control_id
    }

    /// Event name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a custom attribute, shadowing any built-in of the same name
    pub fn set_attribute(&mut self, name: &str, values: Vec<String>) {
        self.custom.insert(name.to_string(), values);
    }

    /// Look up an attribute by name
    ///
    /// The custom bag is checked first, then the built-in attributes;
    /// a custom attribute shadows a built-in one, never the reverse.
    pub fn attribute(&self, name: &str) -> Option<Vec<String>> {
        if let Some(values) = self.custom.get(name) {
            return Some(values.clone());
        }
        match name {
            "name" => Some(vec![self.name.clone()]),
            "source-control-id" => Some(vec![self.source_control_id.clone()]),
            _ => None,
        }
    }
}
