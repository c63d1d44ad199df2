//! XML parser
//!
//! Streams quick-xml events into an arena tree. Namespace
//! declarations are recorded on the element that carries them and
//! element/attribute names are resolved against the in-scope
//! bindings as the tree is built.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use xform_dom::{Document, NamespaceScope, NodeData, NodeId, QName, XmlTree};

use crate::ParseError;

/// XML parser
pub struct XmlParser;

impl XmlParser {
    /// Create a new XML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse an XML string into a document
    pub fn parse(&self, xml: &str) -> Result<Document, ParseError> {
        let mut reader = Reader::from_str(xml);
        let mut tree = XmlTree::new();

        // Open-element stack, paired with the scope in force inside each
        let mut stack: Vec<NodeId> = vec![tree.root()];
        let mut scopes: Vec<NamespaceScope> = vec![NamespaceScope::new()];

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let id = self.open_element(&mut tree, &mut scopes, &start)?;
                    tree.append_child(*stack.last().unwrap_or(&tree.root()), id);
                    stack.push(id);
                }
                Event::Empty(start) => {
                    let id = self.open_element(&mut tree, &mut scopes, &start)?;
                    tree.append_child(*stack.last().unwrap_or(&tree.root()), id);
                    scopes.pop();
                }
                Event::End(end) => {
                    if stack.len() <= 1 {
                        let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                        return Err(ParseError::UnexpectedEnd(name));
                    }
                    stack.pop();
                    scopes.pop();
                }
                Event::Text(text) => {
                    let content = text.unescape()?;
                    if let Some(&parent) = stack.last() {
                        let id = tree.create_text(&content);
                        tree.append_child(parent, id);
                    }
                }
                Event::CData(cdata) => {
                    let content = String::from_utf8_lossy(&cdata).into_owned();
                    if let Some(&parent) = stack.last() {
                        let id = tree.create_text(&content);
                        tree.append_child(parent, id);
                    }
                }
                Event::Comment(comment) => {
                    let content = comment.unescape()?;
                    if let Some(&parent) = stack.last() {
                        let id = tree.create_comment(&content);
                        tree.append_child(parent, id);
                    }
                }
                Event::PI(pi) => {
                    let raw = String::from_utf8_lossy(&pi).into_owned();
                    let (target, data) = match raw.split_once(char::is_whitespace) {
                        Some((t, d)) => (t.to_string(), d.trim_start().to_string()),
                        None => (raw, String::new()),
                    };
                    if let Some(&parent) = stack.last() {
                        let id = tree.create_element(QName::local(""));
                        if let Some(node) = tree.get_mut(id) {
                            node.data = NodeData::ProcessingInstruction { target, data };
                        }
                        tree.append_child(parent, id);
                    }
                }
                Event::Eof => break,
                // XML declaration, doctype, entity refs: nothing to keep
                _ => {}
            }
        }

        if stack.len() > 1 {
            return Err(ParseError::UnexpectedEof);
        }

        let document = Document::new(tree);
        if document.document_element().is_none() {
            return Err(ParseError::NoRootElement);
        }

        tracing::debug!("parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Create the element for a start tag and push its scope
    fn open_element(
        &self,
        tree: &mut XmlTree,
        scopes: &mut Vec<NamespaceScope>,
        start: &BytesStart<'_>,
    ) -> Result<NodeId, ParseError> {
        let mut decls: Vec<(Option<String>, String)> = Vec::new();
        let mut plain_attrs: Vec<(Option<String>, String, String)> = Vec::new();

        for attr in start.attributes() {
            let attr = attr?;
            let key = attr.key;
            let value = attr.unescape_value()?.into_owned();

            let local = String::from_utf8_lossy(key.local_name().as_ref()).into_owned();
            let prefix = key
                .prefix()
                .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());

            match prefix.as_deref() {
                Some("xmlns") => decls.push((Some(local), value)),
                None if local == "xmlns" => decls.push((None, value)),
                _ => plain_attrs.push((prefix, local, value)),
            }
        }

        let parent_scope = scopes.last().cloned().unwrap_or_default();
        let scope = parent_scope.with_decls(
            decls
                .iter()
                .map(|(p, u)| (p.as_deref(), u.as_str())),
        );

        let name = start.name();
        let local = String::from_utf8_lossy(name.local_name().as_ref()).into_owned();
        let prefix = name
            .prefix()
            .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());

        // Element name: unprefixed names fall in the default namespace
        let uri = match prefix.as_deref() {
            Some(p) => scope.resolve(p).map(str::to_string),
            None => scope.default_uri().map(str::to_string),
        };

        let id = tree.create_element(QName {
            prefix: prefix.clone(),
            local,
            uri,
        });

        if let Some(elem) = tree.get_mut(id).and_then(|n| n.as_element_mut()) {
            elem.namespace_decls = decls;
            for (attr_prefix, attr_local, value) in plain_attrs {
                // Attribute names: unprefixed attributes carry no namespace
                let attr_uri = attr_prefix
                    .as_deref()
                    .and_then(|p| scope.resolve(p))
                    .map(str::to_string);
                elem.set_attr(
                    QName {
                        prefix: attr_prefix,
                        local: attr_local,
                        uri: attr_uri,
                    },
                    value,
                );
            }
        }

        scopes.push(scope);
        Ok(id)
    }
}

impl Default for XmlParser {
    fn default() -> Self {
        Self::new()
    }
}
