//! XML serializer
//!
//! Walks an arena tree and emits markup through quick-xml's writer.
//! Namespace declarations come out on the element that carried them
//! in the source tree.

use quick_xml::events::{BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;
use xform_dom::{Document, NodeData, NodeId, QName};

use crate::ParseError;

/// Serialize a whole document
pub fn serialize(document: &Document) -> Result<String, ParseError> {
    serialize_node(document, document.tree().root())
}

/// Serialize the subtree rooted at one node
///
/// For the document node this is the whole document; for an element
/// it is that element and its content, a form usable for embedding.
pub fn serialize_node(document: &Document, id: NodeId) -> Result<String, ParseError> {
    let mut writer = Writer::new(Vec::new());
    match document.get(id).map(|n| &n.data) {
        Some(NodeData::Document) => {
            for (child, _) in document.tree().children(id) {
                write_node(document, child, &mut writer)?;
            }
        }
        Some(_) => write_node(document, id, &mut writer)?,
        None => {}
    }
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_node(
    document: &Document,
    id: NodeId,
    writer: &mut Writer<Vec<u8>>,
) -> Result<(), ParseError> {
    let Some(node) = document.get(id) else {
        return Ok(());
    };

    match &node.data {
        NodeData::Element(elem) => {
            let name = prefixed(&elem.name);
            let mut start = BytesStart::new(name.as_str());

            for (prefix, uri) in &elem.namespace_decls {
                match prefix {
                    Some(p) => start.push_attribute((format!("xmlns:{p}").as_str(), uri.as_str())),
                    None => start.push_attribute(("xmlns", uri.as_str())),
                }
            }
            for attr in &elem.attrs {
                start.push_attribute((prefixed(&attr.name).as_str(), attr.value.as_str()));
            }

            if node.first_child.is_valid() {
                writer.write_event(Event::Start(start))?;
                for (child, _) in document.tree().children(id) {
                    write_node(document, child, writer)?;
                }
                writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
            } else {
                writer.write_event(Event::Empty(start))?;
            }
        }
        NodeData::Text(content) => {
            writer.write_event(Event::Text(BytesText::new(content)))?;
        }
        NodeData::Comment(content) => {
            writer.write_event(Event::Comment(BytesText::new(content)))?;
        }
        NodeData::ProcessingInstruction { target, data } => {
            let content = if data.is_empty() {
                target.clone()
            } else {
                format!("{target} {data}")
            };
            writer.write_event(Event::PI(BytesPI::new(content.as_str())))?;
        }
        NodeData::Document => {}
    }
    Ok(())
}

fn prefixed(name: &QName) -> String {
    match &name.prefix {
        Some(p) => format!("{p}:{}", name.local),
        None => name.local.clone(),
    }
}
