//! xform XML
//!
//! Parses markup into `xform-dom` trees and serializes them back,
//! built on quick-xml.

mod parser;
mod serializer;

pub use parser::XmlParser;
pub use serializer::{serialize, serialize_node};

use xform_dom::Document;

/// Parse an XML string into a document
pub fn parse(xml: &str) -> Result<Document, ParseError> {
    XmlParser::new().parse(xml)
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("invalid character escape: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("unexpected end tag: {0}")]
    UnexpectedEnd(String),

    #[error("unexpected end of document")]
    UnexpectedEof,

    #[error("document has no root element")]
    NoRootElement,

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialized output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
