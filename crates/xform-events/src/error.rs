//! Event processing errors
//!
//! Every error is fatal to the cycle it occurs in; there is no
//! partial success and no degraded response.

use xform_xml::ParseError;
use xform_xpath::XPathError;

/// Fatal event-cycle error
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("cannot find control with id '{control_id}' and event '{event_name}'")]
    ActionNotFound {
        control_id: String,
        event_name: String,
    },

    #[error("invalid action namespace: {namespace_uri}")]
    InvalidActionNamespace { namespace_uri: String },

    #[error("invalid action requested: {name}")]
    InvalidAction { name: String },

    #[error("{action} action is missing its '{attribute}' attribute")]
    MissingActionAttribute {
        action: &'static str,
        attribute: &'static str,
    },

    #[error("target path '{path}' resolved to {matches} nodes, expected exactly one")]
    TargetNotFound { path: String, matches: usize },

    #[error("event document is missing its '{0}' attribute")]
    MissingEventAttribute(&'static str),

    #[error("document has no root element")]
    NoRootElement,

    #[error(transparent)]
    XPath(#[from] XPathError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
