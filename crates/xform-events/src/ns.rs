//! Engine namespace vocabulary
//!
//! The three prefixes the engine's own queries rely on. All of them
//! are registered before any engine query is compiled.

use xform_dom::NamespaceScope;

/// XForms action/control vocabulary
pub const XFORMS_PREFIX: &str = "xf";
pub const XFORMS_NAMESPACE_URI: &str = "http://www.w3.org/2002/xforms";

/// XML Events handler vocabulary
pub const XML_EVENTS_PREFIX: &str = "ev";
pub const XML_EVENTS_NAMESPACE_URI: &str = "http://www.w3.org/2001/xml-events";

/// Engine-private vocabulary (controls wrapper, response document)
pub const XXFORMS_PREFIX: &str = "xxf";
pub const XXFORMS_NAMESPACE_URI: &str = "http://orbeon.org/oxf/xml/xforms";

/// The fixed prefix table for engine-owned queries
pub fn engine_bindings() -> NamespaceScope {
    NamespaceScope::from_bindings([
        (XFORMS_PREFIX, XFORMS_NAMESPACE_URI),
        (XML_EVENTS_PREFIX, XML_EVENTS_NAMESPACE_URI),
        (XXFORMS_PREFIX, XXFORMS_NAMESPACE_URI),
    ])
}
