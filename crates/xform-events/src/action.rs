//! Action classification and interpretation
//!
//! Handler subtrees are classified into a closed variant when the
//! handler is located, then interpreted depth-first, left-to-right.
//! Unrecognized elements classify as `Unsupported` and fail at
//! interpretation, carrying the raw name and namespace.

use xform_dom::{Document, NodeId};

use crate::error::EventError;
use crate::instance::Instance;
use crate::ns;

/// One step of the action language
#[derive(Debug)]
pub enum Action {
    /// `xf:setvalue` - overwrite one instance node
    SetValue { element: NodeId },
    /// `xf:action` - ordered composite of nested actions
    Composite {
        element: NodeId,
        children: Vec<Action>,
    },
    /// Anything else; interpreting it is a fatal error
    Unsupported {
        name: String,
        namespace_uri: Option<String>,
    },
}

impl Action {
    /// Classify an action element and, recursively, its children
    pub fn classify(controls: &Document, id: NodeId) -> Action {
        let Some(elem) = controls.get(id).and_then(|n| n.as_element()) else {
            return Action::Unsupported {
                name: String::new(),
                namespace_uri: None,
            };
        };

        if elem.name.uri.as_deref() != Some(ns::XFORMS_NAMESPACE_URI) {
            return Action::Unsupported {
                name: elem.name.local.clone(),
                namespace_uri: elem.name.uri.clone(),
            };
        }

        match elem.name.local.as_str() {
            "setvalue" => Action::SetValue { element: id },
            "action" => Action::Composite {
                element: id,
                children: controls
                    .tree()
                    .children(id)
                    .filter(|(_, n)| n.is_element())
                    .map(|(child, _)| Action::classify(controls, child))
                    .collect(),
            },
            other => Action::Unsupported {
                name: other.to_string(),
                namespace_uri: elem.name.uri.clone(),
            },
        }
    }
}

/// Executes classified actions against an instance
pub struct ActionInterpreter;

impl ActionInterpreter {
    /// Interpret one action, mutating the instance
    ///
    /// Strictly sequential: a composite's later children observe the
    /// mutations of earlier ones.
    pub fn interpret(
        &self,
        action: &Action,
        controls: &Document,
        instance: &mut Instance,
    ) -> Result<(), EventError> {
        match action {
            Action::SetValue { element } => self.set_value(*element, controls, instance),
            Action::Composite { children, .. } => {
                for child in children {
                    self.interpret(child, controls, instance)?;
                }
                Ok(())
            }
            Action::Unsupported {
                name,
                namespace_uri,
            } => match namespace_uri.as_deref() {
                Some(ns::XFORMS_NAMESPACE_URI) => Err(EventError::InvalidAction {
                    name: name.clone(),
                }),
                other => Err(EventError::InvalidActionNamespace {
                    namespace_uri: other.unwrap_or("").to_string(),
                }),
            },
        }
    }

    fn set_value(
        &self,
        element: NodeId,
        controls: &Document,
        instance: &mut Instance,
    ) -> Result<(), EventError> {
        let elem = controls
            .get(element)
            .and_then(|n| n.as_element())
            .ok_or(EventError::MissingActionAttribute {
                action: "setvalue",
                attribute: "ref",
            })?;

        let ref_expr = elem
            .attr("ref")
            .ok_or(EventError::MissingActionAttribute {
                action: "setvalue",
                attribute: "ref",
            })?
            .to_string();
        let value_expr = elem.attr("value").map(str::to_string);

        // Prefixes in ref/value resolve in the scope of this element
        let scope = controls.tree().namespace_scope(element);

        let value_to_set = match value_expr {
            // Value computed with a path expression
            Some(expr) => instance.evaluate(&expr, &scope)?,
            // Value is static content
            None => controls.tree().string_value(element),
        };

        instance.set_value(&ref_expr, &scope, &value_to_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xform_xpath::XPathPool;

    const XF: &str = "http://www.w3.org/2002/xforms";

    fn controls(handler: &str) -> Document {
        xform_xml::parse(&format!(
            r#"<root xmlns:xf="{XF}">{handler}</root>"#
        ))
        .unwrap()
    }

    fn handler_root(doc: &Document) -> NodeId {
        let root = doc.document_element().unwrap();
        doc.tree()
            .children(root)
            .find(|(_, n)| n.is_element())
            .unwrap()
            .0
    }

    fn instance(xml: &str) -> Instance {
        Instance::new(xform_xml::parse(xml).unwrap(), XPathPool::new())
    }

    fn run(doc: &Document, inst: &mut Instance) -> Result<(), EventError> {
        let action = Action::classify(doc, handler_root(doc));
        ActionInterpreter.interpret(&action, doc, inst)
    }

    #[test]
    fn test_setvalue_literal_mode() {
        let doc = controls(r#"<xf:setvalue ref="/data/x">literal</xf:setvalue>"#);
        let mut inst = instance("<data><x>old</x></data>");
        run(&doc, &mut inst).unwrap();
        assert_eq!(
            inst.evaluate("/data/x", &xform_dom::NamespaceScope::new())
                .unwrap(),
            "literal"
        );
    }

    #[test]
    fn test_setvalue_literal_mode_empty() {
        let doc = controls(r#"<xf:setvalue ref="/data/x"/>"#);
        let mut inst = instance("<data><x>old</x></data>");
        run(&doc, &mut inst).unwrap();
        assert_eq!(
            inst.evaluate("/data/x", &xform_dom::NamespaceScope::new())
                .unwrap(),
            ""
        );
    }

    #[test]
    fn test_setvalue_path_mode() {
        let doc = controls(r#"<xf:setvalue ref="/data/x" value="'hello'"/>"#);
        let mut inst = instance("<data><x>old</x></data>");
        run(&doc, &mut inst).unwrap();
        assert_eq!(
            inst.evaluate("/data/x", &xform_dom::NamespaceScope::new())
                .unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_composite_children_sequential() {
        let doc = controls(
            r#"<xf:action>
                 <xf:setvalue ref="/data/a" value="1"/>
                 <xf:setvalue ref="/data/b" value="/data/a"/>
               </xf:action>"#,
        );
        let mut inst = instance("<data><a>x</a><b>y</b></data>");
        run(&doc, &mut inst).unwrap();

        let scope = xform_dom::NamespaceScope::new();
        assert_eq!(inst.evaluate("/data/a", &scope).unwrap(), "1");
        // Second setvalue observes the first one's mutation
        assert_eq!(inst.evaluate("/data/b", &scope).unwrap(), "1");
    }

    #[test]
    fn test_empty_composite_is_noop() {
        let doc = controls("<xf:action/>");
        let mut inst = instance("<data><x>old</x></data>");
        run(&doc, &mut inst).unwrap();
        assert_eq!(
            inst.evaluate("/data/x", &xform_dom::NamespaceScope::new())
                .unwrap(),
            "old"
        );
    }

    #[test]
    fn test_foreign_namespace_is_fatal() {
        let doc = xform_xml::parse(
            r#"<root xmlns:o="urn:other"><o:setvalue ref="/data/x"/></root>"#,
        )
        .unwrap();
        let mut inst = instance("<data><x/></data>");
        assert!(matches!(
            run(&doc, &mut inst),
            Err(EventError::InvalidActionNamespace { namespace_uri }) if namespace_uri == "urn:other"
        ));
    }

    #[test]
    fn test_unknown_action_name_is_fatal() {
        let doc = controls(r#"<xf:insert ref="/data/x"/>"#);
        let mut inst = instance("<data><x/></data>");
        assert!(matches!(
            run(&doc, &mut inst),
            Err(EventError::InvalidAction { name }) if name == "insert"
        ));
    }

    #[test]
    fn test_unknown_nested_action_fails_whole_composite() {
        let doc = controls(
            r#"<xf:action>
                 <xf:setvalue ref="/data/x" value="'set'"/>
                 <xf:unknown/>
               </xf:action>"#,
        );
        let mut inst = instance("<data><x>old</x></data>");
        assert!(run(&doc, &mut inst).is_err());
    }

    #[test]
    fn test_setvalue_with_redeclared_prefix() {
        let doc = xform_xml::parse(&format!(
            r#"<root xmlns:xf="{XF}" xmlns:d="urn:wrong">
                 <xf:setvalue xmlns:d="urn:data" ref="/d:data/d:x" value="'v'"/>
               </root>"#
        ))
        .unwrap();
        let mut inst = instance(r#"<data xmlns="urn:data"><x>old</x></data>"#);

        let setvalue = doc
            .tree()
            .descendants(doc.tree().root())
            .find(|(_, n)| n.as_element().is_some_and(|e| e.name.local == "setvalue"))
            .map(|(id, _)| id)
            .unwrap();
        let action = Action::classify(&doc, setvalue);
        ActionInterpreter
            .interpret(&action, &doc, &mut inst)
            .unwrap();

        let scope = xform_dom::NamespaceScope::from_bindings([("d", "urn:data")]);
        assert_eq!(inst.evaluate("/d:data/d:x", &scope).unwrap(), "v");
    }
}
