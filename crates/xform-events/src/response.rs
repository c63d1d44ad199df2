//! Response construction
//!
//! Walks the controls document, evaluates each bound control's value
//! against the mutated instance, and assembles the namespaced
//! response document with the full instance embedded.

use xform_dom::{Document, Node, NodeData, NodeId, QName, XmlTree};
use xform_xpath::{NodeRef, Variables, XPathPool};

use crate::error::EventError;
use crate::instance::Instance;
use crate::ns;

/// Query selecting every bound control whose value goes back to the
/// client, in document order.
const VALUE_CONTROLS_QUERY: &str = "/xxf:controls//(xf:input|xf:secret|xf:textarea|xf:output\
|xf:upload|xf:range|xf:trigger|xf:submit|xf:select|xf:select1)[@ref]";

/// Builds the event-response document
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Build the response from the controls tree and the
    /// (already-mutated) instance
    pub fn build(
        controls: &Document,
        instance: &Instance,
        pool: &XPathPool,
    ) -> Result<Document, EventError> {
        // Evaluate all control values first so nothing is emitted if
        // any evaluation fails
        let control_values = Self::control_values(controls, instance, pool)?;

        let mut tree = XmlTree::new();
        let response = tree.create_element(engine_name("event-response"));
        if let Some(elem) = tree.get_mut(response).and_then(Node::as_element_mut) {
            elem.namespace_decls
                .push((Some(ns::XXFORMS_PREFIX.to_string()), ns::XXFORMS_NAMESPACE_URI.to_string()));
        }
        tree.append_child(tree.root(), response);

        let values_elem = tree.create_element(engine_name("control-values"));
        tree.append_child(response, values_elem);
        for (id, value) in control_values {
            let control = tree.create_element(engine_name("control"));
            if let Some(elem) = tree.get_mut(control).and_then(Node::as_element_mut) {
                elem.set_attr(QName::local("id"), id);
                elem.set_attr(QName::local("value"), value);
            }
            tree.append_child(values_elem, control);
        }

        let instances_elem = tree.create_element(engine_name("instances"));
        tree.append_child(response, instances_elem);
        let instance_elem = tree.create_element(engine_name("instance"));
        tree.append_child(instances_elem, instance_elem);
        if let Some(root) = instance.document().document_element() {
            import_subtree(&mut tree, instance_elem, instance.document().tree(), root);
        }

        Ok(Document::new(tree))
    }

    /// One (id, value) pair per qualifying control, document order
    fn control_values(
        controls: &Document,
        instance: &Instance,
        pool: &XPathPool,
    ) -> Result<Vec<(String, String)>, EventError> {
        let matches = {
            let expr = pool.checkout(VALUE_CONTROLS_QUERY)?;
            let value = expr.evaluate(controls, &ns::engine_bindings(), &Variables::new())?;
            value.nodes().to_vec()
        };

        let mut out = Vec::with_capacity(matches.len());
        for node_ref in matches {
            let NodeRef::Node(id) = node_ref else {
                continue;
            };
            let Some(elem) = controls.get(id).and_then(Node::as_element) else {
                continue;
            };

            let control_id = elem
                .attr_ns(ns::XXFORMS_NAMESPACE_URI, "id")
                .unwrap_or_default()
                .to_string();
            let ref_expr = elem.attr("ref").unwrap_or_default().to_string();

            // The control's own scope governs prefixes in its binding
            let scope = controls.tree().namespace_scope(id);
            let value = instance.evaluate(&ref_expr, &scope)?;
            out.push((control_id, value));
        }
        Ok(out)
    }
}

fn engine_name(local: &str) -> QName {
    QName::qualified(Some(ns::XXFORMS_PREFIX), local, ns::XXFORMS_NAMESPACE_URI)
}

/// Deep-copy a subtree from one tree into another
fn import_subtree(dst: &mut XmlTree, dst_parent: NodeId, src: &XmlTree, src_id: NodeId) {
    let Some(node) = src.get(src_id) else {
        return;
    };

    let new_id = match &node.data {
        NodeData::Element(elem) => {
            let id = dst.create_element(elem.name.clone());
            if let Some(new_elem) = dst.get_mut(id).and_then(Node::as_element_mut) {
                new_elem.attrs = elem.attrs.clone();
                new_elem.namespace_decls = elem.namespace_decls.clone();
            }
            id
        }
        NodeData::Text(content) => dst.create_text(content),
        NodeData::Comment(content) => dst.create_comment(content),
        NodeData::ProcessingInstruction { target, data } => {
            let id = dst.create_element(QName::local(""));
            if let Some(new_node) = dst.get_mut(id) {
                new_node.data = NodeData::ProcessingInstruction {
                    target: target.clone(),
                    data: data.clone(),
                };
            }
            id
        }
        NodeData::Document => {
            for (child, _) in src.children(src_id) {
                import_subtree(dst, dst_parent, src, child);
            }
            return;
        }
    };

    dst.append_child(dst_parent, new_id);
    for (child, _) in src.children(src_id) {
        import_subtree(dst, new_id, src, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XXF: &str = "http://orbeon.org/oxf/xml/xforms";
    const XF: &str = "http://www.w3.org/2002/xforms";

    fn controls(body: &str) -> Document {
        xform_xml::parse(&format!(
            r#"<xxf:controls xmlns:xxf="{XXF}" xmlns:xf="{XF}">{body}</xxf:controls>"#
        ))
        .unwrap()
    }

    fn instance(xml: &str, pool: &XPathPool) -> Instance {
        Instance::new(xform_xml::parse(xml).unwrap(), pool.clone())
    }

    #[test]
    fn test_build_emits_one_record_per_bound_control() {
        let doc = controls(
            r#"<xf:input xxf:id="c1" ref="/data/x"/>
               <xf:output xxf:id="c2" ref="/data/y"/>
               <xf:trigger xxf:id="no-ref"/>"#,
        );
        let pool = XPathPool::new();
        let inst = instance("<data><x>1</x><y>2</y></data>", &pool);

        let response = ResponseBuilder::build(&doc, &inst, &pool).unwrap();
        let xml = xform_xml::serialize(&response).unwrap();

        assert!(xml.contains(r#"<xxf:control id="c1" value="1"/>"#));
        assert!(xml.contains(r#"<xxf:control id="c2" value="2"/>"#));
        // Controls without a binding emit nothing
        assert!(!xml.contains("no-ref"));
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn test_build_preserves_document_order() {
        let doc = controls(
            r#"<xf:output xxf:id="second" ref="/data/x"/>
               <xf:group><xf:input xxf:id="third" ref="/data/x"/></xf:group>"#,
        );
        // A control earlier in the tree than both
        let doc2 = controls(
            r#"<xf:input xxf:id="a" ref="/data/x"/>
               <xf:output xxf:id="b" ref="/data/x"/>"#,
        );
        let pool = XPathPool::new();
        let inst = instance("<data><x>v</x></data>", &pool);

        let xml = xform_xml::serialize(&ResponseBuilder::build(&doc, &inst, &pool).unwrap()).unwrap();
        assert!(xml.find("second").unwrap() < xml.find("third").unwrap());

        let xml2 =
            xform_xml::serialize(&ResponseBuilder::build(&doc2, &inst, &pool).unwrap()).unwrap();
        assert!(xml2.find(r#"id="a""#).unwrap() < xml2.find(r#"id="b""#).unwrap());
    }

    #[test]
    fn test_build_embeds_full_instance() {
        let doc = controls(r#"<xf:input xxf:id="c1" ref="/data/x"/>"#);
        let pool = XPathPool::new();
        let inst = instance("<data><x>hello</x></data>", &pool);

        let xml = xform_xml::serialize(&ResponseBuilder::build(&doc, &inst, &pool).unwrap()).unwrap();
        assert!(xml.contains("<xxf:instances><xxf:instance><data><x>hello</x></data></xxf:instance></xxf:instances>"));
    }

    #[test]
    fn test_build_fails_whole_on_bad_binding() {
        let doc = controls(
            r#"<xf:input xxf:id="ok" ref="/data/x"/>
               <xf:input xxf:id="bad" ref="/p:data"/>"#,
        );
        let pool = XPathPool::new();
        let inst = instance("<data><x>v</x></data>", &pool);

        assert!(ResponseBuilder::build(&doc, &inst, &pool).is_err());
        // No leak on the abort path
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn test_all_control_kinds_qualify() {
        let doc = controls(
            r#"<xf:input xxf:id="k1" ref="/data/x"/>
               <xf:secret xxf:id="k2" ref="/data/x"/>
               <xf:textarea xxf:id="k3" ref="/data/x"/>
               <xf:output xxf:id="k4" ref="/data/x"/>
               <xf:upload xxf:id="k5" ref="/data/x"/>
               <xf:range xxf:id="k6" ref="/data/x"/>
               <xf:trigger xxf:id="k7" ref="/data/x"/>
               <xf:submit xxf:id="k8" ref="/data/x"/>
               <xf:select xxf:id="k9" ref="/data/x"/>
               <xf:select1 xxf:id="k10" ref="/data/x"/>"#,
        );
        let pool = XPathPool::new();
        let inst = instance("<data><x>v</x></data>", &pool);

        let xml = xform_xml::serialize(&ResponseBuilder::build(&doc, &inst, &pool).unwrap()).unwrap();
        for k in 1..=10 {
            assert!(xml.contains(&format!(r#"id="k{k}""#)), "missing control k{k}");
        }
    }
}
