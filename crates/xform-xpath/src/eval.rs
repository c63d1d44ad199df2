//! Path expression evaluation over xform-dom documents

use std::collections::HashSet;

use xform_dom::{Document, ElementData, NamespaceScope, Node, NodeId, QName};

use crate::ast::{Axis, Expr, NamePattern, Operand, Predicate, Step};
use crate::{Variables, XPathError};

/// Result of evaluating an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Nodes in document order
    NodeSet(Vec<NodeRef>),
    /// String literal result
    Text(String),
    /// Number literal result
    Number(f64),
}

/// Reference to a node produced by a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// An element (or other tree node)
    Node(NodeId),
    /// An attribute of an element
    Attribute { element: NodeId, name: QName },
}

impl Value {
    /// Nodes in the result, empty for literal results
    pub fn nodes(&self) -> &[NodeRef] {
        match self {
            Value::NodeSet(nodes) => nodes,
            _ => &[],
        }
    }

    /// XPath-style string-value of the result
    ///
    /// First node's string-value for node-sets, the literal itself
    /// otherwise. An empty node-set yields the empty string.
    pub fn string_value(&self, document: &Document) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::NodeSet(nodes) => match nodes.first() {
                Some(NodeRef::Node(id)) => document.tree().string_value(*id),
                Some(NodeRef::Attribute { element, name }) => document
                    .get(*element)
                    .and_then(Node::as_element)
                    .and_then(|e| e.attrs.iter().find(|a| a.name == *name))
                    .map(|a| a.value.clone())
                    .unwrap_or_default(),
                None => String::new(),
            },
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

pub(crate) fn evaluate(
    expr: &Expr,
    source: &str,
    document: &Document,
    bindings: &NamespaceScope,
    variables: &Variables,
) -> Result<Value, XPathError> {
    match expr {
        Expr::Literal(s) => Ok(Value::Text(s.clone())),
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Path(path) => {
            if !path.absolute {
                return Err(XPathError::RelativePath(source.to_string()));
            }

            let mut context = vec![NodeRef::Node(document.tree().root())];
            for step in &path.steps {
                context = apply_step(step, &context, document, bindings, variables)?;
            }
            Ok(Value::NodeSet(context))
        }
    }
}

fn apply_step(
    step: &Step,
    context: &[NodeRef],
    document: &Document,
    bindings: &NamespaceScope,
    variables: &Variables,
) -> Result<Vec<NodeRef>, XPathError> {
    let tree = document.tree();
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for node_ref in context {
        // Attribute references have no children; only tree nodes advance
        let NodeRef::Node(id) = node_ref else {
            continue;
        };

        match step.axis {
            Axis::Child | Axis::Descendant => {
                let candidates: Vec<(NodeId, &Node)> = match step.axis {
                    Axis::Child => tree.children(*id).collect(),
                    _ => tree.descendants(*id).collect(),
                };
                for (child_id, child) in candidates {
                    let Some(elem) = child.as_element() else {
                        continue;
                    };
                    if !name_matches(&step.names, &elem.name, bindings)? {
                        continue;
                    }
                    if !predicates_hold(&step.predicates, elem, bindings, variables)? {
                        continue;
                    }
                    if seen.insert(child_id) {
                        out.push(NodeRef::Node(child_id));
                    }
                }
            }
            Axis::Attribute => {
                let Some(elem) = tree.get(*id).and_then(Node::as_element) else {
                    continue;
                };
                for attr in &elem.attrs {
                    if name_matches(&step.names, &attr.name, bindings)? {
                        out.push(NodeRef::Attribute {
                            element: *id,
                            name: attr.name.clone(),
                        });
                    }
                }
            }
        }
    }

    // Arena ids follow document order for parsed documents
    out.sort_by_key(|r| match r {
        NodeRef::Node(id) => *id,
        NodeRef::Attribute { element, .. } => *element,
    });
    Ok(out)
}

fn name_matches(
    patterns: &[NamePattern],
    name: &QName,
    bindings: &NamespaceScope,
) -> Result<bool, XPathError> {
    for pattern in patterns {
        let local_ok = pattern
            .local
            .as_deref()
            .is_none_or(|local| local == name.local);
        if !local_ok {
            continue;
        }

        let uri_ok = match &pattern.prefix {
            Some(prefix) => {
                let uri = bindings
                    .resolve(prefix)
                    .ok_or_else(|| XPathError::UnboundPrefix(prefix.clone()))?;
                name.uri.as_deref() == Some(uri)
            }
            // `*` matches any namespace; a bare name matches no-namespace
            None => pattern.local.is_none() || name.uri.is_none(),
        };
        if uri_ok {
            return Ok(true);
        }
    }
    Ok(false)
}

fn predicates_hold(
    predicates: &[Predicate],
    elem: &ElementData,
    bindings: &NamespaceScope,
    variables: &Variables,
) -> Result<bool, XPathError> {
    for predicate in predicates {
        match predicate {
            Predicate::HasAttr(attr) => {
                if attr_value(elem, attr, bindings)?.is_none() {
                    return Ok(false);
                }
            }
            Predicate::AttrEquals(attr, operand) => {
                let Some(actual) = attr_value(elem, attr, bindings)? else {
                    return Ok(false);
                };
                let expected = match operand {
                    Operand::Literal(s) => s.as_str(),
                    Operand::Variable(name) => variables
                        .get(name)
                        .map(String::as_str)
                        .ok_or_else(|| XPathError::UnboundVariable(name.clone()))?,
                };
                if actual != expected {
                    return Ok(false);
                }
            }
        }
    }
    Ok(true)
}

fn attr_value<'a>(
    elem: &'a ElementData,
    attr: &crate::ast::AttrName,
    bindings: &NamespaceScope,
) -> Result<Option<&'a str>, XPathError> {
    match &attr.prefix {
        Some(prefix) => {
            let uri = bindings
                .resolve(prefix)
                .ok_or_else(|| XPathError::UnboundPrefix(prefix.clone()))?;
            Ok(elem.attr_ns(uri, &attr.local))
        }
        None => Ok(elem.attr(&attr.local)),
    }
}
