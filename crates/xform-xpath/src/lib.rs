//! xform XPath
//!
//! Compiles path expressions to an AST once, evaluates them against
//! `xform-dom` documents under caller-supplied namespace bindings and
//! variables, and pools compiled expressions behind a checkout/return
//! guard so compilation cost is paid once per distinct expression.

mod ast;
mod eval;
mod parser;
mod pool;

pub use eval::{NodeRef, Value};
pub use pool::{PooledXPath, XPathPool};

use std::collections::HashMap;

use xform_dom::{Document, NamespaceScope};

/// Named variable bindings for one evaluation
pub type Variables = HashMap<String, String>;

/// Path expression error
#[derive(Debug, thiserror::Error)]
pub enum XPathError {
    #[error("invalid path expression '{expr}': {message}")]
    Syntax { expr: String, message: String },

    #[error("unbound namespace prefix '{0}'")]
    UnboundPrefix(String),

    #[error("unbound variable '${0}'")]
    UnboundVariable(String),

    #[error("relative paths are not supported: '{0}'")]
    RelativePath(String),
}

/// A compiled path expression
///
/// Compilation is independent of any document; namespace bindings and
/// variables are supplied per evaluation.
#[derive(Debug, Clone)]
pub struct CompiledXPath {
    source: String,
    expr: ast::Expr,
}

impl CompiledXPath {
    /// Compile an expression
    pub fn compile(source: &str) -> Result<Self, XPathError> {
        let expr = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    /// The expression text this was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against a document
    pub fn evaluate(
        &self,
        document: &Document,
        bindings: &NamespaceScope,
        variables: &Variables,
    ) -> Result<Value, XPathError> {
        eval::evaluate(&self.expr, &self.source, document, bindings, variables)
    }

    /// Evaluate and take the first resulting node, if any
    pub fn evaluate_single(
        &self,
        document: &Document,
        bindings: &NamespaceScope,
        variables: &Variables,
    ) -> Result<Option<NodeRef>, XPathError> {
        let value = self.evaluate(document, bindings, variables)?;
        Ok(value.nodes().first().cloned())
    }

    /// Evaluate to a scalar string
    pub fn string_value(
        &self,
        document: &Document,
        bindings: &NamespaceScope,
        variables: &Variables,
    ) -> Result<String, XPathError> {
        let value = self.evaluate(document, bindings, variables)?;
        Ok(value.string_value(document))
    }
}
