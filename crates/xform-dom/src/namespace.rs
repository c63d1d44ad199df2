//! Namespace scopes
//!
//! A scope is the set of prefix bindings in force at one element,
//! derived from that element's ancestor chain. Scopes are computed
//! per element at the moment they are needed, never shared mutably.

use std::collections::HashMap;

/// Prefix -> URI bindings in scope at one element
#[derive(Debug, Clone, Default)]
pub struct NamespaceScope {
    bindings: HashMap<String, String>,
    default_uri: Option<String>,
}

impl NamespaceScope {
    /// Empty scope (no bindings)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scope from a fixed prefix table
    pub fn from_bindings<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut scope = Self::new();
        for (prefix, uri) in pairs {
            scope.declare(Some(prefix), uri);
        }
        scope
    }

    /// Add a declaration; an inner redeclaration shadows the outer one
    pub fn declare(&mut self, prefix: Option<&str>, uri: &str) {
        match prefix {
            Some(p) => {
                self.bindings.insert(p.to_string(), uri.to_string());
            }
            None => self.default_uri = Some(uri.to_string()),
        }
    }

    /// Derive the child scope produced by a set of declarations
    pub fn with_decls<'a>(
        &self,
        decls: impl IntoIterator<Item = (Option<&'a str>, &'a str)>,
    ) -> Self {
        let mut child = self.clone();
        for (prefix, uri) in decls {
            child.declare(prefix, uri);
        }
        child
    }

    /// Resolve a prefix to its URI
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    /// URI of the default (unprefixed-element) namespace, if declared
    pub fn default_uri(&self) -> Option<&str> {
        self.default_uri.as_deref()
    }

    /// Iterate over all prefixed bindings
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_redeclaration_shadows() {
        let outer = NamespaceScope::from_bindings([("xf", "urn:outer")]);
        let inner = outer.with_decls([(Some("xf"), "urn:inner")]);

        assert_eq!(outer.resolve("xf"), Some("urn:outer"));
        assert_eq!(inner.resolve("xf"), Some("urn:inner"));
    }

    #[test]
    fn test_default_namespace() {
        let scope = NamespaceScope::new().with_decls([(None, "urn:default")]);
        assert_eq!(scope.default_uri(), Some("urn:default"));
        assert_eq!(scope.resolve("xf"), None);
    }
}
