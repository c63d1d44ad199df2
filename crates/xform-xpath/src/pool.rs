//! Compiled-expression pool
//!
//! Expressions are compiled on first checkout and returned to the
//! pool when the guard drops, so release happens on every exit path
//! including error paths. The pool is single-threaded, matching the
//! one-cycle-per-thread execution model.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Deref;
use std::rc::Rc;

use crate::{CompiledXPath, XPathError};

/// Shared pool of compiled path expressions
#[derive(Debug, Clone, Default)]
pub struct XPathPool {
    inner: Rc<RefCell<PoolInner>>,
}

#[derive(Debug, Default)]
struct PoolInner {
    idle: HashMap<String, Vec<CompiledXPath>>,
    outstanding: usize,
}

impl XPathPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Check out a compiled expression, compiling on first use
    pub fn checkout(&self, source: &str) -> Result<PooledXPath, XPathError> {
        let cached = self
            .inner
            .borrow_mut()
            .idle
            .get_mut(source)
            .and_then(Vec::pop);

        let compiled = match cached {
            Some(compiled) => compiled,
            None => {
                tracing::debug!("compiling path expression: {source}");
                CompiledXPath::compile(source)?
            }
        };

        self.inner.borrow_mut().outstanding += 1;
        Ok(PooledXPath {
            pool: Rc::clone(&self.inner),
            compiled: Some(compiled),
        })
    }

    /// Number of expressions currently checked out
    pub fn outstanding(&self) -> usize {
        self.inner.borrow().outstanding
    }

    /// Number of idle compiled expressions held by the pool
    pub fn idle(&self) -> usize {
        self.inner.borrow().idle.values().map(Vec::len).sum()
    }
}

/// Checkout guard; returns the expression to the pool on drop
#[derive(Debug)]
pub struct PooledXPath {
    pool: Rc<RefCell<PoolInner>>,
    compiled: Option<CompiledXPath>,
}

impl Deref for PooledXPath {
    type Target = CompiledXPath;

    fn deref(&self) -> &CompiledXPath {
        // Present from checkout until drop
        self.compiled.as_ref().unwrap()
    }
}

impl Drop for PooledXPath {
    fn drop(&mut self) {
        if let Some(compiled) = self.compiled.take() {
            let mut inner = self.pool.borrow_mut();
            inner.outstanding -= 1;
            inner
                .idle
                .entry(compiled.source().to_string())
                .or_default()
                .push(compiled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Variables;
    use xform_dom::NamespaceScope;

    #[test]
    fn test_checkout_compiles_once_and_reuses() {
        let pool = XPathPool::new();

        {
            let expr = pool.checkout("/data/x").unwrap();
            assert_eq!(expr.source(), "/data/x");
            assert_eq!(pool.outstanding(), 1);
            assert_eq!(pool.idle(), 0);
        }
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.idle(), 1);

        // Second checkout reuses the cached compilation
        let _expr = pool.checkout("/data/x").unwrap();
        assert_eq!(pool.idle(), 0);
        assert_eq!(pool.outstanding(), 1);
    }

    #[test]
    fn test_invalid_expression_leaves_nothing_outstanding() {
        let pool = XPathPool::new();
        assert!(pool.checkout("'unterminated").is_err());
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn test_released_on_evaluation_error() {
        let pool = XPathPool::new();
        let document = xform_xml::parse("<data/>").unwrap();

        {
            let expr = pool.checkout("/p:data").unwrap();
            let result = expr.evaluate(&document, &NamespaceScope::new(), &Variables::new());
            assert!(result.is_err());
        }
        // The guard drop returned the expression despite the error
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_concurrent_checkouts_of_same_expression() {
        let pool = XPathPool::new();
        let a = pool.checkout("/data/x").unwrap();
        let b = pool.checkout("/data/x").unwrap();
        assert_eq!(pool.outstanding(), 2);
        drop(a);
        drop(b);
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.idle(), 2);
    }
}
