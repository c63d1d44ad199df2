//! Compiled form of a path expression

/// A whole expression: a literal, a number, or a location path
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// String literal: `'hello'`
    Literal(String),
    /// Number literal: `1`, `2.5`
    Number(f64),
    /// Location path: `/data/x`, `/xxf:controls//*[@xxf:id = $control-id]`
    Path(LocationPath),
}

/// A location path as a sequence of steps
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPath {
    /// True if the path starts at the document root (`/...`)
    pub absolute: bool,
    pub steps: Vec<Step>,
}

/// One location step
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    /// Name alternatives; more than one for a union step `(a|b|c)`
    pub names: Vec<NamePattern>,
    pub predicates: Vec<Predicate>,
}

/// Supported axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `/step`
    Child,
    /// `//step`
    Descendant,
    /// `@name`
    Attribute,
}

/// A name test, possibly wildcarded: `x`, `xf:input`, `*`, `xf:*`
#[derive(Debug, Clone, PartialEq)]
pub struct NamePattern {
    pub prefix: Option<String>,
    /// None means `*`
    pub local: Option<String>,
}

/// A step predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `[@ref]`
    HasAttr(AttrName),
    /// `[@ev:event = $control-name]` or `[@a = 'x']`
    AttrEquals(AttrName, Operand),
}

/// A possibly prefixed attribute name inside a predicate
#[derive(Debug, Clone, PartialEq)]
pub struct AttrName {
    pub prefix: Option<String>,
    pub local: String,
}

/// Right-hand side of an equality predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(String),
    Variable(String),
}
