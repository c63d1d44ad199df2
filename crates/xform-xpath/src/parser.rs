//! Path expression parser
//!
//! Recursive descent over the expression subset the engine uses:
//! absolute location paths with child/descendant/attribute steps,
//! union steps, attribute predicates, string and number literals.

use crate::ast::{AttrName, Axis, Expr, LocationPath, NamePattern, Operand, Predicate, Step};
use crate::XPathError;

pub(crate) fn parse(source: &str) -> Result<Expr, XPathError> {
    let mut parser = Parser {
        source,
        chars: source.char_indices().collect(),
        pos: 0,
    };
    parser.skip_ws();
    let expr = parser.parse_expr()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("trailing input"));
    }
    Ok(expr)
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser<'_> {
    fn parse_expr(&mut self) -> Result<Expr, XPathError> {
        match self.peek() {
            Some('\'') | Some('"') => Ok(Expr::Literal(self.parse_quoted()?)),
            Some(c) if c.is_ascii_digit() => self.parse_number(),
            Some(_) => Ok(Expr::Path(self.parse_path()?)),
            None => Err(self.error("empty expression")),
        }
    }

    fn parse_quoted(&mut self) -> Result<String, XPathError> {
        let quote = self.next().unwrap_or('\'');
        let mut out = String::new();
        loop {
            match self.next() {
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string literal")),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Expr, XPathError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().map(|(_, c)| *c).collect();
        text.parse::<f64>()
            .map(Expr::Number)
            .map_err(|_| self.error("malformed number"))
    }

    fn parse_path(&mut self) -> Result<LocationPath, XPathError> {
        let absolute = self.eat('/');
        let mut steps = Vec::new();
        let mut axis = if absolute && self.eat('/') {
            Axis::Descendant
        } else {
            Axis::Child
        };

        loop {
            steps.push(self.parse_step(axis)?);
            if self.eat('/') {
                axis = if self.eat('/') {
                    Axis::Descendant
                } else {
                    Axis::Child
                };
            } else {
                break;
            }
        }
        Ok(LocationPath { absolute, steps })
    }

    fn parse_step(&mut self, mut axis: Axis) -> Result<Step, XPathError> {
        if self.eat('@') {
            axis = Axis::Attribute;
        }

        let names = if self.eat('(') {
            let mut names = vec![self.parse_name_pattern()?];
            while self.eat('|') {
                names.push(self.parse_name_pattern()?);
            }
            if !self.eat(')') {
                return Err(self.error("expected ')' closing union step"));
            }
            names
        } else {
            vec![self.parse_name_pattern()?]
        };

        let mut predicates = Vec::new();
        while self.eat('[') {
            predicates.push(self.parse_predicate()?);
            if !self.eat(']') {
                return Err(self.error("expected ']' closing predicate"));
            }
        }
        // Attributes carry no attributes of their own to test against
        if axis == Axis::Attribute && !predicates.is_empty() {
            return Err(self.error("predicates are not supported on attribute steps"));
        }

        Ok(Step {
            axis,
            names,
            predicates,
        })
    }

    fn parse_name_pattern(&mut self) -> Result<NamePattern, XPathError> {
        if self.eat('*') {
            return Ok(NamePattern {
                prefix: None,
                local: None,
            });
        }
        let first = self.parse_ncname()?;
        if self.eat(':') {
            let local = if self.eat('*') {
                None
            } else {
                Some(self.parse_ncname()?)
            };
            Ok(NamePattern {
                prefix: Some(first),
                local,
            })
        } else {
            Ok(NamePattern {
                prefix: None,
                local: Some(first),
            })
        }
    }

    fn parse_predicate(&mut self) -> Result<Predicate, XPathError> {
        self.skip_ws();
        if !self.eat('@') {
            return Err(self.error("expected '@' in predicate"));
        }
        let first = self.parse_ncname()?;
        let attr = if self.eat(':') {
            AttrName {
                prefix: Some(first),
                local: self.parse_ncname()?,
            }
        } else {
            AttrName {
                prefix: None,
                local: first,
            }
        };

        self.skip_ws();
        if self.peek() == Some(']') {
            return Ok(Predicate::HasAttr(attr));
        }
        if !self.eat('=') {
            return Err(self.error("expected '=' or ']' in predicate"));
        }
        self.skip_ws();

        let operand = match self.peek() {
            Some('$') => {
                self.pos += 1;
                Operand::Variable(self.parse_qname_text()?)
            }
            Some('\'') | Some('"') => Operand::Literal(self.parse_quoted()?),
            _ => return Err(self.error("expected variable or string literal in predicate")),
        };
        self.skip_ws();
        Ok(Predicate::AttrEquals(attr, operand))
    }

    fn parse_ncname(&mut self) -> Result<String, XPathError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected a name"));
        }
        Ok(self.chars[start..self.pos].iter().map(|(_, c)| *c).collect())
    }

    /// Variable names may carry hyphens ($control-id) like NCNames
    fn parse_qname_text(&mut self) -> Result<String, XPathError> {
        self.parse_ncname()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn error(&self, message: &str) -> XPathError {
        XPathError::Syntax {
            expr: self.source.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_absolute_path() {
        let Expr::Path(path) = parse("/data/x").unwrap() else {
            panic!("expected path");
        };
        assert!(path.absolute);
        assert_eq!(path.steps.len(), 2);
        assert_eq!(path.steps[0].names[0].local.as_deref(), Some("data"));
        assert_eq!(path.steps[1].axis, Axis::Child);
    }

    #[test]
    fn test_parse_string_literal() {
        assert_eq!(parse("'hello'").unwrap(), Expr::Literal("hello".to_string()));
        assert_eq!(parse("\"\"").unwrap(), Expr::Literal(String::new()));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse("1").unwrap(), Expr::Number(1.0));
        assert_eq!(parse("2.5").unwrap(), Expr::Number(2.5));
    }

    #[test]
    fn test_parse_resolver_query() {
        let source = "/xxf:controls//*[@xxf:id = $control-id]/xf:*[@ev:event = $control-name]";
        let Expr::Path(path) = parse(source).unwrap() else {
            panic!("expected path");
        };
        assert_eq!(path.steps.len(), 3);

        let wildcard = &path.steps[1];
        assert_eq!(wildcard.axis, Axis::Descendant);
        assert_eq!(wildcard.names[0].local, None);
        assert_eq!(
            wildcard.predicates[0],
            Predicate::AttrEquals(
                AttrName {
                    prefix: Some("xxf".to_string()),
                    local: "id".to_string(),
                },
                Operand::Variable("control-id".to_string())
            )
        );

        let handler = &path.steps[2];
        assert_eq!(handler.names[0].prefix.as_deref(), Some("xf"));
        assert_eq!(handler.names[0].local, None);
    }

    #[test]
    fn test_parse_union_step_with_existence_predicate() {
        let Expr::Path(path) = parse("/xxf:controls//(xf:input|xf:select1)[@ref]").unwrap() else {
            panic!("expected path");
        };
        let step = &path.steps[1];
        assert_eq!(step.axis, Axis::Descendant);
        assert_eq!(step.names.len(), 2);
        assert_eq!(
            step.predicates[0],
            Predicate::HasAttr(AttrName {
                prefix: None,
                local: "ref".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_attribute_step() {
        let Expr::Path(path) = parse("/data/@status").unwrap() else {
            panic!("expected path");
        };
        assert_eq!(path.steps[1].axis, Axis::Attribute);
        assert_eq!(path.steps[1].names[0].local.as_deref(), Some("status"));
    }

    #[test]
    fn test_parse_relative_path() {
        let Expr::Path(path) = parse("x/y").unwrap() else {
            panic!("expected path");
        };
        assert!(!path.absolute);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("").is_err());
        assert!(parse("'unterminated").is_err());
        assert!(parse("/data/x[").is_err());
        assert!(parse("/data/x]extra").is_err());
    }

    #[test]
    fn test_predicate_on_attribute_step_is_rejected() {
        assert!(matches!(
            parse("/data/@a[@b]"),
            Err(XPathError::Syntax { .. })
        ));
        assert!(parse("/data/@a[@b = 'v']").is_err());
        // Predicates on the element step stay fine
        assert!(parse("/data[@a]/@b").is_ok());
    }
}
