//! Type expression parsing.
//!
//! A type is a base name (an integer-type token, `void`, or a `::`-joined
//! identifier chain) followed by a suffix of `*`, `&` and `const`
//! qualifiers. Qualifier rules: `const` applies to whatever has been built
//! so far, at most one `&` is allowed, and nothing but `const` may follow
//! it. Identifier-based names are validated against the known-types table
//! at parse time, so unknown type names fail the production.

use mead_lex::TokenKind;
use mead_util::FxHashSet;

use crate::{NodeId, NodeKind, PResult, Parser};

/// The parse-time database of known type names.
///
/// Keys are fully qualified names rendered with `::` separators.
#[derive(Clone, Debug, Default)]
pub struct TypeNames {
    names: FxHashSet<String>,
}

impl TypeNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-populated with the primitive type names.
    pub fn with_primitives() -> Self {
        let mut names = Self::new();
        for name in [
            "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "void",
        ] {
            names.insert(name);
        }
        names
    }

    /// Register a name; returns false if it was already known.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl Parser {
    /// Parse a type expression.
    ///
    /// With `include_qualifiers` the production also consumes the suffix of
    /// `*`, `&` and `const` qualifiers; without it only the base name is
    /// taken.
    pub fn take_type(&mut self, include_qualifiers: bool) -> PResult<NodeId> {
        self.scoped("type", |p| {
            let node = p.take_base_type()?;
            p.trace
                .note(format!("base type '{}'", p.ast.token(node).lexeme));
            if include_qualifiers {
                p.take_type_qualifiers(node)?;
            }
            Ok(node)
        })
    }

    fn take_base_type(&mut self) -> PResult<NodeId> {
        if let Some(token) = self.take(TokenKind::IntegerType) {
            return Ok(self.ast.alloc(NodeKind::TypeExpression, token));
        }
        if let Some(token) = self.take(TokenKind::Void) {
            return Ok(self.ast.alloc(NodeKind::TypeExpression, token));
        }
        if self.peek_kind(TokenKind::Identifier) {
            return self.take_named_type();
        }
        Err(self.error("expected a type"))
    }

    /// A `::`-joined identifier chain naming a user type.
    fn take_named_type(&mut self) -> PResult<NodeId> {
        let first = self
            .take(TokenKind::Identifier)
            .expect("caller checked for an identifier");
        let mut pieces = vec![first.clone()];

        while self.take(TokenKind::Scope).is_some() {
            pieces.push(self.expect(TokenKind::Identifier, "an identifier after '::'")?);
        }

        let qualified = pieces
            .iter()
            .map(|t| t.lexeme.as_str())
            .collect::<Vec<_>>()
            .join("::");
        if !self.type_names.contains(&qualified) {
            return Err(self.error(format!("unknown type name '{}'", qualified)));
        }

        let node = self.ast.alloc(NodeKind::TypeExpression, first);
        for piece in pieces {
            let id = self.ast.alloc(NodeKind::Identifier, piece);
            self.ast.reparent(id, node);
        }
        Ok(node)
    }

    /// Consume the qualifier suffix, appending marker children to `node`.
    fn take_type_qualifiers(&mut self, node: NodeId) -> PResult<()> {
        let mut saw_reference = false;

        loop {
            if let Some(token) = self.take(TokenKind::Const) {
                let q = self.ast.alloc(NodeKind::ConstQualifier, token);
                self.ast.reparent(q, node);
            } else if self.peek_kind(TokenKind::Star) {
                if saw_reference {
                    return Err(self.error("pointer qualifier cannot follow a reference"));
                }
                let token = self.take(TokenKind::Star).expect("peeked");
                let q = self.ast.alloc(NodeKind::PointerQualifier, token);
                self.ast.reparent(q, node);
            } else if self.peek_kind(TokenKind::Ampersand) {
                if saw_reference {
                    return Err(self.error("only one reference qualifier is allowed"));
                }
                saw_reference = true;
                let token = self.take(TokenKind::Ampersand).expect("peeked");
                let q = self.ast.alloc(NodeKind::ReferenceQualifier, token);
                self.ast.reparent(q, node);
            } else {
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::tokens_of;

    fn parse_type(source: &str) -> (Parser, PResult<NodeId>) {
        let mut parser = Parser::new(tokens_of(source));
        let result = parser.take_type(true);
        (parser, result)
    }

    fn qualifier_kinds(parser: &Parser, node: NodeId) -> Vec<NodeKind> {
        parser
            .ast
            .children(node)
            .iter()
            .map(|&c| parser.ast.kind(c))
            .filter(|k| {
                matches!(
                    k,
                    NodeKind::ConstQualifier
                        | NodeKind::PointerQualifier
                        | NodeKind::ReferenceQualifier
                )
            })
            .collect()
    }

    #[test]
    fn test_primitive_base() {
        let (parser, result) = parse_type("i32");
        let node = result.unwrap();
        assert_eq!(parser.ast.kind(node), NodeKind::TypeExpression);
        assert_eq!(parser.ast.token(node).lexeme, "i32");
    }

    #[test]
    fn test_void_base() {
        let (_, result) = parse_type("void");
        assert!(result.is_ok());
    }

    #[test]
    fn test_qualifier_stack_in_order() {
        let (parser, result) = parse_type("i32 const*& const");
        let node = result.unwrap();
        assert_eq!(
            qualifier_kinds(&parser, node),
            vec![
                NodeKind::ConstQualifier,
                NodeKind::PointerQualifier,
                NodeKind::ReferenceQualifier,
                NodeKind::ConstQualifier,
            ]
        );
    }

    #[test]
    fn test_double_pointer() {
        let (parser, result) = parse_type("u8**");
        let node = result.unwrap();
        assert_eq!(
            qualifier_kinds(&parser, node),
            vec![NodeKind::PointerQualifier, NodeKind::PointerQualifier]
        );
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let (_, result) = parse_type("widget");
        assert!(result.is_err());
    }

    #[test]
    fn test_registered_name_is_accepted() {
        let mut parser = Parser::new(tokens_of("gadget*"));
        parser.register_type_name("gadget");
        assert!(parser.take_type(true).is_ok());
    }

    #[test]
    fn test_qualified_name_lookup() {
        let mut parser = Parser::new(tokens_of("foo::bar::T"));
        parser.register_type_name("foo::bar::T");
        let node = parser.take_type(true).unwrap();
        let name_children: Vec<_> = parser
            .ast
            .children(node)
            .iter()
            .filter(|&&c| parser.ast.kind(c) == NodeKind::Identifier)
            .map(|&c| parser.ast.token(c).lexeme.clone())
            .collect();
        assert_eq!(name_children, vec!["foo", "bar", "T"]);
    }

    #[test]
    fn test_pointer_after_reference_is_rejected() {
        let (_, result) = parse_type("i32&*");
        assert!(result.is_err());
    }

    #[test]
    fn test_second_reference_is_rejected() {
        // "&&" lexes as a single logical-and token, so spell the references
        // apart to exercise the qualifier rule.
        let (_, result) = parse_type("i32& &");
        assert!(result.is_err());
    }

    #[test]
    fn test_base_only_when_qualifiers_excluded() {
        let mut parser = Parser::new(tokens_of("i32*"));
        assert!(parser.take_type(false).is_ok());
        // The star is left for the caller.
        assert!(parser.take(TokenKind::Star).is_some());
    }
}
