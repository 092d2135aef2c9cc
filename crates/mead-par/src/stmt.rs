//! Statement parsing.

use mead_lex::TokenKind;

use crate::expr::ExprCtx;
use crate::{NodeId, NodeKind, PResult, Parser};

impl Parser {
    /// `"{" statement* "}"`
    pub fn take_block(&mut self) -> PResult<NodeId> {
        self.scoped("block", |p| {
            let opening = p.expect(TokenKind::OpeningBrace, "'{'")?;

            let mut statements = Vec::new();
            while !p.peek_kind(TokenKind::ClosingBrace) {
                statements.push(p.take_statement()?);
            }
            p.expect(TokenKind::ClosingBrace, "'}' to close the block")?;

            let node = p.ast.alloc(NodeKind::Block, opening);
            for statement in statements {
                p.ast.reparent(statement, node);
            }
            Ok(node)
        })
    }

    /// One statement: a declaration, definition, block, `if`, `return`,
    /// expression statement, or a lone `;`.
    pub fn take_statement(&mut self) -> PResult<NodeId> {
        self.scoped("statement", |p| {
            if let Some(token) = p.take(TokenKind::Semicolon) {
                return Ok(p.ast.alloc(NodeKind::EmptyStatement, token));
            }

            p.take_variable_definition()
                .or_else(|_| p.take_variable_declaration())
                .or_else(|_| p.take_block())
                .or_else(|_| p.take_if_statement())
                .or_else(|_| p.take_return_statement())
                .or_else(|_| p.take_expression_statement())
                .map_err(|_| p.error("expected a statement"))
        })
    }

    /// `"if" expression block ("else" block)?`
    pub fn take_if_statement(&mut self) -> PResult<NodeId> {
        self.scoped("if statement", |p| {
            let if_token = p.expect(TokenKind::If, "'if'")?;
            let condition = p.take_expression(ExprCtx::default())?;
            let then_block = p.take_block()?;

            let else_block = if p.take(TokenKind::Else).is_some() {
                Some(p.take_block()?)
            } else {
                None
            };

            let node = p.ast.alloc(NodeKind::IfStatement, if_token);
            p.ast.reparent(condition, node);
            p.ast.reparent(then_block, node);
            if let Some(else_block) = else_block {
                p.ast.reparent(else_block, node);
            }
            Ok(node)
        })
    }

    /// `"return" expression ";"`
    pub fn take_return_statement(&mut self) -> PResult<NodeId> {
        self.scoped("return statement", |p| {
            let return_token = p.expect(TokenKind::Return, "'return'")?;
            let value = p.take_expression(ExprCtx::default())?;
            p.expect(TokenKind::Semicolon, "';' after the return value")?;

            let node = p.ast.alloc(NodeKind::ReturnStatement, return_token);
            p.ast.reparent(value, node);
            Ok(node)
        })
    }

    /// `expression ";"`
    pub fn take_expression_statement(&mut self) -> PResult<NodeId> {
        self.scoped("expression statement", |p| {
            let expression = p.take_expression(ExprCtx::default())?;
            let semicolon = p.expect(TokenKind::Semicolon, "';' after the expression")?;

            let node = p.ast.alloc(NodeKind::ExpressionStatement, semicolon);
            p.ast.reparent(expression, node);
            Ok(node)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::tokens_of;

    fn parser(source: &str) -> Parser {
        Parser::new(tokens_of(source))
    }

    #[test]
    fn test_empty_block() {
        let mut p = parser("{}");
        let node = p.take_block().unwrap();
        assert_eq!(p.ast.kind(node), NodeKind::Block);
        assert!(p.ast.children(node).is_empty());
    }

    #[test]
    fn test_block_contains_only_statements() {
        let mut p = parser("{ foo: u8; { foo: u16; } bar: i64; ; }");
        let node = p.take_block().unwrap();
        for &child in p.ast.children(node) {
            assert!(p.ast.kind(child).is_statement(), "{:?}", p.ast.kind(child));
        }
        assert_eq!(p.ast.children(node).len(), 4);
    }

    #[test]
    fn test_if_statement_with_else() {
        let mut p = parser("if 0 { return -42; } else { foo; }");
        let node = p.take_if_statement().unwrap();
        let children = p.ast.children(node).to_vec();
        assert_eq!(children.len(), 3);
        assert_eq!(p.ast.kind(children[0]), NodeKind::Number);
        assert_eq!(p.ast.kind(children[1]), NodeKind::Block);
        assert_eq!(p.ast.kind(children[2]), NodeKind::Block);
    }

    #[test]
    fn test_if_statement_without_else() {
        let mut p = parser("if x { return 1; }");
        let node = p.take_if_statement().unwrap();
        assert_eq!(p.ast.children(node).len(), 2);
    }

    #[test]
    fn test_return_statement() {
        let mut p = parser("return -42;");
        let node = p.take_return_statement().unwrap();
        assert_eq!(p.ast.kind(node), NodeKind::ReturnStatement);
        let value = p.ast.child(node, 0);
        assert_eq!(p.ast.kind(value), NodeKind::UnaryMinus);
    }

    #[test]
    fn test_expression_statement_wraps_comma() {
        let mut p = parser("1, 2, 3;");
        let node = p.take_statement().unwrap();
        assert_eq!(p.ast.kind(node), NodeKind::ExpressionStatement);
        let expression = p.ast.child(node, 0);
        assert_eq!(p.ast.kind(expression), NodeKind::Comma);
    }

    #[test]
    fn test_lone_semicolon_is_empty_statement() {
        let mut p = parser(";");
        let node = p.take_statement().unwrap();
        assert_eq!(p.ast.kind(node), NodeKind::EmptyStatement);
    }

    #[test]
    fn test_statement_failure_restores_cursor() {
        let mut p = parser("}");
        assert!(p.take_statement().is_err());
        assert!(p.peek_kind(TokenKind::ClosingBrace));
    }
}
