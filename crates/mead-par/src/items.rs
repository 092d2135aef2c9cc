//! Top-level item parsing: variables and functions.

use mead_lex::{Token, TokenKind};

use crate::expr::ExprCtx;
use crate::{NodeId, NodeKind, PResult, Parser};

impl Parser {
    /// A typed variable, without any terminator.
    ///
    /// Both spellings are accepted: `name: type` and `type name`. The
    /// resulting `VariableDeclaration` has exactly two children, the name
    /// identifier and the type expression, and is anchored at the name.
    pub fn take_typed_variable(&mut self) -> PResult<NodeId> {
        self.scoped("typed variable", |p| {
            p.attempt(|p| p.take_name_colon_type())
                .or_else(|_| p.attempt(|p| p.take_type_then_name()))
        })
    }

    /// `name: type`
    fn take_name_colon_type(&mut self) -> PResult<NodeId> {
        let name = self.expect(TokenKind::Identifier, "a variable name")?;
        self.expect(TokenKind::Colon, "':' after the variable name")?;
        let ty = self.take_type(true)?;
        Ok(self.make_declaration(name, ty))
    }

    /// `type name`
    fn take_type_then_name(&mut self) -> PResult<NodeId> {
        let ty = self.take_type(true)?;
        let name = self.expect(TokenKind::Identifier, "a variable name")?;
        Ok(self.make_declaration(name, ty))
    }

    fn make_declaration(&mut self, name: Token, ty: NodeId) -> NodeId {
        let node = self.ast.alloc(NodeKind::VariableDeclaration, name.clone());
        let name_node = self.ast.alloc(NodeKind::Identifier, name);
        self.ast.reparent(name_node, node);
        self.ast.reparent(ty, node);
        node
    }

    /// `typed-variable ";"`
    pub fn take_variable_declaration(&mut self) -> PResult<NodeId> {
        self.scoped("variable declaration", |p| {
            let declaration = p.take_typed_variable()?;
            p.expect(TokenKind::Semicolon, "';' after the declaration")?;
            Ok(declaration)
        })
    }

    /// `typed-variable "=" expression ";"`
    pub fn take_variable_definition(&mut self) -> PResult<NodeId> {
        self.scoped("variable definition", |p| {
            let declaration = p.take_typed_variable()?;
            p.expect(TokenKind::Equals, "'=' after the declaration")?;
            let initializer = p.take_expression(ExprCtx::default())?;
            p.expect(TokenKind::Semicolon, "';' after the initializer")?;

            let token = p.ast.token(declaration).clone();
            let node = p.ast.alloc(NodeKind::VariableDefinition, token);
            p.ast.reparent(declaration, node);
            p.ast.reparent(initializer, node);
            Ok(node)
        })
    }

    /// `"fn" name "(" (typed-variable ("," typed-variable)*)? ")" ("->" type)?`
    ///
    /// The prototype node's children are the name, the return type, then one
    /// declaration per parameter; arity is therefore always at least two.
    /// A missing return type clause defaults to `void`.
    pub fn take_function_prototype(&mut self) -> PResult<NodeId> {
        self.scoped("function prototype", |p| {
            let fn_token = p.expect(TokenKind::Fn, "'fn'")?;
            let name = p.expect(TokenKind::Identifier, "a function name")?;
            p.expect(TokenKind::OpeningParen, "'(' after the function name")?;

            let mut parameters = Vec::new();
            if !p.peek_kind(TokenKind::ClosingParen) {
                loop {
                    parameters.push(p.take_typed_variable()?);
                    if p.take(TokenKind::Comma).is_none() {
                        break;
                    }
                }
            }
            p.expect(TokenKind::ClosingParen, "')' after the parameter list")?;
            p.trace.note(format!("{} parameter(s)", parameters.len()));

            let return_type = if p.take(TokenKind::Arrow).is_some() {
                p.take_type(true)?
            } else {
                let token = Token::new(TokenKind::Void, "void", fn_token.location);
                p.ast.alloc(NodeKind::TypeExpression, token)
            };

            let node = p.ast.alloc(NodeKind::FunctionPrototype, fn_token);
            let name_node = p.ast.alloc(NodeKind::Identifier, name);
            p.ast.reparent(name_node, node);
            p.ast.reparent(return_type, node);
            for parameter in parameters {
                p.ast.reparent(parameter, node);
            }
            Ok(node)
        })
    }

    /// `function-prototype ";"`
    pub fn take_function_declaration(&mut self) -> PResult<NodeId> {
        self.scoped("function declaration", |p| {
            let prototype = p.take_function_prototype()?;
            p.expect(TokenKind::Semicolon, "';' after the prototype")?;

            let token = p.ast.token(prototype).clone();
            let node = p.ast.alloc(NodeKind::FunctionDeclaration, token);
            p.ast.reparent(prototype, node);
            Ok(node)
        })
    }

    /// `function-prototype block`
    pub fn take_function_definition(&mut self) -> PResult<NodeId> {
        self.scoped("function definition", |p| {
            let prototype = p.take_function_prototype()?;
            let body = p.take_block()?;

            let token = p.ast.token(prototype).clone();
            let node = p.ast.alloc(NodeKind::FunctionDefinition, token);
            p.ast.reparent(prototype, node);
            p.ast.reparent(body, node);
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
    fn test_typed_variable_both_spellings() {
        let mut p = parser("foo: i32");
        let node = p.take_typed_variable().unwrap();
        assert_eq!(p.ast.kind(node), NodeKind::VariableDeclaration);
        assert_eq!(p.ast.token(node).lexeme, "foo");

        let mut p = parser("u8 foo");
        let node = p.take_typed_variable().unwrap();
        assert_eq!(p.ast.token(node).lexeme, "foo");
        let ty = p.ast.child(node, 1);
        assert_eq!(p.ast.token(ty).lexeme, "u8");
    }

    #[test]
    fn test_variable_definition_shape() {
        let mut p = parser("u8 foo = 0x42;");
        let node = p.take_variable_definition().unwrap();
        assert_eq!(p.ast.kind(node), NodeKind::VariableDefinition);
        assert_eq!(p.ast.children(node).len(), 2);

        let declaration = p.ast.child(node, 0);
        assert_eq!(p.ast.kind(declaration), NodeKind::VariableDeclaration);
        let initializer = p.ast.child(node, 1);
        assert_eq!(p.ast.kind(initializer), NodeKind::Number);
        assert_eq!(p.ast.token(initializer).lexeme, "0x42");
    }

    #[test]
    fn test_prototype_minimum_arity() {
        let mut p = parser("fn noop()");
        let node = p.take_function_prototype().unwrap();
        assert_eq!(p.ast.kind(node), NodeKind::FunctionPrototype);
        // Name and (defaulted void) return type.
        assert_eq!(p.ast.children(node).len(), 2);
        let ret = p.ast.child(node, 1);
        assert_eq!(p.ast.token(ret).kind, TokenKind::Void);
    }

    #[test]
    fn test_prototype_with_parameters_and_return() {
        let mut p = parser("fn main(argc: i32, argv: u8**) -> i32");
        let node = p.take_function_prototype().unwrap();
        let children = p.ast.children(node).to_vec();
        assert_eq!(children.len(), 4);
        assert_eq!(p.ast.token(children[0]).lexeme, "main");
        assert_eq!(p.ast.token(children[1]).lexeme, "i32");
        assert_eq!(p.ast.kind(children[2]), NodeKind::VariableDeclaration);
        assert_eq!(p.ast.token(children[3]).lexeme, "argv");
    }

    #[test]
    fn test_function_declaration_requires_semicolon() {
        let mut p = parser("fn f() -> i32");
        assert!(p.take_function_declaration().is_err());

        let mut p = parser("fn f() -> i32;");
        let node = p.take_function_declaration().unwrap();
        assert_eq!(p.ast.kind(node), NodeKind::FunctionDeclaration);
        assert_eq!(p.ast.children(node).len(), 1);
    }

    #[test]
    fn test_function_definition_shape() {
        let mut p = parser("fn main() -> i32 { return -42; }");
        let node = p.take_function_definition().unwrap();
        assert_eq!(p.ast.kind(node), NodeKind::FunctionDefinition);
        let children = p.ast.children(node).to_vec();
        assert_eq!(children.len(), 2);
        assert_eq!(p.ast.kind(children[0]), NodeKind::FunctionPrototype);
        assert_eq!(p.ast.kind(children[1]), NodeKind::Block);
    }

    #[test]
    fn test_missing_parameter_fails_cleanly() {
        let mut p = parser("fn f(x:) {}");
        let before_len = p.ast.len();
        assert!(p.take_function_definition().is_err());
        assert_eq!(p.ast.len(), before_len);
    }
}
