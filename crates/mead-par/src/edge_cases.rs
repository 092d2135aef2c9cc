//! Edge case tests for mead-par

use crate::tests::tokens_of;
use crate::{ExprCtx, NodeId, NodeKind, Parser};

fn parse_program(source: &str) -> (Parser, Vec<NodeId>) {
    let mut parser = Parser::new(tokens_of(source));
    let (nodes, leftover) = parser.parse();
    assert!(leftover.is_none(), "program should parse fully: {source:?}");
    (parser, nodes)
}

// ==================== EDGE CASES ====================

#[test]
fn test_edge_global_variable_definition() {
    // u8 foo = 0x42;
    let (p, nodes) = parse_program("u8 foo = 0x42;");
    assert_eq!(nodes.len(), 1);
    let definition = nodes[0];
    assert_eq!(p.ast.kind(definition), NodeKind::VariableDefinition);

    let declaration = p.ast.child(definition, 0);
    assert_eq!(p.ast.token(declaration).lexeme, "foo");
    let ty = p.ast.child(declaration, 1);
    assert_eq!(p.ast.token(ty).lexeme, "u8");

    let initializer = p.ast.child(definition, 1);
    assert_eq!(p.ast.kind(initializer), NodeKind::Number);
    assert_eq!(p.ast.token(initializer).lexeme, "0x42");
}

#[test]
fn test_edge_main_function() {
    // fn main() -> i32 { return -42; }
    let (p, nodes) = parse_program("fn main() -> i32 { return -42; }");
    assert_eq!(nodes.len(), 1);
    let definition = nodes[0];
    assert_eq!(p.ast.kind(definition), NodeKind::FunctionDefinition);

    let prototype = p.ast.child(definition, 0);
    assert_eq!(p.ast.token(p.ast.child(prototype, 0)).lexeme, "main");
    assert_eq!(p.ast.token(p.ast.child(prototype, 1)).lexeme, "i32");

    let block = p.ast.child(definition, 1);
    let ret = p.ast.child(block, 0);
    assert_eq!(p.ast.kind(ret), NodeKind::ReturnStatement);
    let minus = p.ast.child(ret, 0);
    assert_eq!(p.ast.kind(minus), NodeKind::UnaryMinus);
    assert_eq!(p.ast.token(p.ast.child(minus, 0)).lexeme, "42");
}

#[test]
fn test_edge_qualified_reference_definition() {
    // foo: i32 const*& const = 40 + 2;
    let (p, nodes) = parse_program("foo: i32 const*& const = 40 + 2;");
    let definition = nodes[0];
    assert_eq!(p.ast.kind(definition), NodeKind::VariableDefinition);

    let declaration = p.ast.child(definition, 0);
    let ty = p.ast.child(declaration, 1);
    let qualifiers: Vec<_> = p
        .ast
        .children(ty)
        .iter()
        .map(|&c| p.ast.kind(c))
        .collect();
    assert_eq!(
        qualifiers,
        vec![
            NodeKind::ConstQualifier,
            NodeKind::PointerQualifier,
            NodeKind::ReferenceQualifier,
            NodeKind::ConstQualifier,
        ]
    );

    let initializer = p.ast.child(definition, 1);
    assert_eq!(p.ast.kind(initializer), NodeKind::Binary);
    assert_eq!(p.ast.token(initializer).lexeme, "+");
}

#[test]
fn test_edge_if_statement_with_constructor_call() {
    // The else branch carries a constructor call whose argument list has
    // exactly three expressions despite the inner commas.
    let source = "if 0 { return -42; } else { void(1, if 2 { 3,4,5; } else { 6,7,8; }, 9); }";
    let mut parser = Parser::new(tokens_of(source));
    let statement = parser.take_statement().expect("statement should parse");
    assert_eq!(parser.ast.kind(statement), NodeKind::IfStatement);

    let else_block = parser.ast.child(statement, 2);
    let expression_statement = parser.ast.child(else_block, 0);
    assert_eq!(
        parser.ast.kind(expression_statement),
        NodeKind::ExpressionStatement
    );

    let call = parser.ast.child(expression_statement, 0);
    assert_eq!(parser.ast.kind(call), NodeKind::ConstructorCall);
    // Type expression plus three arguments.
    assert_eq!(parser.ast.children(call).len(), 4);
}

#[test]
fn test_edge_nested_scopes_program() {
    let source = "
        fn main(argc: i32, argv: u8 const * const * const) -> i32 {
            foo: u8;
            {
                foo: u16;
                {
                    foo: u32;
                }
            }
            bar: i64;
        }
    ";
    let (p, nodes) = parse_program(source);
    assert_eq!(nodes.len(), 1);
    let block = p.ast.child(nodes[0], 1);
    assert_eq!(p.ast.children(block).len(), 3);
    assert_eq!(p.ast.kind(p.ast.child(block, 1)), NodeKind::Block);
}

#[test]
fn test_edge_mixed_top_level_items() {
    let source = "
        u8 foo = 0x42;
        fn get() -> u8;
        fn main() -> i32 { return i32(foo); }
    ";
    let (p, nodes) = parse_program(source);
    let kinds: Vec<_> = nodes.iter().map(|&n| p.ast.kind(n)).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::VariableDefinition,
            NodeKind::FunctionDeclaration,
            NodeKind::FunctionDefinition,
        ]
    );
}

#[test]
fn test_edge_leftover_reports_first_unparsed_token() {
    let mut parser = Parser::new(tokens_of("u8 a = 1; ) u8 b = 2;"));
    let (nodes, leftover) = parser.parse();
    assert_eq!(nodes.len(), 1);
    let token = leftover.expect("leftover");
    assert_eq!(token.lexeme, ")");
}

#[test]
fn test_edge_every_take_restores_on_failure() {
    let sources = [
        "fn broken(",
        "x: unknown_type;",
        "u8 x = ;",
        "return",
        "{ x: u8; ",
    ];
    for source in sources {
        let mut parser = Parser::new(tokens_of(source));
        let before = parser.ast.len();

        assert!(parser.take_variable_definition().is_err());
        assert!(parser.take_function_definition().is_err());
        assert!(parser.ast.len() == before, "arena leaked for {source:?}");
    }
}

#[test]
fn test_edge_deep_expression_nesting() {
    let source = format!("{}x{}", "(".repeat(64), ")".repeat(64));
    let mut parser = Parser::new(tokens_of(&source));
    let node = parser.take_expression(ExprCtx::default()).unwrap();
    assert_eq!(parser.ast.kind(node), NodeKind::Identifier);
}

#[test]
fn test_edge_trace_survives_failure() {
    let mut parser = Parser::new(tokens_of("fn oops("));
    let (_, leftover) = parser.parse();
    assert!(leftover.is_some());
    let rendered = parser.trace().render();
    assert!(rendered.contains("Failure"));
}
