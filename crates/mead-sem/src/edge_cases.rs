//! Edge case tests for mead-sem

use mead_lex::Lexer;
use mead_par::{Ast, NodeId, Parser};

use crate::*;

fn parse(source: &str) -> (Ast, Vec<NodeId>) {
    let mut lexer = Lexer::new();
    assert!(lexer.lex(source), "source must lex: {source:?}");
    let mut parser = Parser::new(lexer.tokens);
    let (nodes, leftover) = parser.parse();
    assert!(leftover.is_none(), "source must parse: {source:?}");
    (parser.ast, nodes)
}

// ==================== EDGE CASES ====================

#[test]
fn test_edge_number_coerces_into_unsigned_global() {
    // The literal types as a const signed int; the definition coerces it.
    let (ast, nodes) = parse("u8 foo = 0x42;");
    let mut compiler = Compiler::new();
    let out = compiler.compile(&ast, &nodes).unwrap();
    assert_eq!(out.trim(), "[global. foo: u8]");

    let scope = compiler.program.global_scope();
    let variable = compiler.program.scopes.get_variable(scope, "foo").unwrap();
    assert_eq!(variable.ty, Type::int(8, false));
}

#[test]
fn test_edge_nested_shadowing_program_compiles() {
    let (ast, nodes) = parse(
        "fn main(argc: i32, argv: u8 const * const * const) -> i32 {
            foo: u8;
            {
                foo: u16;
                {
                    foo: u32;
                }
            }
            bar: i64;
            return argc;
        }",
    );
    let mut compiler = Compiler::new();
    let out = compiler.compile(&ast, &nodes).unwrap();
    assert!(out.contains("[function. main(i32, u8 const* const* const) -> i32]"));
    assert_eq!(compiler.functions.len(), 1);
}

#[test]
fn test_edge_parameters_are_visible_in_body() {
    let (ast, nodes) = parse("fn id(x: i32) -> i32 { return x; }");
    let mut compiler = Compiler::new();
    compiler.compile(&ast, &nodes).unwrap();
}

#[test]
fn test_edge_return_type_mismatch_is_reported() {
    let (ast, nodes) = parse("fn f() -> u8* { return 42; }");
    let mut compiler = Compiler::new();
    let error = compiler.compile(&ast, &nodes).unwrap_err();
    assert!(matches!(error.error, SemError::Type { .. }));
}

#[test]
fn test_edge_global_scope_is_shared_across_items() {
    // The second global's initializer reads the first.
    let (ast, nodes) = parse("u8 a = 1; u8 b = a;");
    let mut compiler = Compiler::new();
    let out = compiler.compile(&ast, &nodes).unwrap();
    assert!(out.contains("[global. a: u8]"));
    assert!(out.contains("[global. b: u8]"));
}

#[test]
fn test_edge_error_carries_offending_node() {
    let (ast, nodes) = parse("u8 a = 1; u8 b = missing;");
    let mut compiler = Compiler::new();
    let error = compiler.compile(&ast, &nodes).unwrap_err();
    assert_eq!(error.node, nodes[1]);
    assert_eq!(error.to_string(), "failed to resolve \"missing\"");
}

#[test]
fn test_edge_sentinel_and_global_depths() {
    let program = Program::new();
    assert_eq!(program.scopes.depth(program.scopes.sentinel()), -1);
    assert_eq!(program.scopes.depth(program.global_scope()), 0);
}

#[test]
fn test_edge_functions_live_until_compiler_drops() {
    let (ast, nodes) = parse("fn f() -> i32 { return 1; } fn g() -> i32 { return 2; }");
    let mut compiler = Compiler::new();
    compiler.compile(&ast, &nodes).unwrap();
    let names: Vec<_> = compiler.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["f", "g"]);
}

#[test]
fn test_edge_empty_function_body() {
    let (ast, nodes) = parse("fn noop() {}");
    let mut compiler = Compiler::new();
    let out = compiler.compile(&ast, &nodes).unwrap();
    assert_eq!(out.trim(), "[function. noop() -> void]");
}

#[test]
fn test_edge_if_expression_in_call_arguments_compiles() {
    // The else branch carries a constructor call whose second argument is
    // an if-expression; both of its arms are semantically checked.
    let (ast, nodes) = parse(
        "fn main() -> i32 {
            if 0 { return -42; } else { void(1, if 2 { 3,4,5; } else { 6,7,8; }, 9); }
            return 0;
        }",
    );
    let mut compiler = Compiler::new();
    let out = compiler.compile(&ast, &nodes).unwrap();
    assert!(out.contains("[function. main() -> i32]"));
}

#[test]
fn test_edge_bad_name_inside_if_expression_arm_is_reported() {
    let (ast, nodes) = parse(
        "fn main() -> i32 {
            void(1, if 2 { oops; } else { 6,7,8; }, 9);
            return 0;
        }",
    );
    let mut compiler = Compiler::new();
    let error = compiler.compile(&ast, &nodes).unwrap_err();
    assert!(matches!(error.error, SemError::Resolution(name) if name == "oops"));
}

#[test]
fn test_edge_constructor_call_bridges_types() {
    // i32(foo) produces an i32 from a u8 variable.
    let (ast, nodes) = parse(
        "u8 foo = 0x42;
         fn main() -> i32 { return i32(foo); }",
    );
    let mut compiler = Compiler::new();
    let out = compiler.compile(&ast, &nodes).unwrap();
    assert!(out.contains("[function. main() -> i32]"));
}
