//! Semantic queries over the AST.
//!
//! Expression nodes answer `type_of` and `is_constant`; type-expression
//! nodes answer `to_type`. Dispatch is keyed on the node kind, so the tree
//! stays a plain tagged arena and behavior lives here.

use mead_lex::{Token, TokenKind};
use mead_par::{Ast, NodeId, NodeKind};

use crate::namespace::{NamespaceId, QualifiedName, TypeSymbol};
use crate::program::Program;
use crate::scope::ScopeId;
use crate::types::{Type, TypeKind};
use crate::SemError;

/// Resolve a parsed type expression against the namespace hierarchy.
pub fn to_type(
    ast: &Ast,
    node: NodeId,
    program: &Program,
    namespace: NamespaceId,
) -> Result<Type, SemError> {
    if ast.kind(node) != NodeKind::TypeExpression {
        return Err(SemError::Unsupported(format!("{:?}", ast.kind(node))));
    }

    let mut ty = base_type(ast, node, program, namespace)?;

    for &child in ast.children(node) {
        match ast.kind(child) {
            NodeKind::ConstQualifier => ty.set_const(true),
            NodeKind::PointerQualifier => ty = Type::pointer(ty),
            NodeKind::ReferenceQualifier => ty = Type::lreference(ty),
            // Skip the name pieces of a qualified base.
            NodeKind::Identifier => {}
            other => return Err(SemError::Unsupported(format!("{:?}", other))),
        }
    }

    Ok(ty)
}

fn base_type(
    ast: &Ast,
    node: NodeId,
    program: &Program,
    namespace: NamespaceId,
) -> Result<Type, SemError> {
    let token = ast.token(node);
    match token.kind {
        TokenKind::IntegerType => {
            let signed = token.lexeme.starts_with('i');
            let bits: u8 = token.lexeme[1..]
                .parse()
                .expect("integer-type token carries a valid width");
            Ok(Type::int(bits, signed))
        }
        TokenKind::Void => Ok(Type::void()),
        _ => {
            let mut pieces: Vec<String> = ast
                .children(node)
                .iter()
                .filter(|&&c| ast.kind(c) == NodeKind::Identifier)
                .map(|&c| ast.token(c).lexeme.clone())
                .collect();
            let name = pieces.pop().ok_or_else(|| {
                SemError::Resolution(token.lexeme.clone())
            })?;
            let qualified = QualifiedName::new(pieces, name);

            match program.namespaces.lookup_qualified_type(namespace, &qualified) {
                Some((_, TypeSymbol::Primitive(ty))) => Ok(ty.clone()),
                Some((owner, TypeSymbol::Class(def))) => Ok(Type::class(def.name.clone(), owner)),
                None => Err(SemError::Resolution(qualified.to_string())),
            }
        }
    }
}

/// The type of an expression node, resolved against a scope.
pub fn type_of(
    ast: &Ast,
    node: NodeId,
    program: &Program,
    scope: ScopeId,
) -> Result<Type, SemError> {
    let namespace = program.global_namespace();

    match ast.kind(node) {
        // An identifier denotes an l-value: the variable's declared type
        // wrapped in a reference.
        NodeKind::Identifier => {
            let name = &ast.token(node).lexeme;
            let variable = program
                .scopes
                .get_variable(scope, name)
                .ok_or_else(|| SemError::Resolution(name.clone()))?;
            log::trace!("resolved variable {}", variable);
            Ok(Type::lreference(variable.ty.clone()))
        }

        NodeKind::Number => Ok(number_type(ast.token(node))),

        // A string literal is a pointer to constant bytes.
        NodeKind::String => {
            let mut ty = Type::pointer(Type::int(8, false).as_const());
            ty.set_const(true);
            Ok(ty)
        }

        NodeKind::ScopeResolution => {
            Err(SemError::Resolution(ast.token(ast.child(node, 1)).lexeme.clone()))
        }

        // The common type: whichever side the other converts to.
        NodeKind::Binary => {
            let lhs = value_type_of(ast, ast.child(node, 0), program, scope)?;
            let rhs = value_type_of(ast, ast.child(node, 1), program, scope)?;
            if rhs.is_convertible_to(&lhs) {
                Ok(lhs)
            } else if lhs.is_convertible_to(&rhs) {
                Ok(rhs)
            } else {
                Ok(Type::invalid())
            }
        }

        NodeKind::FunctionCall => {
            for &argument in &ast.children(node)[1..] {
                type_of(ast, argument, program, scope)?;
            }
            let callee = ast.child(node, 0);
            if ast.kind(callee) == NodeKind::Identifier {
                let name = &ast.token(callee).lexeme;
                let signature = program
                    .namespaces
                    .lookup_function(namespace, name)
                    .ok_or_else(|| SemError::Resolution(name.clone()))?;
                Ok(signature.return_type.clone())
            } else {
                Ok(Type::invalid())
            }
        }

        NodeKind::ConstructorCall => {
            for &argument in &ast.children(node)[1..] {
                type_of(ast, argument, program, scope)?;
            }
            to_type(ast, ast.child(node, 0), program, namespace)
        }

        NodeKind::Cast => {
            type_of(ast, ast.child(node, 1), program, scope)?;
            to_type(ast, ast.child(node, 0), program, namespace)
        }

        NodeKind::Sizeof => {
            type_of(ast, ast.child(node, 0), program, scope)?;
            Ok(Type::int(64, false).as_const())
        }

        NodeKind::Subscript => {
            type_of(ast, ast.child(node, 1), program, scope)?;
            let base = value_type_of(ast, ast.child(node, 0), program, scope)?;
            Ok(base.dereference().unwrap_or_else(Type::invalid))
        }

        NodeKind::AccessMember => {
            let receiver = value_type_of(ast, ast.child(node, 0), program, scope)?;
            let member = &ast.token(ast.child(node, 1)).lexeme;
            match &receiver.kind {
                TypeKind::Class { name, namespace } => {
                    let def = program
                        .namespaces
                        .class_def(*namespace, name)
                        .ok_or_else(|| SemError::Resolution(name.clone()))?;
                    let field = def
                        .field(member)
                        .ok_or_else(|| SemError::Resolution(member.clone()))?;
                    Ok(Type::lreference(field.clone()))
                }
                _ => Ok(Type::invalid()),
            }
        }

        NodeKind::Deref => {
            let operand = value_type_of(ast, ast.child(node, 0), program, scope)?;
            Ok(operand.dereference().unwrap_or_else(Type::invalid))
        }

        NodeKind::GetAddress => {
            let operand = type_of(ast, ast.child(node, 0), program, scope)?;
            Ok(Type::pointer(operand.unwrap_lreference().clone()))
        }

        NodeKind::UnaryPlus
        | NodeKind::UnaryMinus
        | NodeKind::LogicalNot
        | NodeKind::BitwiseNot
        | NodeKind::PostfixIncrement
        | NodeKind::PostfixDecrement => value_type_of(ast, ast.child(node, 0), program, scope),

        // Prefix increment and decrement keep the operand an l-value.
        NodeKind::PrefixIncrement | NodeKind::PrefixDecrement => {
            type_of(ast, ast.child(node, 0), program, scope)
        }

        NodeKind::SingleNew => {
            for &argument in &ast.children(node)[1..] {
                type_of(ast, argument, program, scope)?;
            }
            let ty = to_type(ast, ast.child(node, 0), program, namespace)?;
            Ok(Type::pointer(ty))
        }

        NodeKind::ArrayNew => {
            type_of(ast, ast.child(node, 1), program, scope)?;
            let ty = to_type(ast, ast.child(node, 0), program, namespace)?;
            Ok(Type::pointer(ty))
        }

        NodeKind::Delete => {
            type_of(ast, ast.child(node, 0), program, scope)?;
            Ok(Type::void())
        }

        // Assignment yields its (l-value) left-hand side.
        NodeKind::Assign | NodeKind::CompoundAssign => {
            type_of(ast, ast.child(node, 1), program, scope)?;
            type_of(ast, ast.child(node, 0), program, scope)
        }

        NodeKind::ConditionalExpression => {
            type_of(ast, ast.child(node, 0), program, scope)?;
            // Arm declarations bind names; the walk runs against a scratch
            // copy so the query itself leaves the program untouched.
            let mut scratch = program.clone();
            for &arm in &ast.children(node)[1..] {
                check_branch(ast, arm, &mut scratch, scope)?;
            }
            Ok(Type::void())
        }

        NodeKind::Comma => {
            type_of(ast, ast.child(node, 0), program, scope)?;
            type_of(ast, ast.child(node, 1), program, scope)
        }

        other => Err(SemError::Unsupported(format!("{:?}", other))),
    }
}

/// Validate one statement of an if-expression arm.
///
/// Arms are statement blocks appearing in expression position, outside any
/// function being compiled, so this mirrors statement compilation without
/// touching basic blocks: blocks open child scopes, declarations bind,
/// initializers must be assignable, and every expression must type-check.
/// Return values are typed but have no surrounding function to check
/// against.
fn check_branch(
    ast: &Ast,
    node: NodeId,
    program: &mut Program,
    scope: ScopeId,
) -> Result<(), SemError> {
    match ast.kind(node) {
        NodeKind::Block => {
            let inner = program.scopes.add_scope(scope);
            for &statement in ast.children(node) {
                check_branch(ast, statement, program, inner)?;
            }
            Ok(())
        }

        NodeKind::VariableDeclaration => {
            let variable = crate::compile::declared_variable(ast, node, program)?;
            let name = variable.name.clone();
            if !program.scopes.insert_variable(scope, variable) {
                return Err(SemError::Duplicate(name));
            }
            Ok(())
        }

        NodeKind::VariableDefinition => {
            let declaration = ast.child(node, 0);
            let initializer = ast.child(node, 1);
            let variable = crate::compile::declared_variable(ast, declaration, program)?;

            let initializer_type = type_of(ast, initializer, program, scope)?;
            if !is_assignable(&initializer_type, &variable.ty) {
                return Err(SemError::Type {
                    from: initializer_type,
                    to: variable.ty,
                });
            }

            let name = variable.name.clone();
            if !program.scopes.insert_variable(scope, variable) {
                return Err(SemError::Duplicate(name));
            }
            Ok(())
        }

        NodeKind::IfStatement => {
            type_of(ast, ast.child(node, 0), program, scope)?;
            for &arm in &ast.children(node)[1..] {
                check_branch(ast, arm, program, scope)?;
            }
            Ok(())
        }

        NodeKind::ReturnStatement | NodeKind::ExpressionStatement => {
            type_of(ast, ast.child(node, 0), program, scope)?;
            Ok(())
        }

        NodeKind::EmptyStatement => Ok(()),

        other => Err(SemError::Unsupported(format!("{:?}", other))),
    }
}

/// `type_of` with a top-level l-value reference stripped: the type of the
/// value an expression produces when read.
fn value_type_of(
    ast: &Ast,
    node: NodeId,
    program: &Program,
    scope: ScopeId,
) -> Result<Type, SemError> {
    Ok(type_of(ast, node, program, scope)?.unwrap_lreference().clone())
}

/// Whether an expression's value is known at compile time.
pub fn is_constant(
    ast: &Ast,
    node: NodeId,
    program: &Program,
    scope: ScopeId,
) -> Result<bool, SemError> {
    match ast.kind(node) {
        NodeKind::Number | NodeKind::String | NodeKind::Sizeof => Ok(true),

        NodeKind::Identifier => Ok(false),

        NodeKind::Binary => {
            let lhs = is_constant(ast, ast.child(node, 0), program, scope)?;
            let rhs = is_constant(ast, ast.child(node, 1), program, scope)?;
            Ok(lhs && rhs && !type_of(ast, node, program, scope)?.is_invalid())
        }

        NodeKind::UnaryPlus
        | NodeKind::UnaryMinus
        | NodeKind::LogicalNot
        | NodeKind::BitwiseNot
        | NodeKind::Cast
        | NodeKind::AccessMember => is_constant(ast, ast.child(node, 0), program, scope),

        NodeKind::Subscript | NodeKind::Comma => {
            let lhs = is_constant(ast, ast.child(node, 0), program, scope)?;
            let rhs = is_constant(ast, ast.child(node, 1), program, scope)?;
            Ok(lhs && rhs)
        }

        NodeKind::ConstructorCall => {
            let mut constant = true;
            for &argument in &ast.children(node)[1..] {
                constant &= is_constant(ast, argument, program, scope)?;
            }
            Ok(constant)
        }

        NodeKind::ScopeResolution
        | NodeKind::FunctionCall
        | NodeKind::Deref
        | NodeKind::GetAddress
        | NodeKind::PrefixIncrement
        | NodeKind::PrefixDecrement
        | NodeKind::PostfixIncrement
        | NodeKind::PostfixDecrement
        | NodeKind::SingleNew
        | NodeKind::ArrayNew
        | NodeKind::Delete
        | NodeKind::Assign
        | NodeKind::CompoundAssign
        | NodeKind::ConditionalExpression => Ok(false),

        other => Err(SemError::Unsupported(format!("{:?}", other))),
    }
}

/// Whether a value of `from` can initialize or be returned as `to`.
///
/// Stronger than plain convertibility: l-value references decay on either
/// side, and integer types coerce to one another numerically.
pub(crate) fn is_assignable(from: &Type, to: &Type) -> bool {
    let from = from.unwrap_lreference();
    let to = to.unwrap_lreference();
    if from.is_convertible_to(to) {
        return true;
    }
    matches!(
        (&from.kind, &to.kind),
        (TypeKind::Int { .. }, TypeKind::Int { .. })
    )
}

/// The type of a numeric literal: the smallest signed integer type that
/// holds its value, const-qualified. Literals that fit no integer type
/// (floats, overflow) are invalid.
fn number_type(token: &Token) -> Type {
    let value = match token.kind {
        TokenKind::IntegerLiteral => parse_integer(&token.lexeme),
        TokenKind::CharLiteral => char_value(&token.lexeme),
        _ => None,
    };
    match value {
        Some(value) => smallest_signed(value).as_const(),
        None => Type::invalid(),
    }
}

fn smallest_signed(value: i64) -> Type {
    if value <= i8::MAX as i64 {
        Type::int(8, true)
    } else if value <= i16::MAX as i64 {
        Type::int(16, true)
    } else if value <= i32::MAX as i64 {
        Type::int(32, true)
    } else {
        Type::int(64, true)
    }
}

/// Parse a decimal, hex (`0x`) or octal (leading `0`) literal, permitting
/// `'` digit separators.
fn parse_integer(lexeme: &str) -> Option<i64> {
    let cleaned: String = lexeme.chars().filter(|&c| c != '\'').collect();
    if let Some(hex) = cleaned.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else if cleaned.len() > 1 && cleaned.starts_with('0') {
        i64::from_str_radix(&cleaned[1..], 8).ok()
    } else {
        cleaned.parse().ok()
    }
}

/// The code of a character literal, escapes included.
fn char_value(lexeme: &str) -> Option<i64> {
    let inner = lexeme.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = inner.chars();
    let first = chars.next()?;
    if first != '\\' {
        return Some(first as i64);
    }
    match chars.next()? {
        '\\' => Some('\\' as i64),
        '\'' => Some('\'' as i64),
        '0' => Some(0),
        'a' => Some(0x07),
        'b' => Some(0x08),
        'e' => Some(0x1b),
        'f' => Some(0x0c),
        'n' => Some('\n' as i64),
        'r' => Some('\r' as i64),
        't' => Some('\t' as i64),
        'x' => {
            let digits: String = chars.collect();
            i64::from_str_radix(&digits, 16).ok()
        }
        _ => None,
    }
}
