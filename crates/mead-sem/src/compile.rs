//! Statement compilation.
//!
//! Every statement kind answers `compile`: it type-checks its parts,
//! updates the scope tree, and appends instructions or control-flow edges
//! to the current function. The return value is `Ok(true)` on success,
//! `Ok(false)` when a statement cannot be compiled (for example a duplicate
//! binding), and `Err` for resolution and type failures.

use mead_par::{Ast, NodeId, NodeKind};

use crate::function::{BlockId, Function, Instruction};
use crate::program::Program;
use crate::scope::{ScopeId, Variable};
use crate::typeck::{is_assignable, to_type, type_of};
use crate::SemError;

/// Compile one statement node into `block` of `function`.
pub fn compile_statement(
    ast: &Ast,
    node: NodeId,
    program: &mut Program,
    function: &mut Function,
    scope: ScopeId,
    block: BlockId,
) -> Result<bool, SemError> {
    match ast.kind(node) {
        NodeKind::Block => {
            let inner = program.scopes.add_scope(scope);
            for &statement in ast.children(node) {
                if !compile_statement(ast, statement, program, function, inner, block)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }

        NodeKind::VariableDeclaration => {
            let variable = declared_variable(ast, node, program)?;
            let rendered = variable.to_string();
            if !program.scopes.insert_variable(scope, variable) {
                log::debug!("redeclaration of {}", rendered);
                return Ok(false);
            }
            function.push_instruction(block, Instruction::new(format!("local {}", rendered)));
            Ok(true)
        }

        NodeKind::VariableDefinition => {
            let declaration = ast.child(node, 0);
            let initializer = ast.child(node, 1);
            let variable = declared_variable(ast, declaration, program)?;

            let initializer_type = type_of(ast, initializer, program, scope)?;
            if !is_assignable(&initializer_type, &variable.ty) {
                return Err(SemError::Type {
                    from: initializer_type,
                    to: variable.ty,
                });
            }

            let rendered = variable.to_string();
            let name = variable.name.clone();
            if !program.scopes.insert_variable(scope, variable) {
                log::debug!("redefinition of {}", rendered);
                return Ok(false);
            }
            function.push_instruction(block, Instruction::new(format!("local {}", rendered)));
            function.push_instruction(block, Instruction::new(format!("store {}", name)));
            Ok(true)
        }

        NodeKind::IfStatement => {
            // Validate the condition before wiring any blocks.
            type_of(ast, ast.child(node, 0), program, scope)?;

            let then_node = ast.child(node, 1);
            let else_node = ast.children(node).get(2).copied();

            let then_block = function.add_block();
            function.connect(block, then_block);
            let then_ok = compile_statement(ast, then_node, program, function, scope, then_block)?;

            let merge_block = function.add_block();
            function.connect(then_block, merge_block);

            let else_ok = match else_node {
                Some(else_node) => {
                    let else_block = function.add_block();
                    function.connect(block, else_block);
                    let ok =
                        compile_statement(ast, else_node, program, function, scope, else_block)?;
                    function.connect(else_block, merge_block);
                    ok
                }
                None => {
                    function.connect(block, merge_block);
                    true
                }
            };

            function.push_instruction(block, Instruction::new("branch"));
            Ok(then_ok && else_ok)
        }

        NodeKind::ReturnStatement => {
            let value = ast.child(node, 0);
            let value_type = type_of(ast, value, program, scope)?;
            if !is_assignable(&value_type, &function.return_type) {
                return Err(SemError::Type {
                    from: value_type,
                    to: function.return_type.clone(),
                });
            }
            function.push_instruction(block, Instruction::new("ret"));
            function.connect(block, function.exit_block);
            Ok(true)
        }

        NodeKind::ExpressionStatement => {
            let ty = type_of(ast, ast.child(node, 0), program, scope)?;
            function.push_instruction(block, Instruction::new(format!("eval {}", ty)));
            Ok(true)
        }

        NodeKind::EmptyStatement => Ok(true),

        other => {
            log::warn!("can't compile {:?}: unimplemented", other);
            Ok(false)
        }
    }
}

/// Build the variable a declaration node introduces.
pub(crate) fn declared_variable(
    ast: &Ast,
    declaration: NodeId,
    program: &Program,
) -> Result<Variable, SemError> {
    let name = ast.token(ast.child(declaration, 0)).lexeme.clone();
    let ty = to_type(
        ast,
        ast.child(declaration, 1),
        program,
        program.global_namespace(),
    )?;
    Ok(Variable::new(name, ty))
}
