//! The compiler dispatcher.
//!
//! Walks the parser's top-level nodes, routing variable nodes to global
//! variable compilation and function nodes to function compilation, and
//! aggregates their textual output. The first semantic failure stops the
//! offending item and is reported with the node it arose from.

use std::fmt;

use mead_par::{Ast, NodeId, NodeKind};
use thiserror::Error;

use crate::compile::compile_statement;
use crate::function::Function;
use crate::namespace::FunctionSig;
use crate::program::Program;
use crate::scope::Variable;
use crate::typeck::{is_assignable, to_type, type_of};
use crate::SemError;

/// A semantic failure attributed to the top-level node it arose from.
#[derive(Clone, Debug, Error)]
pub struct CompileError {
    pub error: SemError,
    pub node: NodeId,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Compiles a parsed program.
pub struct Compiler {
    pub program: Program,
    /// Functions compiled so far; they live until the compiler is dropped.
    pub functions: Vec<Function>,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            program: Program::new(),
            functions: Vec::new(),
        }
    }

    /// Compile every top-level node, aggregating the textual output.
    pub fn compile(&mut self, ast: &Ast, nodes: &[NodeId]) -> Result<String, CompileError> {
        let mut out = String::new();

        for &node in nodes {
            let result = match ast.kind(node) {
                NodeKind::VariableDeclaration | NodeKind::VariableDefinition => {
                    self.compile_global_variable(ast, node)
                }
                NodeKind::FunctionDeclaration | NodeKind::FunctionDefinition => {
                    self.compile_function(ast, node)
                }
                other => {
                    log::warn!("unhandled top-level node {:?}", other);
                    continue;
                }
            };

            match result {
                Ok(text) => {
                    out.push_str(&text);
                    out.push('\n');
                }
                Err(error) => return Err(CompileError { error, node }),
            }
        }

        Ok(out)
    }

    fn compile_global_variable(&mut self, ast: &Ast, node: NodeId) -> Result<String, SemError> {
        let is_definition = ast.kind(node) == NodeKind::VariableDefinition;
        let declaration = if is_definition {
            ast.child(node, 0)
        } else {
            node
        };

        let name = ast.token(ast.child(declaration, 0)).lexeme.clone();
        let namespace = self.program.global_namespace();
        let stated = to_type(ast, ast.child(declaration, 1), &self.program, namespace)?;

        if is_definition {
            let initializer = ast.child(node, 1);
            let scope = self.program.global_scope();
            let initializer_type = type_of(ast, initializer, &self.program, scope)?;
            if !is_assignable(&initializer_type, &stated) {
                return Err(SemError::Type {
                    from: initializer_type,
                    to: stated,
                });
            }
        }

        let variable = Variable::new(name.clone(), stated);
        let rendered = variable.to_string();
        let scope = self.program.global_scope();
        if !self.program.scopes.insert_variable(scope, variable) {
            return Err(SemError::Duplicate(name));
        }

        Ok(format!("[global. {}]", rendered))
    }

    fn compile_function(&mut self, ast: &Ast, node: NodeId) -> Result<String, SemError> {
        let is_definition = ast.kind(node) == NodeKind::FunctionDefinition;
        let prototype = ast.child(node, 0);
        let children = ast.children(prototype).to_vec();

        let name = ast.token(children[0]).lexeme.clone();
        let namespace = self.program.global_namespace();
        let return_type = to_type(ast, children[1], &self.program, namespace)?;

        let parameters = &children[2..];
        let mut argument_types = Vec::with_capacity(parameters.len());
        for &parameter in parameters {
            argument_types.push(to_type(
                ast,
                ast.child(parameter, 1),
                &self.program,
                namespace,
            )?);
        }

        let signature = FunctionSig {
            name: name.clone(),
            return_type: return_type.clone(),
            argument_types: argument_types.clone(),
        };
        let rendered = signature.to_string();
        if !self.program.namespaces.insert_function(namespace, signature) {
            return Err(SemError::Duplicate(name));
        }

        if is_definition {
            let scope = self.program.scopes.add_scope(self.program.global_scope());
            let mut function = Function::new(name.clone(), return_type, argument_types.clone(), scope);

            for (&parameter, ty) in parameters.iter().zip(&argument_types) {
                let parameter_name = ast.token(ast.child(parameter, 0)).lexeme.clone();
                let variable = Variable::new(parameter_name.clone(), ty.clone());
                if !self.program.scopes.insert_variable(scope, variable) {
                    return Err(SemError::Duplicate(parameter_name));
                }
            }

            let body = ast.child(node, 1);
            let entry = function.entry_block;
            let compiled = compile_statement(
                ast,
                body,
                &mut self.program,
                &mut function,
                scope,
                entry,
            )?;
            if !compiled {
                return Err(SemError::Unsupported(format!("body of function {}", name)));
            }

            self.functions.push(function);
        }

        Ok(format!("[function. {}]", rendered))
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
