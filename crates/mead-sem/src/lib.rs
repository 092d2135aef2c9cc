//! mead-sem - The semantic core of the Mead compiler.
//!
//! This crate owns everything that gives the parsed tree meaning: the type
//! model, the namespace and scope trees, functions with their basic blocks,
//! the per-node semantic queries (`type_of`, `is_constant`, statement
//! compilation), and the top-level compiler dispatcher.

mod compile;
mod compiler;
mod function;
mod namespace;
mod program;
mod scope;
mod typeck;
mod types;

#[cfg(test)]
mod edge_cases;

pub use compile::compile_statement;
pub use compiler::{CompileError, Compiler};
pub use function::{BasicBlock, BlockId, Function, Instruction};
pub use namespace::{ClassDef, FunctionSig, NamespaceId, Namespaces, QualifiedName, TypeSymbol};
pub use program::Program;
pub use scope::{ScopeId, Scopes, Variable};
pub use typeck::{is_constant, to_type, type_of};
pub use types::{Type, TypeKind};

use thiserror::Error;

/// Errors surfaced by semantic queries and compilation.
#[derive(Clone, Debug, Error)]
pub enum SemError {
    /// A name could not be resolved to a variable, type, function or field.
    #[error("failed to resolve \"{0}\"")]
    Resolution(String),

    /// A value of one type was required to be another, incompatible type.
    #[error("cannot convert {from} to {to}")]
    Type { from: Type, to: Type },

    /// A second definition under an already-bound name.
    #[error("duplicate definition of \"{0}\"")]
    Duplicate(String),

    /// A semantic query was asked of a node kind that does not support it.
    #[error("{0} does not support this operation")]
    Unsupported(String),
}
