//! The program: owner of the global namespace and the global scope.

use crate::namespace::{NamespaceId, Namespaces, TypeSymbol};
use crate::scope::{ScopeId, Scopes};
use crate::types::Type;

/// Top-level ownership for one compilation.
///
/// Construction creates the namespace tree with the primitive types bound in
/// the root namespace, and the scope tree with its global scope.
#[derive(Clone, Debug)]
pub struct Program {
    pub namespaces: Namespaces,
    pub scopes: Scopes,
}

impl Program {
    pub fn new() -> Self {
        let mut namespaces = Namespaces::new();
        let root = namespaces.root();

        for bits in [8u8, 16, 32, 64] {
            for signed in [true, false] {
                let ty = Type::int(bits, signed);
                namespaces.insert_type(root, &ty.to_string(), TypeSymbol::Primitive(ty.clone()));
            }
        }
        namespaces.insert_type(root, "void", TypeSymbol::Primitive(Type::void()));

        Self {
            namespaces,
            scopes: Scopes::new(),
        }
    }

    pub fn global_namespace(&self) -> NamespaceId {
        self.namespaces.root()
    }

    pub fn global_scope(&self) -> ScopeId {
        self.scopes.global()
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}
