//! Lexical scopes: the run-time visibility of variables at a source point.

use std::fmt;

use indexmap::IndexMap;
use mead_util::{define_idx, IndexVec};

use crate::types::Type;

define_idx!(
    /// Index of a scope in the [`Scopes`] arena.
    ScopeId
);

/// A declared variable.
#[derive(Clone, Debug)]
pub struct Variable {
    pub name: String,
    pub ty: Type,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

#[derive(Clone, Debug)]
struct ScopeData {
    variables: IndexMap<String, Variable>,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    depth: i32,
}

/// The scope tree.
///
/// A program-wide sentinel scope sits at depth −1; the global scope is its
/// only child at depth 0, and every `{ ... }` adds one level below that.
#[derive(Clone, Debug)]
pub struct Scopes {
    arena: IndexVec<ScopeId, ScopeData>,
    sentinel: ScopeId,
    global: ScopeId,
}

impl Scopes {
    pub fn new() -> Self {
        let mut arena = IndexVec::new();
        let sentinel = arena.push(ScopeData {
            variables: IndexMap::new(),
            parent: None,
            children: Vec::new(),
            depth: -1,
        });
        let global = arena.push(ScopeData {
            variables: IndexMap::new(),
            parent: Some(sentinel),
            children: Vec::new(),
            depth: 0,
        });
        arena[sentinel].children.push(global);
        Self {
            arena,
            sentinel,
            global,
        }
    }

    pub fn sentinel(&self) -> ScopeId {
        self.sentinel
    }

    pub fn global(&self) -> ScopeId {
        self.global
    }

    pub fn depth(&self, id: ScopeId) -> i32 {
        self.arena[id].depth
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.arena[id].parent
    }

    /// Open a child scope one level deeper.
    pub fn add_scope(&mut self, parent: ScopeId) -> ScopeId {
        let depth = self.arena[parent].depth + 1;
        let child = self.arena.push(ScopeData {
            variables: IndexMap::new(),
            parent: Some(parent),
            children: Vec::new(),
            depth,
        });
        self.arena[parent].children.push(child);
        child
    }

    /// Bind a variable in exactly this scope.
    ///
    /// Returns false, without overwriting, if the name is already bound
    /// here.
    pub fn insert_variable(&mut self, id: ScopeId, variable: Variable) -> bool {
        let variables = &mut self.arena[id].variables;
        if variables.contains_key(&variable.name) {
            return false;
        }
        variables.insert(variable.name.clone(), variable);
        true
    }

    /// Resolve a variable, walking the parent chain.
    pub fn get_variable(&self, id: ScopeId, name: &str) -> Option<&Variable> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if let Some(variable) = self.arena[current].variables.get(name) {
                return Some(variable);
            }
            cursor = self.arena[current].parent;
        }
        None
    }

    /// The variables bound in exactly this scope, in insertion order.
    pub fn variables(&self, id: ScopeId) -> impl Iterator<Item = &Variable> {
        self.arena[id].variables.values()
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}
