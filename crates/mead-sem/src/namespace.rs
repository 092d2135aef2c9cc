//! Namespaces: the compile-time identity of qualified names.
//!
//! A namespace owns types, function signatures and sub-namespaces. The
//! tree lives in one arena; parent links are indices, so upward search is a
//! simple walk. Unqualified type lookup searches the chain from the current
//! namespace to the root.

use std::fmt;

use indexmap::IndexMap;
use mead_util::{define_idx, IndexVec};

use crate::types::Type;

define_idx!(
    /// Index of a namespace in the [`Namespaces`] arena.
    NamespaceId
);

/// A `::`-separated name: leading namespace path plus the final name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName {
    pub namespaces: Vec<String>,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespaces: Vec<String>, name: impl Into<String>) -> Self {
        Self {
            namespaces,
            name: name.into(),
        }
    }

    /// A name with no namespace path.
    pub fn plain(name: impl Into<String>) -> Self {
        Self::new(Vec::new(), name)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.namespaces {
            write!(f, "{}::", piece)?;
        }
        write!(f, "{}", self.name)
    }
}

/// A class definition: the named fields, in declaration order.
#[derive(Clone, Debug)]
pub struct ClassDef {
    pub name: String,
    pub fields: Vec<(String, Type)>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(name: impl Into<String>, fields: Vec<(String, Type)>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Look up a field's type by name.
    pub fn field(&self, name: &str) -> Option<&Type> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, ty)| ty)
    }
}

/// A function signature registered in a namespace.
#[derive(Clone, Debug)]
pub struct FunctionSig {
    pub name: String,
    pub return_type: Type,
    pub argument_types: Vec<Type>,
}

impl fmt::Display for FunctionSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, ty) in self.argument_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ty)?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}

/// A type bound in a namespace: a primitive or a class definition.
#[derive(Clone, Debug)]
pub enum TypeSymbol {
    Primitive(Type),
    Class(ClassDef),
}

#[derive(Clone, Debug)]
struct NamespaceData {
    name: String,
    parent: Option<NamespaceId>,
    types: IndexMap<String, TypeSymbol>,
    functions: IndexMap<String, FunctionSig>,
    children: IndexMap<String, NamespaceId>,
}

/// The namespace tree.
#[derive(Clone, Debug)]
pub struct Namespaces {
    arena: IndexVec<NamespaceId, NamespaceData>,
    root: NamespaceId,
}

impl Namespaces {
    /// Create a tree holding only the (anonymous) root namespace.
    pub fn new() -> Self {
        let mut arena = IndexVec::new();
        let root = arena.push(NamespaceData {
            name: String::new(),
            parent: None,
            types: IndexMap::new(),
            functions: IndexMap::new(),
            children: IndexMap::new(),
        });
        Self { arena, root }
    }

    pub fn root(&self) -> NamespaceId {
        self.root
    }

    /// The `::`-joined path of a namespace; empty for the root.
    pub fn full_name(&self, id: NamespaceId) -> String {
        let mut pieces = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let data = &self.arena[current];
            if !data.name.is_empty() {
                pieces.push(data.name.clone());
            }
            cursor = data.parent;
        }
        pieces.reverse();
        pieces.join("::")
    }

    /// Fetch a child namespace, creating it on demand when `create` is set.
    pub fn get_namespace(
        &mut self,
        parent: NamespaceId,
        name: &str,
        create: bool,
    ) -> Option<NamespaceId> {
        if let Some(&child) = self.arena[parent].children.get(name) {
            return Some(child);
        }
        if !create {
            return None;
        }
        let child = self.arena.push(NamespaceData {
            name: name.to_owned(),
            parent: Some(parent),
            types: IndexMap::new(),
            functions: IndexMap::new(),
            children: IndexMap::new(),
        });
        self.arena[parent].children.insert(name.to_owned(), child);
        Some(child)
    }

    /// Find an existing child namespace.
    pub fn child(&self, parent: NamespaceId, name: &str) -> Option<NamespaceId> {
        self.arena[parent].children.get(name).copied()
    }

    /// Bind a type symbol; returns false if the name is already bound.
    pub fn insert_type(&mut self, id: NamespaceId, name: &str, symbol: TypeSymbol) -> bool {
        let types = &mut self.arena[id].types;
        if types.contains_key(name) {
            return false;
        }
        types.insert(name.to_owned(), symbol);
        true
    }

    /// Bind a function signature; returns false if the name is already
    /// bound.
    pub fn insert_function(&mut self, id: NamespaceId, signature: FunctionSig) -> bool {
        let functions = &mut self.arena[id].functions;
        if functions.contains_key(&signature.name) {
            return false;
        }
        functions.insert(signature.name.clone(), signature);
        true
    }

    /// Resolve a simple type name, searching this namespace then its
    /// ancestors.
    pub fn lookup_type(&self, id: NamespaceId, name: &str) -> Option<(NamespaceId, &TypeSymbol)> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if let Some(symbol) = self.arena[current].types.get(name) {
                return Some((current, symbol));
            }
            cursor = self.arena[current].parent;
        }
        None
    }

    /// Resolve a qualified type name. The leading namespace piece is
    /// searched upward; the rest of the path descends.
    pub fn lookup_qualified_type(
        &self,
        id: NamespaceId,
        qualified: &QualifiedName,
    ) -> Option<(NamespaceId, &TypeSymbol)> {
        if qualified.namespaces.is_empty() {
            return self.lookup_type(id, &qualified.name);
        }

        // Find the first path piece somewhere up the chain.
        let mut cursor = Some(id);
        let head = &qualified.namespaces[0];
        let mut base = None;
        while let Some(current) = cursor {
            if let Some(child) = self.child(current, head) {
                base = Some(child);
                break;
            }
            cursor = self.arena[current].parent;
        }

        let mut namespace = base?;
        for piece in &qualified.namespaces[1..] {
            namespace = self.child(namespace, piece)?;
        }
        let symbol = self.arena[namespace].types.get(&qualified.name)?;
        Some((namespace, symbol))
    }

    /// Resolve a function by simple name, searching upward.
    pub fn lookup_function(&self, id: NamespaceId, name: &str) -> Option<&FunctionSig> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if let Some(signature) = self.arena[current].functions.get(name) {
                return Some(signature);
            }
            cursor = self.arena[current].parent;
        }
        None
    }

    /// The class definition bound under `name` in exactly this namespace.
    pub fn class_def(&self, id: NamespaceId, name: &str) -> Option<&ClassDef> {
        match self.arena[id].types.get(name) {
            Some(TypeSymbol::Class(def)) => Some(def),
            _ => None,
        }
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::new()
    }
}
