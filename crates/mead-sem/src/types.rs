//! The type model.
//!
//! Types are plain values: copying one yields an independent instance, and
//! `set_const` only ever mutates the copy at hand. An l-value reference
//! never wraps another l-value reference; construction collapses the inner
//! one.

use std::fmt;

use crate::namespace::NamespaceId;

/// The structural part of a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    /// Fixed-width integer, 8 to 64 bits, signed or unsigned
    Int { bits: u8, signed: bool },
    Void,
    Pointer(Box<Type>),
    LReference(Box<Type>),
    /// A user-defined type owned by a namespace
    Class { name: String, namespace: NamespaceId },
    /// The error type; produced when no valid type exists
    Invalid,
}

/// A type together with its const qualification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Type {
    pub kind: TypeKind,
    is_const: bool,
}

impl Type {
    /// An integer type.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not one of 8, 16, 32, 64.
    pub fn int(bits: u8, signed: bool) -> Self {
        assert!(matches!(bits, 8 | 16 | 32 | 64), "bad integer width {bits}");
        Self {
            kind: TypeKind::Int { bits, signed },
            is_const: false,
        }
    }

    pub fn void() -> Self {
        Self {
            kind: TypeKind::Void,
            is_const: false,
        }
    }

    /// A pointer to `subtype`.
    pub fn pointer(subtype: Type) -> Self {
        Self {
            kind: TypeKind::Pointer(Box::new(subtype)),
            is_const: false,
        }
    }

    /// An l-value reference to `subtype`.
    ///
    /// References to references collapse: wrapping an `LReference` yields a
    /// reference to the inner referent.
    pub fn lreference(subtype: Type) -> Self {
        let referent = match subtype.kind {
            TypeKind::LReference(inner) => *inner,
            _ => subtype,
        };
        Self {
            kind: TypeKind::LReference(Box::new(referent)),
            is_const: false,
        }
    }

    pub fn class(name: impl Into<String>, namespace: NamespaceId) -> Self {
        Self {
            kind: TypeKind::Class {
                name: name.into(),
                namespace,
            },
            is_const: false,
        }
    }

    pub fn invalid() -> Self {
        Self {
            kind: TypeKind::Invalid,
            is_const: false,
        }
    }

    pub fn is_const(&self) -> bool {
        self.is_const
    }

    /// Set the const qualification of this instance.
    pub fn set_const(&mut self, is_const: bool) {
        self.is_const = is_const;
    }

    /// A const-qualified copy.
    pub fn as_const(&self) -> Self {
        let mut copy = self.clone();
        copy.set_const(true);
        copy
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.kind, TypeKind::Invalid)
    }

    /// The referent for l-value references; the type itself otherwise.
    pub fn unwrap_lreference(&self) -> &Type {
        match &self.kind {
            TypeKind::LReference(referent) => referent,
            _ => self,
        }
    }

    /// Dereferencing a pointer yields an l-value reference to the pointee;
    /// other types cannot be dereferenced.
    pub fn dereference(&self) -> Option<Type> {
        match &self.kind {
            TypeKind::Pointer(pointee) => Some(Type::lreference((**pointee).clone())),
            _ => None,
        }
    }

    /// Structural equality, optionally modulo const qualification at every
    /// level.
    pub fn is_exactly_equivalent(&self, other: &Type, ignore_const: bool) -> bool {
        if !ignore_const && self.is_const != other.is_const {
            return false;
        }
        match (&self.kind, &other.kind) {
            (
                TypeKind::Int { bits: a, signed: sa },
                TypeKind::Int { bits: b, signed: sb },
            ) => a == b && sa == sb,
            (TypeKind::Void, TypeKind::Void) => true,
            (TypeKind::Pointer(a), TypeKind::Pointer(b)) => {
                a.is_exactly_equivalent(b, ignore_const)
            }
            (TypeKind::LReference(a), TypeKind::LReference(b)) => {
                a.is_exactly_equivalent(b, ignore_const)
            }
            (
                TypeKind::Class { name: a, namespace: na },
                TypeKind::Class { name: b, namespace: nb },
            ) => a == b && na == nb,
            (TypeKind::Invalid, TypeKind::Invalid) => true,
            _ => false,
        }
    }

    /// Implicit compatibility.
    ///
    /// Reflexive, and additionally a pointer converts to a pointer whose
    /// pointee only gains const; the same applies to l-value references and
    /// their referents.
    pub fn is_convertible_to(&self, target: &Type) -> bool {
        if self.is_exactly_equivalent(target, true) {
            return true;
        }
        match (&self.kind, &target.kind) {
            (TypeKind::Pointer(from), TypeKind::Pointer(to))
            | (TypeKind::LReference(from), TypeKind::LReference(to)) => {
                from.is_exactly_equivalent(to, true) && (!from.is_const() || to.is_const())
            }
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Int { bits, signed } => {
                write!(f, "{}{}", if *signed { 'i' } else { 'u' }, bits)?;
            }
            TypeKind::Void => write!(f, "void")?,
            TypeKind::Pointer(pointee) => write!(f, "{}*", pointee)?,
            TypeKind::LReference(referent) => write!(f, "{}&", referent)?,
            TypeKind::Class { name, .. } => write!(f, "{}", name)?,
            TypeKind::Invalid => write!(f, "<invalid>")?,
        }
        if self.is_const {
            write!(f, " const")?;
        }
        Ok(())
    }
}
