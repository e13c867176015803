// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime conversion dispatch.

use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use super::table::TypeTable;

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
}

impl PrimitiveKind {
    /// Canonical type name of the primitive.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::I8 => "byte",
            Self::I16 => "short",
            Self::I32 => "int",
            Self::I64 => "long",
            Self::F32 => "float",
            Self::F64 => "double",
            Self::Char => "char",
        }
    }

    #[must_use]
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Bool | Self::Char)
    }

    #[must_use]
    pub fn is_integral(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Concrete or abstract class.
    Class { is_abstract: bool },
    /// Interface; only interfaces may appear in an `implements` list.
    Interface,
    /// Primitive value type.
    Primitive(PrimitiveKind),
    /// Array of `element`.
    Array { element: Type },
    /// Enumeration with its constants in declaration order.
    Enum { variants: Vec<String> },
}

/// A complete type descriptor.
///
/// Descriptors are interned by [`TypeTable`] and live for the rest of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) superclass: Option<Type>,
    pub(crate) interfaces: Vec<Type>,
    pub(crate) top: bool,
}

impl TypeDescriptor {
    pub(crate) fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            superclass: None,
            interfaces: Vec::new(),
            top: false,
        }
    }

    pub(crate) fn with_superclass(mut self, superclass: Type) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub(crate) fn with_interface(mut self, interface: Type) -> Self {
        self.interfaces.push(interface);
        self
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Direct superclass, if one was declared.
    #[must_use]
    #[inline]
    pub fn superclass(&self) -> Option<Type> {
        self.superclass
    }

    /// Interfaces this type implements (or extends, for interfaces) directly.
    #[must_use]
    #[inline]
    pub fn interfaces(&self) -> &[Type] {
        &self.interfaces
    }

    /// True for the universal top type `Object`.
    #[must_use]
    #[inline]
    pub fn is_top(&self) -> bool {
        self.top
    }

    #[must_use]
    pub fn is_interface_like(&self) -> bool {
        matches!(self.kind, TypeKind::Interface)
    }

    /// Interfaces and abstract classes cannot be instantiated directly.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Interface | TypeKind::Class { is_abstract: true }
        )
    }

    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.kind {
            TypeKind::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array { .. })
    }

    /// Element type if this is an array.
    #[must_use]
    pub fn element_type(&self) -> Option<Type> {
        match self.kind {
            TypeKind::Array { element } => Some(element),
            _ => None,
        }
    }

    /// Enum constants if this is an enumeration.
    #[must_use]
    pub fn enum_variants(&self) -> Option<&[String]> {
        match &self.kind {
            TypeKind::Enum { variants } => Some(variants),
            _ => None,
        }
    }

    /// Whether a value of type `other` may be used where `self` is expected.
    ///
    /// Holds when `other` is `self`, when `self` is `Object`, or when `self`
    /// appears in the supertype closure of `other`. Arrays of reference types
    /// are covariant in their element type.
    #[must_use]
    pub fn is_assignable_from(&self, other: Type) -> bool {
        if std::ptr::eq(self, other.0) || self.top {
            return true;
        }
        if let (TypeKind::Array { element: mine }, TypeKind::Array { element: theirs }) =
            (&self.kind, &other.kind)
        {
            return !mine.is_primitive()
                && !theirs.is_primitive()
                && mine.is_assignable_from(*theirs);
        }
        other
            .supertype_chain()
            .iter()
            .any(|ty| std::ptr::eq(self, ty.0))
    }

    /// Breadth-first, de-duplicated supertype closure, always ending with `Object`.
    ///
    /// Empty for `Object` itself.
    #[must_use]
    pub fn supertype_chain(&self) -> Vec<Type> {
        let mut chain: Vec<Type> = Vec::new();
        if self.top {
            return chain;
        }

        let mut queue: VecDeque<Type> = self.direct_supertypes().collect();
        while let Some(ty) = queue.pop_front() {
            if ty.top || chain.contains(&ty) {
                continue;
            }
            chain.push(ty);
            queue.extend(ty.direct_supertypes());
        }

        chain.push(TypeTable::global().builtins().object);
        chain
    }

    fn direct_supertypes(&self) -> impl Iterator<Item = Type> + '_ {
        self.superclass
            .into_iter()
            .chain(self.interfaces.iter().copied())
    }
}

/// Copyable handle to an interned [`TypeDescriptor`].
///
/// Equality and hashing are by descriptor identity, never by name.
#[derive(Clone, Copy)]
pub struct Type(pub(crate) &'static TypeDescriptor);

impl Type {
    /// Intern a descriptor for the rest of the process.
    pub(crate) fn leak(descriptor: TypeDescriptor) -> Self {
        Type(Box::leak(Box::new(descriptor)))
    }

    #[must_use]
    #[inline]
    pub fn descriptor(self) -> &'static TypeDescriptor {
        self.0
    }

    #[must_use]
    #[inline]
    pub fn name(self) -> &'static str {
        &self.0.name
    }
}

impl Deref for Type {
    type Target = TypeDescriptor;

    #[inline]
    fn deref(&self) -> &TypeDescriptor {
        self.0
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.0, state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self.0.name)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}
