// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide type table.
//!
//! Interns [`TypeDescriptor`]s by name so that each runtime type has exactly
//! one descriptor and [`Type`] handles can be compared by identity.

use std::sync::OnceLock;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::builtin::Builtins;
use super::descriptor::{Type, TypeDescriptor, TypeKind};
use crate::error::TypeError;

static TABLE: OnceLock<TypeTable> = OnceLock::new();

/// Name-keyed interner for runtime types.
pub struct TypeTable {
    types: DashMap<String, Type>,
    builtins: Builtins,
}

impl TypeTable {
    /// The process-wide table, created with the built-in types on first use.
    pub fn global() -> &'static TypeTable {
        TABLE.get_or_init(TypeTable::bootstrap)
    }

    fn bootstrap() -> Self {
        let types = DashMap::new();
        let builtins = Builtins::install(|descriptor| intern(&types, descriptor));
        log::debug!("[types] bootstrapped {} built-in types", types.len());
        Self { types, builtins }
    }

    #[inline]
    pub(crate) fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    /// Define a user type.
    ///
    /// The first definition of a name wins. Defining the same shape again
    /// returns the existing handle; a different shape is a conflict.
    pub fn define(&self, builder: TypeBuilder) -> Result<Type, TypeError> {
        let descriptor = builder.into_descriptor(&self.builtins)?;
        match self.types.entry(descriptor.name.clone()) {
            Entry::Occupied(existing) => {
                let ty = *existing.get();
                if *ty.descriptor() == descriptor {
                    Ok(ty)
                } else {
                    Err(TypeError::Conflict {
                        name: descriptor.name,
                    })
                }
            }
            Entry::Vacant(slot) => {
                let ty = Type::leak(descriptor);
                slot.insert(ty);
                log::debug!("[types] defined '{}'", ty);
                Ok(ty)
            }
        }
    }

    /// Canonical array type `<element>[]`, created on first request.
    pub fn array_of(&self, element: Type) -> Type {
        let name = format!("{}[]", element.name());
        if let Some(existing) = self.types.get(&name) {
            return *existing;
        }
        let ty = *self
            .types
            .entry(name.clone())
            .or_insert_with(|| Type::leak(TypeDescriptor::new(name, TypeKind::Array { element })))
            .value();
        ty
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Type> {
        self.types.get(name).map(|entry| *entry.value())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Pass-through relationship used by the identity factory.
    ///
    /// Plain assignability, plus the case where `source` is an interface that
    /// the class `target` implements directly.
    #[must_use]
    pub fn is_compatible(source: Type, target: Type) -> bool {
        if target.is_assignable_from(source) {
            return true;
        }
        source.is_interface_like()
            && !target.is_interface_like()
            && target.interfaces().contains(&source)
    }
}

fn intern(types: &DashMap<String, Type>, descriptor: TypeDescriptor) -> Type {
    let name = descriptor.name.clone();
    let ty = Type::leak(descriptor);
    types.insert(name, ty);
    ty
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Class { is_abstract: bool },
    Interface,
    Enum,
}

/// Builder for user-defined types.
///
/// ```
/// use coerce::{builtin, TypeBuilder};
///
/// let shape = TypeBuilder::interface("doc.Shape").define().unwrap();
/// let circle = TypeBuilder::class("doc.Circle")
///     .implements(shape)
///     .define()
///     .unwrap();
///
/// assert!(shape.is_assignable_from(circle));
/// assert!(builtin::object().is_assignable_from(circle));
/// ```
#[derive(Debug, Clone)]
pub struct TypeBuilder {
    name: String,
    shape: Shape,
    variants: Vec<String>,
    superclass: Option<Type>,
    interfaces: Vec<Type>,
}

impl TypeBuilder {
    fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            variants: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, Shape::Class { is_abstract: false })
    }

    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self::new(name, Shape::Class { is_abstract: true })
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, Shape::Interface)
    }

    /// Enumeration; its superclass is always the built-in `Enum`.
    pub fn enumeration<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = Self::new(name, Shape::Enum);
        builder.variants = variants.into_iter().map(Into::into).collect();
        builder
    }

    #[must_use]
    pub fn extends(mut self, superclass: Type) -> Self {
        self.superclass = Some(superclass);
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: Type) -> Self {
        if !self.interfaces.contains(&interface) {
            self.interfaces.push(interface);
        }
        self
    }

    /// Define in the global [`TypeTable`].
    pub fn define(self) -> Result<Type, TypeError> {
        TypeTable::global().define(self)
    }

    fn into_descriptor(self, builtins: &Builtins) -> Result<TypeDescriptor, TypeError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(TypeError::EmptyName);
        }

        let invalid = |supertype: Type, reason: &'static str| TypeError::InvalidSupertype {
            name: name.clone(),
            supertype: supertype.name().to_string(),
            reason,
        };

        if let Some(interface) = self
            .interfaces
            .iter()
            .copied()
            .find(|ty| !ty.is_interface_like())
        {
            return Err(invalid(interface, "only interfaces can be implemented"));
        }

        let (kind, superclass) = match self.shape {
            Shape::Class { is_abstract } => {
                if let Some(parent) = self.superclass {
                    if !matches!(parent.kind(), TypeKind::Class { .. }) {
                        return Err(invalid(parent, "classes can only extend classes"));
                    }
                }
                (TypeKind::Class { is_abstract }, self.superclass)
            }
            Shape::Interface => {
                if let Some(parent) = self.superclass {
                    return Err(invalid(parent, "interfaces extend through `implements`"));
                }
                (TypeKind::Interface, None)
            }
            Shape::Enum => {
                if let Some(parent) = self.superclass {
                    return Err(invalid(parent, "enumerations always extend Enum"));
                }
                (
                    TypeKind::Enum {
                        variants: self.variants,
                    },
                    Some(builtins.enumeration),
                )
            }
        };

        Ok(TypeDescriptor {
            name,
            kind,
            superclass,
            interfaces: self.interfaces,
            top: false,
        })
    }
}
