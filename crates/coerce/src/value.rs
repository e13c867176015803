// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-erased values flowing through the dispatcher.

use std::any::Any;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, OnceLock};

use crate::error::ConversionError;
use crate::types::{builtin, Type, TypeTable};

/// A runtime-typed, immutable value.
///
/// Cloning is cheap: the payload is shared. [`Value::ptr_eq`] tells whether two
/// values are the very same instance.
#[derive(Clone)]
pub struct Value {
    ty: Type,
    payload: Arc<dyn Any + Send + Sync>,
}

impl Value {
    /// Tag `payload` with an explicit runtime type.
    pub fn new<T: Any + Send + Sync>(ty: Type, payload: T) -> Self {
        Self {
            ty,
            payload: Arc::new(payload),
        }
    }

    /// Tag `payload` with the type its Rust type maps to.
    pub fn of<T: Typed>(payload: T) -> Self {
        Self::new(T::static_type(), payload)
    }

    /// Collection value holding `items`, tagged with a collection type.
    pub fn collection(ty: Type, items: Vec<Value>) -> Self {
        Self::new(ty, items)
    }

    /// Array of a reference element type, holding `items`.
    ///
    /// Primitive and `String` arrays carry a `Vec<E>` instead; build those with
    /// [`Value::of`].
    pub fn array(element: Type, items: Vec<Value>) -> Self {
        Self::new(TypeTable::global().array_of(element), items)
    }

    /// Enum constant `name` of enumeration `ty`.
    pub fn enum_constant(ty: Type, name: &str) -> Result<Self, ConversionError> {
        let variants = ty.enum_variants().ok_or_else(|| {
            ConversionError::unsupported(format!("{} is not an enumeration", ty))
        })?;
        let ordinal = variants
            .iter()
            .position(|variant| variant == name)
            .ok_or_else(|| {
                ConversionError::malformed(format!("'{}' is not a constant of {}", name, ty))
            })?;
        Ok(Self::new(ty, EnumValue::new(name, ordinal)))
    }

    #[must_use]
    #[inline]
    pub fn type_of(&self) -> Type {
        self.ty
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Checked access to the payload.
    pub fn get<T: Any>(&self) -> Result<&T, ConversionError> {
        self.downcast_ref::<T>().ok_or_else(|| {
            ConversionError::unexpected_payload(format!(
                "value of type {} does not carry a {}",
                self.ty,
                std::any::type_name::<T>()
            ))
        })
    }

    /// Items of a collection or reference-array value.
    #[must_use]
    pub fn items(&self) -> Option<&[Value]> {
        self.downcast_ref::<Vec<Value>>().map(Vec::as_slice)
    }

    /// Same runtime type and same shared payload instance.
    #[must_use]
    pub fn ptr_eq(a: &Value, b: &Value) -> bool {
        a.ty == b.ty && Arc::ptr_eq(&a.payload, &b.payload)
    }

    /// Address of the shared payload; equal for values that are `ptr_eq`.
    #[inline]
    pub(crate) fn instance_addr(&self) -> usize {
        Arc::as_ptr(&self.payload).cast::<()>() as usize
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value").field("type", &self.ty).finish_non_exhaustive()
    }
}

/// Constant of a runtime enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    name: Arc<str>,
    ordinal: usize,
}

impl EnumValue {
    pub fn new(name: &str, ordinal: usize) -> Self {
        Self {
            name: Arc::from(name),
            ordinal,
        }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

/// Rust types with a fixed runtime type.
pub trait Typed: Any + Send + Sync {
    fn static_type() -> Type;
}

macro_rules! impl_typed {
    ($($rust:ty => $builtin:ident),* $(,)?) => {
        $(
            impl Typed for $rust {
                #[inline]
                fn static_type() -> Type {
                    builtin::$builtin()
                }
            }
        )*
    };
}

impl_typed! {
    bool => boolean,
    i8 => byte,
    i16 => short,
    i32 => int,
    i64 => long,
    f32 => float,
    f64 => double,
    char => char,
    String => string,
    IpAddr => ip_addr,
    SocketAddr => socket_addr,
}

macro_rules! impl_typed_array {
    ($($element:ty),* $(,)?) => {
        $(
            impl Typed for Vec<$element> {
                fn static_type() -> Type {
                    static ARRAY: OnceLock<Type> = OnceLock::new();
                    *ARRAY.get_or_init(|| {
                        TypeTable::global().array_of(<$element as Typed>::static_type())
                    })
                }
            }
        )*
    };
}

impl_typed_array!(bool, i8, i16, i32, i64, f32, f64, char, String);

impl Typed for Vec<Value> {
    #[inline]
    fn static_type() -> Type {
        builtin::array_list()
    }
}
