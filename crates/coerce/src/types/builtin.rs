// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Well-known types present in every process.

use super::descriptor::{PrimitiveKind, Type, TypeDescriptor, TypeKind};
use super::table::TypeTable;

pub(crate) struct Builtins {
    pub(crate) object: Type,
    pub(crate) number: Type,
    pub(crate) boolean: Type,
    pub(crate) byte: Type,
    pub(crate) short: Type,
    pub(crate) int: Type,
    pub(crate) long: Type,
    pub(crate) float: Type,
    pub(crate) double: Type,
    pub(crate) char: Type,
    pub(crate) string: Type,
    pub(crate) collection: Type,
    pub(crate) list: Type,
    pub(crate) set: Type,
    pub(crate) map: Type,
    pub(crate) array_list: Type,
    pub(crate) linked_list: Type,
    pub(crate) hash_set: Type,
    pub(crate) hash_map: Type,
    pub(crate) enumeration: Type,
    pub(crate) ip_addr: Type,
    pub(crate) socket_addr: Type,
}

impl Builtins {
    pub(crate) fn install(mut intern: impl FnMut(TypeDescriptor) -> Type) -> Self {
        let mut top = TypeDescriptor::new("Object", TypeKind::Class { is_abstract: false });
        top.top = true;
        let object = intern(top);

        let number = intern(TypeDescriptor::new(
            "Number",
            TypeKind::Class { is_abstract: true },
        ));
        let mut primitive = |kind: PrimitiveKind| {
            let descriptor = TypeDescriptor::new(kind.name(), TypeKind::Primitive(kind));
            if kind.is_numeric() {
                intern(descriptor.with_superclass(number))
            } else {
                intern(descriptor)
            }
        };
        let boolean = primitive(PrimitiveKind::Bool);
        let byte = primitive(PrimitiveKind::I8);
        let short = primitive(PrimitiveKind::I16);
        let int = primitive(PrimitiveKind::I32);
        let long = primitive(PrimitiveKind::I64);
        let float = primitive(PrimitiveKind::F32);
        let double = primitive(PrimitiveKind::F64);
        let char = primitive(PrimitiveKind::Char);

        let class = |name: &str| TypeDescriptor::new(name, TypeKind::Class { is_abstract: false });
        let interface = |name: &str| TypeDescriptor::new(name, TypeKind::Interface);

        let string = intern(class("String"));
        let collection = intern(interface("Collection"));
        let list = intern(interface("List").with_interface(collection));
        let set = intern(interface("Set").with_interface(collection));
        let map = intern(interface("Map"));
        let array_list = intern(class("ArrayList").with_interface(list));
        let linked_list = intern(class("LinkedList").with_interface(list));
        let hash_set = intern(class("HashSet").with_interface(set));
        let hash_map = intern(class("HashMap").with_interface(map));
        let enumeration = intern(TypeDescriptor::new(
            "Enum",
            TypeKind::Class { is_abstract: true },
        ));
        let ip_addr = intern(class("IpAddr"));
        let socket_addr = intern(class("SocketAddr"));

        Self {
            object,
            number,
            boolean,
            byte,
            short,
            int,
            long,
            float,
            double,
            char,
            string,
            collection,
            list,
            set,
            map,
            array_list,
            linked_list,
            hash_set,
            hash_map,
            enumeration,
            ip_addr,
            socket_addr,
        }
    }
}

macro_rules! builtin_accessors {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[must_use]
            #[inline]
            pub fn $name() -> Type {
                TypeTable::global().builtins().$name
            }
        )*
    };
}

builtin_accessors! {
    /// The universal top type; every type is assignable to it.
    object,
    /// Abstract superclass of every numeric primitive.
    number,
    boolean,
    byte,
    short,
    int,
    long,
    float,
    double,
    char,
    string,
    collection,
    list,
    set,
    map,
    array_list,
    linked_list,
    hash_set,
    hash_map,
    /// Abstract superclass of every enumeration.
    enumeration,
    ip_addr,
    socket_addr,
}
