// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in converter catalog.
//!
//! Each submodule is a [`ConverterLoader`]; [`load_builtin`] runs all of them.

pub mod boolean;
pub mod collection;
pub mod enums;
pub mod net;
pub mod number;

pub use boolean::BooleanConverters;
pub use collection::{
    ArrayToListFactory, ArrayToSetFactory, CollectionConverters, CollectionToArrayFactory,
};
pub use enums::{EnumConverters, StringToEnumFactory};
pub use net::NetConverters;
pub use number::NumberConverters;

use crate::loader::ConverterLoader;
use crate::registry::Registry;

/// Every built-in loader, in load order.
#[must_use]
pub fn builtin_loaders() -> [&'static dyn ConverterLoader; 5] {
    [
        &BooleanConverters,
        &NumberConverters,
        &CollectionConverters,
        &EnumConverters,
        &NetConverters,
    ]
}

/// Load the whole built-in catalog into `registry`.
pub fn load_builtin(registry: &Registry) {
    registry.load_all(&builtin_loaders());
    log::debug!(
        "[loader] built-in catalog loaded: {} handlers, {} factories",
        registry.handler_count(),
        registry.factory_count()
    );
}
