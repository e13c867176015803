// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Boolean converters.

use std::sync::Arc;

use crate::handler::FnHandler;
use crate::loader::ConverterLoader;
use crate::registry::Registry;

/// `boolean <-> int` and `boolean <-> String`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanConverters;

impl ConverterLoader for BooleanConverters {
    fn name(&self) -> &str {
        "boolean"
    }

    fn load(&self, registry: &Registry) {
        registry.register_handler(Arc::new(
            FnHandler::typed(|b: &bool| Ok(i32::from(*b))).named("BooleanToInt"),
        ));
        registry.register_handler(Arc::new(
            FnHandler::typed(|n: &i32| Ok(*n != 0)).named("IntToBoolean"),
        ));
        registry.register_handler(Arc::new(
            FnHandler::typed(|b: &bool| Ok(b.to_string())).named("BooleanToString"),
        ));
        // Anything other than "true" (any case) is false.
        registry.register_handler(Arc::new(
            FnHandler::typed(|s: &String| Ok(s.trim().eq_ignore_ascii_case("true")))
                .named("StringToBoolean"),
        ));
    }
}
