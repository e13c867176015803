// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Enumeration converters.

use std::sync::Arc;

use crate::error::ConversionError;
use crate::handler::{FnHandler, Handler, HandlerFactory};
use crate::loader::ConverterLoader;
use crate::registry::Registry;
use crate::types::{builtin, Type};
use crate::value::{EnumValue, Value};

/// `Enum -> String` for every enumeration, and `String -> <enum>` on demand.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumConverters;

impl ConverterLoader for EnumConverters {
    fn name(&self) -> &str {
        "enum"
    }

    fn load(&self, registry: &Registry) {
        // Declared on the abstract `Enum`; accepts every enumeration type.
        registry.register_handler(Arc::new(
            FnHandler::new(builtin::enumeration(), builtin::string(), |value| {
                Ok(Value::of(value.get::<EnumValue>()?.name().to_string()))
            })
            .named("EnumToString"),
        ));
        registry.register_factory(Arc::new(StringToEnumFactory));
    }
}

/// Synthesises a constant-lookup handler for each enumeration type.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringToEnumFactory;

impl HandlerFactory for StringToEnumFactory {
    fn create(&self, source: Type, target: Type) -> Option<Arc<dyn Handler>> {
        if source != builtin::string() || target.enum_variants().is_none() {
            return None;
        }
        Some(Arc::new(StringToEnum { target }))
    }

    fn name(&self) -> &str {
        "StringToEnumFactory"
    }
}

struct StringToEnum {
    target: Type,
}

impl Handler for StringToEnum {
    fn source_type(&self) -> Type {
        builtin::string()
    }

    fn target_type(&self) -> Type {
        self.target
    }

    fn apply(&self, value: &Value) -> Result<Value, ConversionError> {
        let text = value.get::<String>()?;
        Value::enum_constant(self.target, text.trim())
    }

    fn name(&self) -> &str {
        "StringToEnum"
    }
}
