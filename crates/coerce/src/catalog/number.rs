// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Numeric converters.
//!
//! Integer narrowing and float-to-integer conversions are checked; values that
//! do not fit fail with [`ConversionErrorKind::OutOfRange`](crate::ConversionErrorKind).

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ConversionError;
use crate::handler::FnHandler;
use crate::loader::ConverterLoader;
use crate::registry::Registry;
use crate::types::builtin;
use crate::value::{Typed, Value};

macro_rules! pairs {
    ($registry:expr, $register:ident; $($source:ty => [$($target:ty),*]);* $(;)?) => {
        $($( $register::<$source, $target>($registry); )*)*
    };
}

/// Conversions between numeric primitives, `Number -> String` and
/// `String -> <numeric>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberConverters;

impl ConverterLoader for NumberConverters {
    fn name(&self) -> &str {
        "number"
    }

    fn load(&self, registry: &Registry) {
        pairs!(registry, integral;
            i8 => [i16, i32, i64];
            i16 => [i8, i32, i64];
            i32 => [i8, i16, i64];
            i64 => [i8, i16, i32];
        );
        pairs!(registry, truncating;
            f32 => [i8, i16, i32, i64];
            f64 => [i8, i16, i32, i64];
        );

        registry.register_handler(Arc::new(FnHandler::typed(|v: &i8| Ok(f32::from(*v)))));
        registry.register_handler(Arc::new(FnHandler::typed(|v: &i16| Ok(f32::from(*v)))));
        registry.register_handler(Arc::new(FnHandler::typed(|v: &i32| Ok(*v as f32))));
        registry.register_handler(Arc::new(FnHandler::typed(|v: &i64| Ok(*v as f32))));
        registry.register_handler(Arc::new(FnHandler::typed(|v: &i8| Ok(f64::from(*v)))));
        registry.register_handler(Arc::new(FnHandler::typed(|v: &i16| Ok(f64::from(*v)))));
        registry.register_handler(Arc::new(FnHandler::typed(|v: &i32| Ok(f64::from(*v)))));
        registry.register_handler(Arc::new(FnHandler::typed(|v: &i64| Ok(*v as f64))));
        registry.register_handler(Arc::new(FnHandler::typed(|v: &f32| Ok(f64::from(*v)))));
        registry.register_handler(Arc::new(FnHandler::typed(|v: &f64| {
            let narrowed = *v as f32;
            if v.is_finite() && narrowed.is_infinite() {
                Err(ConversionError::out_of_range(format!("{} does not fit in float", v)))
            } else {
                Ok(narrowed)
            }
        })));

        registry.register_handler(Arc::new(
            FnHandler::new(builtin::number(), builtin::string(), number_to_string)
                .named("NumberToString"),
        ));

        parse::<i8>(registry);
        parse::<i16>(registry);
        parse::<i32>(registry);
        parse::<i64>(registry);
        parse::<f32>(registry);
        parse::<f64>(registry);
    }
}

fn integral<S, T>(registry: &Registry)
where
    S: Typed + Copy + Display,
    T: Typed + TryFrom<S>,
{
    registry.register_handler(Arc::new(FnHandler::typed(|v: &S| {
        T::try_from(*v).map_err(|_| {
            ConversionError::out_of_range(format!("{} does not fit in {}", v, T::static_type()))
        })
    })));
}

fn truncating<S, T>(registry: &Registry)
where
    S: Typed + Copy + Display + Into<f64>,
    T: Typed + FromFloat,
{
    registry.register_handler(Arc::new(FnHandler::typed(|v: &S| {
        T::from_float((*v).into()).ok_or_else(|| {
            ConversionError::out_of_range(format!("{} does not fit in {}", v, T::static_type()))
        })
    })));
}

fn parse<T>(registry: &Registry)
where
    T: Typed + FromStr,
    ConversionError: From<T::Err>,
{
    registry.register_handler(Arc::new(FnHandler::typed(|s: &String| {
        Ok(s.trim().parse::<T>()?)
    })));
}

fn number_to_string(value: &Value) -> Result<Value, ConversionError> {
    macro_rules! format_as {
        ($($t:ty),*) => {
            $(
                if let Some(n) = value.downcast_ref::<$t>() {
                    return Ok(Value::of(n.to_string()));
                }
            )*
        };
    }
    format_as!(i32, i64, f64, f32, i16, i8);
    Err(ConversionError::unexpected_payload(format!(
        "{} does not carry a number",
        value.type_of()
    )))
}

/// Truncation toward zero with range checking.
trait FromFloat: Sized {
    fn from_float(v: f64) -> Option<Self>;
}

macro_rules! impl_from_float {
    ($($t:ty),*) => {
        $(
            impl FromFloat for $t {
                fn from_float(v: f64) -> Option<Self> {
                    let truncated = v.trunc();
                    // -MIN is 2^(bits-1), exactly representable, unlike MAX.
                    let upper = -(<$t>::MIN as f64);
                    if truncated.is_finite() && truncated >= <$t>::MIN as f64 && truncated < upper {
                        Some(truncated as $t)
                    } else {
                        None
                    }
                }
            }
        )*
    };
}

impl_from_float!(i8, i16, i32, i64);
