// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handler and factory contracts, plus the built-in pass-through handlers.
//!
//! A [`Handler`] converts values of one declared source type into one declared
//! target type. Its `can_handle` predicate may widen the set of source types it
//! accepts. A [`HandlerFactory`] synthesises handlers on demand for pairs no
//! registered handler covers.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::ConversionError;
use crate::types::{Type, TypeTable};
use crate::value::{Typed, Value};

/// A conversion routine between two runtime types.
pub trait Handler: Send + Sync {
    /// Declared source type.
    fn source_type(&self) -> Type;

    /// Declared target type.
    fn target_type(&self) -> Type;

    /// Whether this handler accepts the pair. Must be pure.
    ///
    /// The default accepts the exact declared target and any source assignable
    /// to the declared source.
    fn can_handle(&self, source: Type, target: Type) -> bool {
        target == self.target_type() && self.source_type().is_assignable_from(source)
    }

    /// Convert `value`. Failures are reported, never cached.
    fn apply(&self, value: &Value) -> Result<Value, ConversionError>;

    /// Diagnostic name used in logs.
    fn name(&self) -> &str {
        "handler"
    }
}

impl fmt::Debug for dyn Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Handler({}: {} -> {})",
            self.name(),
            self.source_type(),
            self.target_type()
        )
    }
}

/// Synthesises handlers for pairs on demand.
pub trait HandlerFactory: Send + Sync {
    /// A handler for `(source, target)`, or `None` if this factory cannot help.
    fn create(&self, source: Type, target: Type) -> Option<Arc<dyn Handler>>;

    fn name(&self) -> &str;
}

impl fmt::Debug for dyn HandlerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerFactory({})", self.name())
    }
}

type ApplyFn = dyn Fn(&Value) -> Result<Value, ConversionError> + Send + Sync;
type PredicateFn = dyn Fn(Type, Type) -> bool + Send + Sync;

/// Closure-backed handler.
///
/// ```
/// use std::sync::Arc;
/// use coerce::{FnHandler, Registry, Value};
///
/// let registry = Registry::new();
/// registry.register_handler(Arc::new(
///     FnHandler::typed(|n: &i32| Ok(n.to_string())).named("IntToString"),
/// ));
///
/// let text = registry
///     .convert(&Value::of(42_i32), coerce::builtin::string())
///     .unwrap();
/// assert_eq!(text.get::<String>().unwrap(), "42");
/// ```
pub struct FnHandler {
    name: Cow<'static, str>,
    source: Type,
    target: Type,
    apply: Box<ApplyFn>,
    predicate: Option<Box<PredicateFn>>,
}

impl FnHandler {
    pub fn new<F>(source: Type, target: Type, apply: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        Self {
            name: Cow::Owned(format!("{}->{}", source, target)),
            source,
            target,
            apply: Box::new(apply),
            predicate: None,
        }
    }

    /// Handler between two [`Typed`] Rust types; the payload is unwrapped and
    /// the result re-wrapped.
    pub fn typed<S, T, F>(convert: F) -> Self
    where
        S: Typed,
        T: Typed,
        F: Fn(&S) -> Result<T, ConversionError> + Send + Sync + 'static,
    {
        Self::new(S::static_type(), T::static_type(), move |value| {
            convert(value.get::<S>()?).map(Value::of)
        })
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the default `can_handle` rule.
    #[must_use]
    pub fn with_predicate<P>(mut self, predicate: P) -> Self
    where
        P: Fn(Type, Type) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }
}

impl Handler for FnHandler {
    fn source_type(&self) -> Type {
        self.source
    }

    fn target_type(&self) -> Type {
        self.target
    }

    fn can_handle(&self, source: Type, target: Type) -> bool {
        match &self.predicate {
            Some(predicate) => predicate(source, target),
            None => target == self.target && self.source.is_assignable_from(source),
        }
    }

    fn apply(&self, value: &Value) -> Result<Value, ConversionError> {
        (self.apply)(value)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for FnHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("target", &self.target)
            .field("custom_predicate", &self.predicate.is_some())
            .finish()
    }
}

/// Returns its input unchanged, preserving identity.
#[derive(Debug, Clone, Copy)]
pub struct PassThrough {
    source: Type,
    target: Type,
}

impl PassThrough {
    pub fn new(source: Type, target: Type) -> Self {
        Self { source, target }
    }
}

impl Handler for PassThrough {
    fn source_type(&self) -> Type {
        self.source
    }

    fn target_type(&self) -> Type {
        self.target
    }

    fn can_handle(&self, source: Type, target: Type) -> bool {
        source == self.source && target == self.target
    }

    fn apply(&self, value: &Value) -> Result<Value, ConversionError> {
        Ok(value.clone())
    }

    fn name(&self) -> &str {
        "PassThrough"
    }
}

/// Synthesises [`PassThrough`] handlers for same-type, to-`Object` and
/// compatible pairs.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityFactory;

impl HandlerFactory for IdentityFactory {
    fn create(&self, source: Type, target: Type) -> Option<Arc<dyn Handler>> {
        if source == target || target.is_top() || TypeTable::is_compatible(source, target) {
            Some(Arc::new(PassThrough::new(source, target)))
        } else {
            None
        }
    }

    fn name(&self) -> &str {
        "IdentityFactory"
    }
}
