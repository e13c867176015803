// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Array and collection converters.
//!
//! Arrays carry `Vec<E>` payloads for a primitive or `String` element type `E`,
//! and `Vec<Value>` for any other element type. Collections carry `Vec<Value>`.
//! Factories pick the element type at resolution time and synthesise a handler
//! specialised for it.

use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::ConversionError;
use crate::handler::{FnHandler, Handler, HandlerFactory};
use crate::loader::ConverterLoader;
use crate::registry::Registry;
use crate::types::{builtin, Type};
use crate::value::{EnumValue, Typed, Value};

/// Array element types stored unboxed.
trait Element: Typed + Clone {
    /// Set-membership key. Floats compare by bit pattern with every NaN folded
    /// into one, so `0.0` and `-0.0` stay distinct.
    type Key<'a>: Hash + Eq
    where
        Self: 'a;

    fn key(&self) -> Self::Key<'_>;
}

macro_rules! impl_element {
    ($($rust:ty),* $(,)?) => {
        $(
            impl Element for $rust {
                type Key<'a> = &'a $rust;

                #[inline]
                fn key(&self) -> &$rust {
                    self
                }
            }
        )*
    };
}

impl_element!(bool, i8, i16, i32, i64, char, String);

impl Element for f32 {
    type Key<'a> = u32;

    #[inline]
    fn key(&self) -> u32 {
        f32_bits(*self)
    }
}

impl Element for f64 {
    type Key<'a> = u64;

    #[inline]
    fn key(&self) -> u64 {
        f64_bits(*self)
    }
}

fn f32_bits(value: f32) -> u32 {
    if value.is_nan() {
        f32::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

fn f64_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

/// `$make::<E>(args)` for an unboxed element type, `$fallback` otherwise.
macro_rules! with_element {
    ($element:expr, $make:ident($($arg:expr),*), $fallback:expr) => {{
        let element: Type = $element;
        if element == bool::static_type() {
            $make::<bool>($($arg),*)
        } else if element == i8::static_type() {
            $make::<i8>($($arg),*)
        } else if element == i16::static_type() {
            $make::<i16>($($arg),*)
        } else if element == i32::static_type() {
            $make::<i32>($($arg),*)
        } else if element == i64::static_type() {
            $make::<i64>($($arg),*)
        } else if element == f32::static_type() {
            $make::<f32>($($arg),*)
        } else if element == f64::static_type() {
            $make::<f64>($($arg),*)
        } else if element == char::static_type() {
            $make::<char>($($arg),*)
        } else if element == String::static_type() {
            $make::<String>($($arg),*)
        } else {
            $fallback
        }
    }};
}

/// Array/collection factories and the singleton wrappers.
#[derive(Debug, Default, Clone, Copy)]
pub struct CollectionConverters;

impl ConverterLoader for CollectionConverters {
    fn name(&self) -> &str {
        "collection"
    }

    fn load(&self, registry: &Registry) {
        registry.register_handler(Arc::new(singleton(builtin::list(), builtin::array_list())));
        registry.register_handler(Arc::new(singleton(builtin::set(), builtin::hash_set())));
        registry.register_factory(Arc::new(ArrayToListFactory));
        registry.register_factory(Arc::new(ArrayToSetFactory));
        registry.register_factory(Arc::new(CollectionToArrayFactory));
    }
}

/// Wraps any non-collection, non-array value in a one-element collection.
fn singleton(target: Type, concrete: Type) -> FnHandler {
    FnHandler::new(builtin::object(), target, move |value| {
        Ok(Value::collection(concrete, vec![value.clone()]))
    })
    .named(format!("SingletonTo{}", target))
    .with_predicate(move |source, requested| {
        requested == target && !source.is_array() && !builtin::collection().is_assignable_from(source)
    })
}

/// `T[] -> List`, `ArrayList`, `LinkedList` or `Collection`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArrayToListFactory;

impl HandlerFactory for ArrayToListFactory {
    fn create(&self, source: Type, target: Type) -> Option<Arc<dyn Handler>> {
        let element = source.element_type()?;
        if !(builtin::list().is_assignable_from(target) || target == builtin::collection()) {
            return None;
        }
        let concrete = if target.is_abstract() {
            builtin::array_list()
        } else {
            target
        };
        let shape = CollectionShape {
            source,
            target,
            concrete,
            distinct: false,
        };
        Some(with_element!(
            element,
            array_to_collection(shape),
            reference_array_to_collection(shape, element)
        ))
    }

    fn name(&self) -> &str {
        "ArrayToListFactory"
    }
}

/// `T[] -> Set` or `HashSet`; duplicates are dropped, first occurrence kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArrayToSetFactory;

impl HandlerFactory for ArrayToSetFactory {
    fn create(&self, source: Type, target: Type) -> Option<Arc<dyn Handler>> {
        let element = source.element_type()?;
        if !builtin::set().is_assignable_from(target) {
            return None;
        }
        let concrete = if target.is_abstract() {
            builtin::hash_set()
        } else {
            target
        };
        let shape = CollectionShape {
            source,
            target,
            concrete,
            distinct: true,
        };
        Some(with_element!(
            element,
            array_to_collection(shape),
            reference_array_to_collection(shape, element)
        ))
    }

    fn name(&self) -> &str {
        "ArrayToSetFactory"
    }
}

/// Any `Collection` subtype -> `T[]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CollectionToArrayFactory;

impl HandlerFactory for CollectionToArrayFactory {
    fn create(&self, source: Type, target: Type) -> Option<Arc<dyn Handler>> {
        if !builtin::collection().is_assignable_from(source) {
            return None;
        }
        let element = target.element_type()?;
        Some(with_element!(
            element,
            collection_to_array(source, target),
            collection_to_reference_array(source, target, element)
        ))
    }

    fn name(&self) -> &str {
        "CollectionToArrayFactory"
    }
}

/// Pair and output shape shared by the array-to-collection handlers.
#[derive(Debug, Clone, Copy)]
struct CollectionShape {
    source: Type,
    target: Type,
    concrete: Type,
    distinct: bool,
}

impl CollectionShape {
    fn name(&self) -> &'static str {
        if self.distinct {
            "ArrayToSet"
        } else {
            "ArrayToList"
        }
    }
}

fn array_to_collection<E: Element>(shape: CollectionShape) -> Arc<dyn Handler> {
    Arc::new(ArrayToCollection::<E> {
        shape,
        element: PhantomData,
    })
}

fn collection_to_array<E: Element>(source: Type, target: Type) -> Arc<dyn Handler> {
    Arc::new(CollectionToArray::<E> {
        source,
        target,
        element: PhantomData,
    })
}

fn reference_array_to_collection(shape: CollectionShape, element: Type) -> Arc<dyn Handler> {
    Arc::new(ReferenceArrayToCollection { shape, element })
}

fn collection_to_reference_array(source: Type, target: Type, element: Type) -> Arc<dyn Handler> {
    Arc::new(CollectionToReferenceArray {
        source,
        target,
        element,
    })
}

/// Items of `value`, each checked to be an instance of `element`.
fn checked_items(value: &Value, element: Type) -> Result<&[Value], ConversionError> {
    let items = value.get::<Vec<Value>>()?;
    for (index, item) in items.iter().enumerate() {
        if !element.is_assignable_from(item.type_of()) {
            return Err(ConversionError::unexpected_payload(format!(
                "element {}: {} is not a {}",
                index,
                item.type_of(),
                element
            )));
        }
    }
    Ok(items.as_slice())
}

/// Set-membership key of a boxed element: its type plus its value for builtin
/// payloads, its instance otherwise.
#[derive(PartialEq, Eq, Hash)]
enum ItemKey<'a> {
    Bool(bool),
    Int(i64),
    Bits(u64),
    Char(char),
    Text(&'a str),
    Constant(&'a EnumValue),
    Instance(usize),
}

fn item_key(item: &Value) -> (Type, ItemKey<'_>) {
    let key = if let Some(v) = item.downcast_ref::<bool>() {
        ItemKey::Bool(*v)
    } else if let Some(v) = item.downcast_ref::<i8>() {
        ItemKey::Int(i64::from(*v))
    } else if let Some(v) = item.downcast_ref::<i16>() {
        ItemKey::Int(i64::from(*v))
    } else if let Some(v) = item.downcast_ref::<i32>() {
        ItemKey::Int(i64::from(*v))
    } else if let Some(v) = item.downcast_ref::<i64>() {
        ItemKey::Int(*v)
    } else if let Some(v) = item.downcast_ref::<f32>() {
        ItemKey::Bits(u64::from(f32_bits(*v)))
    } else if let Some(v) = item.downcast_ref::<f64>() {
        ItemKey::Bits(f64_bits(*v))
    } else if let Some(v) = item.downcast_ref::<char>() {
        ItemKey::Char(*v)
    } else if let Some(v) = item.downcast_ref::<String>() {
        ItemKey::Text(v.as_str())
    } else if let Some(v) = item.downcast_ref::<EnumValue>() {
        ItemKey::Constant(v)
    } else {
        ItemKey::Instance(item.instance_addr())
    };
    (item.type_of(), key)
}

struct ArrayToCollection<E> {
    shape: CollectionShape,
    element: PhantomData<fn() -> E>,
}

impl<E: Element> Handler for ArrayToCollection<E> {
    fn source_type(&self) -> Type {
        self.shape.source
    }

    fn target_type(&self) -> Type {
        self.shape.target
    }

    fn can_handle(&self, source: Type, target: Type) -> bool {
        source == self.shape.source && target == self.shape.target
    }

    fn apply(&self, value: &Value) -> Result<Value, ConversionError> {
        let array = value.get::<Vec<E>>()?;
        let mut seen = HashSet::with_capacity(if self.shape.distinct { array.len() } else { 0 });
        let items = array
            .iter()
            .filter(|&item| !self.shape.distinct || seen.insert(item.key()))
            .map(|item| Value::of(item.clone()))
            .collect();
        Ok(Value::collection(self.shape.concrete, items))
    }

    fn name(&self) -> &str {
        self.shape.name()
    }
}

/// `T[] -> collection` for a reference element type; items are shared, not copied.
struct ReferenceArrayToCollection {
    shape: CollectionShape,
    element: Type,
}

impl Handler for ReferenceArrayToCollection {
    fn source_type(&self) -> Type {
        self.shape.source
    }

    fn target_type(&self) -> Type {
        self.shape.target
    }

    fn can_handle(&self, source: Type, target: Type) -> bool {
        source == self.shape.source && target == self.shape.target
    }

    fn apply(&self, value: &Value) -> Result<Value, ConversionError> {
        let array = checked_items(value, self.element)?;
        let items = if self.shape.distinct {
            let mut seen = HashSet::with_capacity(array.len());
            array
                .iter()
                .filter(|&item| seen.insert(item_key(item)))
                .cloned()
                .collect()
        } else {
            array.to_vec()
        };
        Ok(Value::collection(self.shape.concrete, items))
    }

    fn name(&self) -> &str {
        self.shape.name()
    }
}

struct CollectionToArray<E> {
    source: Type,
    target: Type,
    element: PhantomData<fn() -> E>,
}

impl<E: Element> Handler for CollectionToArray<E> {
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
        let items = value.get::<Vec<Value>>()?;
        let array = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.get::<E>()
                    .cloned()
                    .map_err(|e| e.with_context(format!("element {}", index)))
            })
            .collect::<Result<Vec<E>, _>>()?;
        Ok(Value::new(self.target, array))
    }

    fn name(&self) -> &str {
        "CollectionToArray"
    }
}

struct CollectionToReferenceArray {
    source: Type,
    target: Type,
    element: Type,
}

impl Handler for CollectionToReferenceArray {
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
        let items = checked_items(value, self.element)?;
        Ok(Value::new(self.target, items.to_vec()))
    }

    fn name(&self) -> &str {
        "CollectionToArray"
    }
}
