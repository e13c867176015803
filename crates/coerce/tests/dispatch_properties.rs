// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::cast_precision_loss)] // Stats/metrics need this
#![allow(clippy::cast_sign_loss)] // Test data conversions
#![allow(clippy::cast_possible_truncation)] // Test parameters
#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::doc_markdown)] // Test documentation
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::missing_errors_doc)] // Test documentation
#![allow(clippy::items_after_statements)] // Test helpers
#![allow(clippy::module_name_repetitions)] // Test modules
#![allow(clippy::too_many_lines)] // Example/test code
#![allow(clippy::match_same_arms)] // Test pattern matching
#![allow(clippy::no_effect_underscore_binding)] // Test variables
#![allow(clippy::wildcard_imports)] // Test utility imports
#![allow(clippy::redundant_closure_for_method_calls)] // Test code clarity
#![allow(clippy::similar_names)] // Test variable naming
#![allow(clippy::shadow_unrelated)] // Test scoping
#![allow(clippy::needless_pass_by_value)] // Test functions
#![allow(clippy::cast_possible_wrap)] // Test conversions
#![allow(clippy::single_match_else)] // Test clarity
#![allow(clippy::needless_continue)] // Test logic
#![allow(clippy::cast_lossless)] // Test simplicity
#![allow(clippy::match_wild_err_arm)] // Test error handling
#![allow(clippy::explicit_iter_loop)] // Test iteration
#![allow(clippy::must_use_candidate)] // Test functions
#![allow(clippy::if_not_else)] // Test conditionals
#![allow(clippy::map_unwrap_or)] // Test options
#![allow(clippy::match_wildcard_for_single_variants)] // Test patterns
#![allow(clippy::ignored_unit_patterns)] // Test closures

//! Dispatch engine integration tests
//!
//! Validates resolution, caching and conversion laws through the public API.

use coerce::{
    builtin, ConversionError, Error, FnHandler, Handler, HandlerFactory, Registry, Type,
    TypeBuilder, TypeTable, Value,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

/// Factory producing a brand-new handler on every call.
struct FreshFactory {
    source: Type,
    target: Type,
    calls: AtomicUsize,
}

impl HandlerFactory for FreshFactory {
    fn create(&self, source: Type, target: Type) -> Option<Arc<dyn Handler>> {
        if source != self.source || target != self.target {
            return None;
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(Arc::new(FnHandler::new(source, target, |v| Ok(v.clone()))))
    }

    fn name(&self) -> &str {
        "FreshFactory"
    }
}

/// Factory that never produces anything but counts how often it is asked.
struct CountingFactory(AtomicUsize);

impl HandlerFactory for CountingFactory {
    fn create(&self, _source: Type, _target: Type) -> Option<Arc<dyn Handler>> {
        self.0.fetch_add(1, Ordering::SeqCst);
        None
    }

    fn name(&self) -> &str {
        "CountingFactory"
    }
}

fn int_to_bool() -> Arc<dyn Handler> {
    Arc::new(FnHandler::typed(|n: &i32| Ok(*n != 0)).named("IntToBool"))
}

#[test]
fn int_to_bool_scenario() {
    let registry = Registry::new();
    let handler = int_to_bool();
    registry.register_handler(Arc::clone(&handler));

    let resolved = registry
        .resolve(builtin::int(), builtin::boolean())
        .expect("int -> boolean registered");
    assert!(Arc::ptr_eq(&resolved, &handler));

    assert!(!registry.convert_to::<bool>(&Value::of(0_i32)).unwrap());
    assert!(registry.convert_to::<bool>(&Value::of(5_i32)).unwrap());

    match registry.resolve(builtin::boolean(), builtin::int()) {
        Err(Error::NoHandlerFound {
            source_type,
            target_type,
        }) => {
            assert_eq!(source_type, builtin::boolean());
            assert_eq!(target_type, builtin::int());
        }
        other => panic!("expected NoHandlerFound, got {:?}", other),
    }
}

#[test]
fn resolution_is_idempotent() {
    let registry = Registry::with_config(coerce::RegistryConfig::new().with_builtin_catalog(true));
    let pairs = [
        (builtin::int(), builtin::string()),
        (builtin::string(), builtin::double()),
        (TypeTable::global().array_of(builtin::int()), builtin::list()),
        (builtin::array_list(), builtin::collection()),
        (builtin::boolean(), builtin::object()),
    ];
    for (source, target) in pairs {
        let first = registry.resolve(source, target).unwrap();
        let second = registry.resolve(source, target).unwrap();
        assert!(Arc::ptr_eq(&first, &second), "{} -> {}", source, target);
    }
}

#[test]
fn identity_law() {
    let registry = Registry::with_config(coerce::RegistryConfig::new().with_builtin_catalog(true));
    let custom = TypeBuilder::class("dispatch_properties.Custom")
        .define()
        .unwrap();
    let values = [
        Value::of(7_i32),
        Value::of(true),
        Value::of("text".to_string()),
        Value::of(vec![1.5_f64, 2.5]),
        Value::collection(builtin::hash_set(), vec![Value::of(1_i8)]),
        Value::new(custom, 42_u64),
    ];
    for value in &values {
        let ty = value.type_of();
        assert!(registry.can_resolve(ty, ty), "{}", ty);
        let same = registry.convert(value, ty).unwrap();
        assert!(Value::ptr_eq(value, &same), "{}", ty);
    }
}

#[test]
fn everything_converts_to_object_unchanged() {
    let registry = Registry::new();
    for value in [Value::of(1_i64), Value::of('c'), Value::of(vec![true])] {
        let out = registry.convert(&value, builtin::object()).unwrap();
        assert!(Value::ptr_eq(&value, &out));
    }
}

#[test]
fn negative_results_do_not_reinvoke_factories() {
    let registry = Registry::new();
    let factory = Arc::new(CountingFactory(AtomicUsize::new(0)));
    registry.register_factory(factory.clone());

    let pet = TypeBuilder::class("dispatch_properties.Pet").define().unwrap();
    for _ in 0..2 {
        let err = registry.resolve(pet, builtin::ip_addr()).unwrap_err();
        assert!(err.is_no_handler());
    }
    assert_eq!(factory.0.load(Ordering::SeqCst), 1);
}

#[test]
fn specific_subtype_handler_wins() {
    let animal = TypeBuilder::abstract_class("dispatch_properties.Animal")
        .define()
        .unwrap();
    let dog = TypeBuilder::class("dispatch_properties.Dog")
        .extends(animal)
        .define()
        .unwrap();

    let registry = Registry::new();
    let a: Arc<dyn Handler> = Arc::new(
        FnHandler::new(animal, builtin::string(), |_| Ok(Value::of("animal".to_string())))
            .named("A"),
    );
    let b: Arc<dyn Handler> = Arc::new(
        FnHandler::new(dog, builtin::string(), |_| Ok(Value::of("dog".to_string()))).named("B"),
    );
    registry.register_handler(a);
    registry.register_handler(Arc::clone(&b));

    let resolved = registry.resolve(dog, builtin::string()).unwrap();
    assert!(Arc::ptr_eq(&resolved, &b));
    assert_eq!(
        registry.convert_to::<String>(&Value::new(dog, ())).unwrap(),
        "dog"
    );
}

#[test]
fn default_path_swallows_only_conversion_failures() {
    let registry = Registry::new();
    registry.register_handler(Arc::new(FnHandler::typed(|s: &String| {
        s.parse::<i32>().map_err(ConversionError::from)
    })));

    let fallback = registry
        .convert_or(&Value::of("oops".to_string()), builtin::int(), Value::of(-1_i32))
        .unwrap();
    assert_eq!(*fallback.get::<i32>().unwrap(), -1);

    let err = registry
        .convert_or(&Value::of(true), builtin::int(), Value::of(-1_i32))
        .unwrap_err();
    assert!(err.is_no_handler());
}

#[test]
fn conversion_failures_are_not_cached() {
    let registry = Registry::new();
    registry.register_handler(Arc::new(FnHandler::typed(|s: &String| {
        Ok(s.trim().parse::<i64>()?)
    })));

    let err = registry
        .convert(&Value::of("x".to_string()), builtin::long())
        .unwrap_err();
    assert!(err.is_conversion_failed());
    assert!(err.cause().is_some());

    assert_eq!(
        registry
            .convert_to::<i64>(&Value::of("5".to_string()))
            .unwrap(),
        5
    );
}

#[test]
fn concurrent_resolution_converges() {
    const THREADS: usize = 16;

    for round in 0..20 {
        let source = TypeBuilder::class(format!("dispatch_properties.Race{}", round))
            .define()
            .unwrap();
        let registry = Arc::new(Registry::new());
        let factory = Arc::new(FreshFactory {
            source,
            target: builtin::string(),
            calls: AtomicUsize::new(0),
        });
        registry.register_factory(factory.clone());

        let barrier = Arc::new(Barrier::new(THREADS));
        let mut handles = Vec::new();
        for _ in 0..THREADS {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                barrier.wait();
                if fastrand::bool() {
                    thread::yield_now();
                }
                registry
                    .resolve(source, builtin::string())
                    .expect("factory covers the pair")
            }));
        }

        let resolved: Vec<Arc<dyn Handler>> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should succeed"))
            .collect();
        let first = &resolved[0];
        assert!(resolved.iter().all(|h| Arc::ptr_eq(h, first)));
        assert!(factory.calls.load(Ordering::SeqCst) >= 1);

        let cached = registry.resolve(source, builtin::string()).unwrap();
        assert!(Arc::ptr_eq(&cached, first));
    }
}

#[test]
fn registration_during_lookups() {
    let registry = Arc::new(Registry::new());
    let kinds: Vec<Type> = (0..8)
        .map(|i| {
            TypeBuilder::class(format!("dispatch_properties.Late{}", i))
                .define()
                .unwrap()
        })
        .collect();

    let barrier = Arc::new(Barrier::new(2));
    let reader = {
        let registry = Arc::clone(&registry);
        let barrier = Arc::clone(&barrier);
        let kinds = kinds.clone();
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..2_000 {
                let ty = kinds[fastrand::usize(..kinds.len())];
                let _ = registry.resolve(ty, builtin::string());
            }
        })
    };

    barrier.wait();
    for ty in &kinds {
        registry.register_handler(Arc::new(FnHandler::new(*ty, builtin::string(), |_| {
            Ok(Value::of(String::new()))
        })));
    }
    reader.join().expect("reader should succeed");

    // Default policy: negatives published before a registration are dropped by it.
    for ty in &kinds {
        assert!(registry.can_resolve(*ty, builtin::string()), "{}", ty);
    }
}
