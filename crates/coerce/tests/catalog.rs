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

//! Built-in catalog integration tests
//!
//! Exercises the process-wide registry with every built-in loader.

use coerce::{builtin, catalog, Registry, TypeBuilder, TypeTable, Value};
use std::net::IpAddr;
use std::sync::Arc;

#[test]
fn global_registry_is_shared_and_loaded() {
    let a = Registry::global();
    let b = Registry::global();
    assert!(std::ptr::eq(a, b));
    assert!(a.config().builtin_catalog);
    assert!(a.handler_count() > 40);
    // identity + collection factories + string-to-enum
    assert_eq!(a.factory_count(), 5);
}

#[test]
fn builtin_loaders_are_listed_in_load_order() {
    let loaders = catalog::builtin_loaders();
    let names: Vec<&str> = loaders
        .iter()
        .map(|loader| loader.name())
        .collect();
    assert_eq!(names, vec!["boolean", "number", "collection", "enum", "net"]);
}

#[test]
fn text_pipeline() {
    let registry = Registry::global();

    let port: i32 = registry.convert_to(&Value::of("7400".to_string())).unwrap();
    let wide: i64 = registry.convert_to(&Value::of(port)).unwrap();
    let text: String = registry.convert_to(&Value::of(wide)).unwrap();
    assert_eq!(text, "7400");

    let flag: bool = registry.convert_to(&Value::of(port)).unwrap();
    assert!(flag);

    let ip: IpAddr = registry
        .convert_to(&Value::of(" 192.168.1.10 ".to_string()))
        .unwrap();
    assert!(ip.is_ipv4());
}

#[test]
fn arrays_lists_and_back() {
    let registry = Registry::global();
    let table = TypeTable::global();

    let list = registry
        .convert(&Value::of(vec!['a', 'b', 'a']), builtin::list())
        .unwrap();
    assert_eq!(list.items().map(<[Value]>::len), Some(3));

    let set = registry
        .convert(&Value::of(vec!['a', 'b', 'a']), builtin::hash_set())
        .unwrap();
    assert_eq!(set.items().map(<[Value]>::len), Some(2));

    let back = registry
        .convert(&set, table.array_of(builtin::char()))
        .unwrap();
    assert_eq!(back.get::<Vec<char>>().unwrap(), &vec!['a', 'b']);
}

#[test]
fn user_enums_use_catalog_handlers() {
    let registry = Registry::global();
    let mode = TypeBuilder::enumeration("catalog_tests.Mode", ["FAST", "SAFE"])
        .define()
        .unwrap();
    let other = TypeBuilder::enumeration("catalog_tests.Other", ["X"])
        .define()
        .unwrap();

    let safe = registry.convert(&Value::of("SAFE".to_string()), mode).unwrap();
    assert_eq!(registry.convert_to::<String>(&safe).unwrap(), "SAFE");

    let to_string_mode = registry.resolve(mode, builtin::string()).unwrap();
    let to_string_other = registry.resolve(other, builtin::string()).unwrap();
    assert!(Arc::ptr_eq(&to_string_mode, &to_string_other));
    assert_eq!(to_string_mode.name(), "EnumToString");

    let from_mode = registry.resolve(builtin::string(), mode).unwrap();
    let from_other = registry.resolve(builtin::string(), other).unwrap();
    assert!(!Arc::ptr_eq(&from_mode, &from_other));
}

#[test]
fn unrelated_pairs_have_no_handler() {
    let registry = Registry::global();
    let err = registry
        .convert(&Value::of(1.0_f32), builtin::socket_addr())
        .unwrap_err();
    assert!(err.is_no_handler());
    let ints = TypeTable::global().array_of(builtin::int());
    assert!(!registry.can_resolve(builtin::map(), ints));
}

#[test]
fn user_class_arrays_convert_to_collections() {
    let registry = Registry::global();
    let circle = TypeBuilder::class("catalog_tests.Circle").define().unwrap();
    let circles = Value::array(circle, vec![Value::new(circle, 1_u8), Value::new(circle, 2_u8)]);

    let list = registry.convert(&circles, builtin::list()).unwrap();
    assert_eq!(list.items().map(<[Value]>::len), Some(2));

    let objects = registry
        .convert(&list, TypeTable::global().array_of(builtin::object()))
        .unwrap();
    assert_eq!(objects.items().map(<[Value]>::len), Some(2));
}
