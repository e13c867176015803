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

//! YAML registry configuration tests
//!
//! Validates loading `RegistryConfig` from files and its effect on a registry.

use coerce::{builtin, Error, NegativeCachePolicy, Registry, RegistryConfig, TypeBuilder, Value};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

fn write_temp_yaml(content: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(content.as_bytes()).expect("write temp file");
    f.flush().expect("flush temp file");
    f
}

#[test]
fn full_document() {
    let file = write_temp_yaml(
        r#"
negative_cache: sticky
identity_factory: false
builtin_catalog: true
"#,
    );
    let config = RegistryConfig::load_yaml(file.path()).expect("valid config");
    assert_eq!(config.negative_cache, NegativeCachePolicy::Sticky);
    assert!(!config.identity_factory);
    assert!(config.builtin_catalog);

    let registry = Registry::with_config(config);
    assert!(registry.can_resolve(builtin::string(), builtin::int()));
    assert!(!registry.can_resolve(builtin::int(), builtin::int()));
}

#[test]
fn sticky_policy_from_file_keeps_negatives() {
    let file = write_temp_yaml("negative_cache: sticky\n");
    let registry = Registry::with_config(RegistryConfig::load_yaml(file.path()).unwrap());
    let ty = TypeBuilder::class("config_yaml.Sticky").define().unwrap();

    assert!(!registry.can_resolve(ty, builtin::string()));
    registry.register_handler(Arc::new(coerce::FnHandler::new(
        ty,
        builtin::string(),
        |_| Ok(Value::of(String::new())),
    )));
    // The negative marker wins over the registration seed until the cache is cleared.
    assert!(!registry.can_resolve(ty, builtin::string()));
    let sub = TypeBuilder::class("config_yaml.StickySub")
        .extends(ty)
        .define()
        .unwrap();
    assert!(registry.can_resolve(sub, builtin::string()));

    registry.clear_cache();
    assert!(registry.can_resolve(ty, builtin::string()));
}

#[test]
fn missing_file_is_a_config_error() {
    let err = RegistryConfig::load_yaml(Path::new("/nonexistent/coerce.yaml")).unwrap_err();
    assert!(matches!(err, Error::Config(msg) if msg.contains("failed to read")));
}

#[test]
fn malformed_file_is_a_config_error() {
    let file = write_temp_yaml("negative_cache: [not, a, policy]\n");
    let err = RegistryConfig::load_yaml(file.path()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
