// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # coerce - runtime type-conversion registry
//!
//! Converts values between runtime types by looking up a registered handler
//! for the `(source type, target type)` pair. Lookups are cached, including
//! failed ones, and the registry is safe to share between threads.
//!
//! ## Quick Start
//!
//! ```rust
//! use coerce::{builtin, Registry, RegistryConfig, Value};
//!
//! let registry = Registry::with_config(RegistryConfig::new().with_builtin_catalog(true));
//!
//! // Registered handler: String -> int
//! let port: i32 = registry.convert_to(&Value::of(" 7400 ".to_string())).unwrap();
//! assert_eq!(port, 7400);
//!
//! // Predicate-widened handler: every Number -> String
//! let text = registry.convert(&Value::of(2.5_f64), builtin::string()).unwrap();
//! assert_eq!(text.get::<String>().unwrap(), "2.5");
//!
//! // Handler failures can fall back to a default; missing handlers cannot.
//! let fallback = registry
//!     .convert_or(&Value::of("n/a".to_string()), builtin::int(), Value::of(0_i32))
//!     .unwrap();
//! assert_eq!(*fallback.get::<i32>().unwrap(), 0);
//! assert!(registry
//!     .convert(&Value::of(true), builtin::ip_addr())
//!     .unwrap_err()
//!     .is_no_handler());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  convert / convert_or / convert_to                            |
//! +---------------------------------------------------------------+
//! |  resolve(S, T)                                                |
//! |    directory hit -> handler | negative marker -> NoHandler    |
//! |    scan handlers (most specific source wins)                  |
//! |    ask factories in order (identity factory first)            |
//! +---------------------------------------------------------------+
//! |  TypeTable: interned descriptors, identity-compared handles   |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`registry`] - Registry and dispatch (start here)
//! - [`handler`] - Handler and factory contracts
//! - [`types`] - Runtime type model
//! - [`catalog`] - Built-in converters
//! - [`config`] - Registry options, optionally loaded from YAML

pub mod catalog;
pub mod config;
pub mod error;
pub mod handler;
pub mod loader;
pub mod registry;
pub mod types;
pub mod value;

pub use config::{NegativeCachePolicy, RegistryConfig};
pub use error::{ConversionError, ConversionErrorKind, Error, Result, TypeError};
pub use handler::{FnHandler, Handler, HandlerFactory, IdentityFactory, PassThrough};
pub use loader::ConverterLoader;
pub use registry::{DirectoryEntry, Registry, ResolveStats, TypePair};
pub use types::{builtin, PrimitiveKind, Type, TypeBuilder, TypeDescriptor, TypeKind, TypeTable};
pub use value::{EnumValue, Typed, Value};
