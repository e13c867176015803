// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handler registry.
//!
//! Holds three stores:
//!
//! - `handlers`: explicitly registered handlers, in registration order
//! - `factories`: handler factories, in registration order
//! - `directory`: cache of resolved pairs, including negative markers
//!
//! `handlers` and `factories` are append-only copy-on-write snapshots, so a
//! resolver scanning them never observes a half-applied registration.

mod directory;
mod dispatch;


use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use crate::config::{NegativeCachePolicy, RegistryConfig};
use crate::handler::{Handler, HandlerFactory, IdentityFactory};
use crate::loader::ConverterLoader;

use directory::Directory;
pub use directory::{DirectoryEntry, ResolveStats, TypePair};

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Registry of conversion handlers with a concurrent resolution cache.
///
/// Shared by reference; every operation takes `&self` and is safe to call
/// from any number of threads.
pub struct Registry {
    config: RegistryConfig,
    handlers: ArcSwap<Vec<Arc<dyn Handler>>>,
    factories: ArcSwap<Vec<Arc<dyn HandlerFactory>>>,
    directory: Directory,
    /// Bumped on every registration; resolvers compare it before publishing
    /// a negative marker.
    generation: AtomicU64,
}

impl Registry {
    /// Registry with the default configuration: identity factory only.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        let registry = Self {
            config,
            handlers: ArcSwap::from_pointee(Vec::new()),
            factories: ArcSwap::from_pointee(Vec::new()),
            directory: Directory::new(),
            generation: AtomicU64::new(0),
        };
        if config.identity_factory {
            registry.register_factory(Arc::new(IdentityFactory));
        }
        if config.builtin_catalog {
            crate::catalog::load_builtin(&registry);
        }
        registry
    }

    /// Process-wide registry with the built-in catalog loaded.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(|| {
            log::debug!("[registry] initializing global registry");
            Registry::with_config(RegistryConfig::default().with_builtin_catalog(true))
        })
    }

    #[must_use]
    #[inline]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Append a handler and seed the cache for its declared pair.
    ///
    /// The seed never replaces an existing entry for that pair.
    pub fn register_handler(&self, handler: Arc<dyn Handler>) {
        let pair = TypePair::new(handler.source_type(), handler.target_type());
        self.handlers.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(Arc::clone(&handler));
            next
        });
        self.registry_changed();

        if self
            .directory
            .publish(pair, DirectoryEntry::Resolved(Arc::clone(&handler)))
        {
            log::debug!("[registry] registered handler '{}' ({})", handler.name(), pair);
        } else {
            log::debug!(
                "[registry] registered handler '{}' ({}); pair already cached",
                handler.name(),
                pair
            );
        }
    }

    /// Append a factory; it is consulted after every earlier factory.
    pub fn register_factory(&self, factory: Arc<dyn HandlerFactory>) {
        self.factories.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(Arc::clone(&factory));
            next
        });
        self.registry_changed();
        log::debug!("[registry] registered factory '{}'", factory.name());
    }

    fn registry_changed(&self) {
        if self.config.negative_cache != NegativeCachePolicy::InvalidateOnRegister {
            return;
        }
        self.generation.fetch_add(1, Ordering::AcqRel);
        let dropped = self.directory.invalidate_negatives();
        if dropped > 0 {
            log::debug!("[registry] dropped {} negative cache entries", dropped);
        }
    }

    /// Run one collaborator loader against this registry.
    pub fn load(&self, loader: &dyn ConverterLoader) {
        let handlers = self.handler_count();
        let factories = self.factory_count();
        loader.load(self);
        log::debug!(
            "[loader] '{}' added {} handlers, {} factories",
            loader.name(),
            self.handler_count().saturating_sub(handlers),
            self.factory_count().saturating_sub(factories)
        );
    }

    pub fn load_all(&self, loaders: &[&dyn ConverterLoader]) {
        for loader in loaders {
            self.load(*loader);
        }
    }

    /// Forget every cached resolution, positive and negative.
    pub fn clear_cache(&self) {
        self.directory.clear();
        log::debug!("[registry] resolution cache cleared");
    }

    #[must_use]
    pub fn stats(&self) -> ResolveStats {
        self.directory.stats()
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.load().len()
    }

    #[must_use]
    pub fn factory_count(&self) -> usize {
        self.factories.load().len()
    }

    /// Number of cached pairs, negative markers included.
    #[must_use]
    pub fn cached_pairs(&self) -> usize {
        self.directory.len()
    }

    /// Cached outcome for a pair, without resolving.
    #[must_use]
    pub fn cached(&self, source: crate::Type, target: crate::Type) -> Option<DirectoryEntry> {
        self.directory.get(&TypePair::new(source, target))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("handlers", &self.handler_count())
            .field("factories", &self.factory_count())
            .field("cached_pairs", &self.cached_pairs())
            .finish()
    }
}
