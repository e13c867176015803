// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handler resolution and conversion.
//!
//! Resolution order for a pair `(S, T)`:
//!
//! 1. Cached handler: return it.
//! 2. Cached negative marker: fail fast.
//! 3. Scan registered handlers; among those whose `can_handle(S, T)` holds,
//!    keep the one with the most specific declared source type.
//! 4. Ask factories in registration order; the first handler produced wins.
//! 5. Publish a negative marker.
//!
//! Every publish is insert-if-absent and followed by a fresh cache read, so
//! concurrent resolvers of the same pair all return the first published entry.
//!
//! A negative marker is only published if no registration happened during
//! the scan. After `MAX_RESCANS` interrupted scans the failure is returned
//! without being cached, so a steady stream of registrations cannot keep a
//! resolver looping.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::{DirectoryEntry, Registry, TypePair};
use crate::config::NegativeCachePolicy;
use crate::error::{Error, Result};
use crate::handler::Handler;
use crate::types::Type;
use crate::value::{Typed, Value};

/// Scans interrupted by concurrent registrations before giving up on caching.
pub(crate) const MAX_RESCANS: usize = 8;

impl Registry {
    /// Find the handler for `(source, target)`.
    ///
    /// # Errors
    ///
    /// [`Error::NoHandlerFound`] when no registered handler accepts the pair
    /// and no factory synthesises one. The failure is cached.
    pub fn resolve(&self, source: Type, target: Type) -> Result<Arc<dyn Handler>> {
        let key = TypePair::new(source, target);

        match self.directory.get(&key) {
            Some(DirectoryEntry::Resolved(handler)) => {
                self.directory.record_hit();
                return Ok(handler);
            }
            Some(DirectoryEntry::NoHandler) => {
                self.directory.record_negative_hit();
                return Err(no_handler(key));
            }
            None => self.directory.record_miss(),
        }

        let mut rescans = 0;
        loop {
            let generation = self.generation.load(Ordering::Acquire);

            if let Some(handler) = self.most_specific(key) {
                log::trace!("[dispatch] {} matched handler '{}'", key, handler.name());
                self.directory
                    .publish(key, DirectoryEntry::Resolved(handler));
            } else if let Some(handler) = self.synthesize(key) {
                self.directory.record_synthesis();
                self.directory
                    .publish(key, DirectoryEntry::Resolved(handler));
            } else if !self.publish_negative(key, generation) {
                rescans += 1;
                if rescans >= MAX_RESCANS {
                    log::debug!(
                        "[dispatch] no handler for {} after {} interrupted scans, not caching",
                        key,
                        rescans
                    );
                    return Err(no_handler(key));
                }
                log::trace!("[dispatch] registry changed while resolving {}, rescanning", key);
                continue;
            }

            match self.directory.get(&key) {
                Some(DirectoryEntry::Resolved(handler)) => return Ok(handler),
                Some(DirectoryEntry::NoHandler) => return Err(no_handler(key)),
                // Invalidated between publish and read; resolve again.
                None => continue,
            }
        }
    }

    /// Whether `resolve(source, target)` succeeds. Caches like `resolve`.
    #[must_use]
    pub fn can_resolve(&self, source: Type, target: Type) -> bool {
        self.resolve(source, target).is_ok()
    }

    /// Convert `value` to `target`.
    ///
    /// # Errors
    ///
    /// [`Error::NoHandlerFound`] if the pair cannot be resolved, or
    /// [`Error::ConversionFailed`] if the selected handler rejects the value.
    pub fn convert(&self, value: &Value, target: Type) -> Result<Value> {
        let source = value.type_of();
        let handler = self.resolve(source, target)?;
        handler
            .apply(value)
            .map_err(|cause| Error::ConversionFailed {
                source_type: source,
                target_type: target,
                cause,
            })
    }

    /// Convert `value`, substituting `default` when the handler fails.
    ///
    /// # Errors
    ///
    /// Only [`Error::NoHandlerFound`]: a missing handler is a configuration
    /// problem and is never replaced by the default.
    pub fn convert_or(&self, value: &Value, target: Type, default: Value) -> Result<Value> {
        match self.convert(value, target) {
            Err(Error::ConversionFailed { cause, .. }) => {
                log::debug!(
                    "[dispatch] {} -> {} failed ({}), using default",
                    value.type_of(),
                    target,
                    cause
                );
                Ok(default)
            }
            other => other,
        }
    }

    /// Convert into a [`Typed`] Rust value.
    ///
    /// # Errors
    ///
    /// As [`Registry::convert`]; a handler producing a payload other than `T`
    /// is reported as [`Error::ConversionFailed`].
    pub fn convert_to<T: Typed + Clone>(&self, value: &Value) -> Result<T> {
        let target = T::static_type();
        let converted = self.convert(value, target)?;
        converted
            .get::<T>()
            .cloned()
            .map_err(|cause| Error::ConversionFailed {
                source_type: value.type_of(),
                target_type: target,
                cause,
            })
    }

    /// Registered handler accepting `key` with the most specific declared source.
    fn most_specific(&self, key: TypePair) -> Option<Arc<dyn Handler>> {
        let handlers = self.handlers.load_full();
        let mut found: Option<&Arc<dyn Handler>> = None;
        for handler in handlers.iter() {
            if !handler.can_handle(key.source, key.target) {
                continue;
            }
            match found {
                Some(best) if !best.source_type().is_assignable_from(handler.source_type()) => {}
                _ => found = Some(handler),
            }
        }
        found.cloned()
    }

    /// First handler produced by a factory, in registration order.
    fn synthesize(&self, key: TypePair) -> Option<Arc<dyn Handler>> {
        let factories = self.factories.load_full();
        factories.iter().find_map(|factory| {
            let handler = factory.create(key.source, key.target)?;
            log::debug!(
                "[dispatch] factory '{}' created '{}' for {}",
                factory.name(),
                handler.name(),
                key
            );
            Some(handler)
        })
    }

    /// Publish a negative marker. Returns `false` if a registration raced with
    /// this resolution and the pair must be scanned again.
    pub(super) fn publish_negative(&self, key: TypePair, generation: u64) -> bool {
        if self.config.negative_cache == NegativeCachePolicy::Sticky {
            if self.directory.publish(key, DirectoryEntry::NoHandler) {
                self.note_negative(key);
            }
            return true;
        }

        if self.generation.load(Ordering::Acquire) != generation {
            return false;
        }
        let inserted = self.directory.publish(key, DirectoryEntry::NoHandler);
        if self.generation.load(Ordering::Acquire) != generation {
            if inserted {
                self.directory.retract_negative(&key);
            }
            return false;
        }
        if inserted {
            self.note_negative(key);
        }
        true
    }

    fn note_negative(&self, key: TypePair) {
        self.directory.record_negative();
        log::debug!("[dispatch] no handler for {}, caching negative", key);
    }
}

fn no_handler(key: TypePair) -> Error {
    Error::NoHandlerFound {
        source_type: key.source,
        target_type: key.target,
    }
}
