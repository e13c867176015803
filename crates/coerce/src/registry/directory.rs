// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolution cache keyed by `(source, target)`.
//!
//! Entries are published insert-if-absent so the first resolver to publish a
//! pair wins and every later resolver returns that same handler instance.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::handler::Handler;
use crate::types::Type;

/// Ordered `(source, target)` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypePair {
    pub source: Type,
    pub target: Type,
}

impl TypePair {
    #[must_use]
    #[inline]
    pub fn new(source: Type, target: Type) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for TypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Cached outcome of resolving a pair.
#[derive(Debug, Clone)]
pub enum DirectoryEntry {
    Resolved(Arc<dyn Handler>),
    /// Negative marker: resolution already failed for this pair.
    NoHandler,
}

/// Resolution statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveStats {
    /// Lookups answered by a cached handler.
    pub hits: u64,
    /// Lookups answered by a negative marker.
    pub negative_hits: u64,
    /// Lookups that had to scan handlers and factories.
    pub misses: u64,
    /// Handlers produced by factories.
    pub syntheses: u64,
    /// Negative markers published.
    pub negatives: u64,
}

/// Relaxed counters behind [`ResolveStats`]; bumped on the lookup path.
#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    negative_hits: AtomicU64,
    misses: AtomicU64,
    syntheses: AtomicU64,
    negatives: AtomicU64,
}

pub(crate) struct Directory {
    entries: DashMap<TypePair, DirectoryEntry>,
    counters: Counters,
}

impl Directory {
    pub(crate) fn new() -> Self {
        Self {
            entries: DashMap::new(),
            counters: Counters::default(),
        }
    }

    /// Snapshot of the entry for `key`; no shard lock is held afterwards.
    pub(crate) fn get(&self, key: &TypePair) -> Option<DirectoryEntry> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Insert `entry` unless the pair is already present. Returns whether it was inserted.
    pub(crate) fn publish(&self, key: TypePair, entry: DirectoryEntry) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    /// Drop the negative marker for `key`, leaving a resolved entry alone.
    pub(crate) fn retract_negative(&self, key: &TypePair) {
        self.entries
            .remove_if(key, |_, entry| matches!(entry, DirectoryEntry::NoHandler));
    }

    /// Drop every negative marker. Returns how many were removed.
    pub(crate) fn invalidate_negatives(&self) -> usize {
        let mut dropped = 0;
        self.entries.retain(|_, entry| {
            let negative = matches!(entry, DirectoryEntry::NoHandler);
            if negative {
                dropped += 1;
            }
            !negative
        });
        dropped
    }

    pub(crate) fn clear(&self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Point-in-time snapshot; counters are read independently.
    pub(crate) fn stats(&self) -> ResolveStats {
        let c = &self.counters;
        ResolveStats {
            hits: c.hits.load(Ordering::Relaxed),
            negative_hits: c.negative_hits.load(Ordering::Relaxed),
            misses: c.misses.load(Ordering::Relaxed),
            syntheses: c.syntheses.load(Ordering::Relaxed),
            negatives: c.negatives.load(Ordering::Relaxed),
        }
    }

    #[inline]
    pub(crate) fn record_hit(&self) {
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_negative_hit(&self) {
        self.counters.negative_hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_miss(&self) {
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_synthesis(&self) {
        self.counters.syntheses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_negative(&self) {
        self.counters.negatives.fetch_add(1, Ordering::Relaxed);
    }
}
