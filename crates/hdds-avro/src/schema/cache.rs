// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent LRU cache of derived schemas.
//!
//! Schema derivation happens once per full name; subsequent lookups are served
//! from an in-memory LRU. A secondary dashmap keeps track of "pinned" entries
//! that must never be evicted.

use super::Schema;
use dashmap::DashSet;
use lru::LruCache;
use parking_lot::RwLock;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    pub last_miss_ns: u64,
}

/// LRU-based concurrent cache keyed by schema full name.
pub struct SchemaCache {
    inner: RwLock<LruCache<Arc<str>, Arc<Schema>>>,
    pinned: DashSet<Arc<str>>,
    stats: RwLock<LookupStats>,
}

impl SchemaCache {
    /// Create a cache holding at most `capacity` schemas (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: RwLock::new(LruCache::new(capacity)),
            pinned: DashSet::new(),
            stats: RwLock::new(LookupStats::default()),
        }
    }

    /// Look up `full_name`, building and inserting on a miss.
    ///
    /// Build errors are returned as-is and nothing is cached.
    pub fn get_or_try_build<F, E>(&self, full_name: &str, build: F) -> Result<Arc<Schema>, E>
    where
        F: FnOnce() -> Result<Arc<Schema>, E>,
    {
        if let Some(hit) = self.peek(full_name) {
            self.record_hit();
            return Ok(hit);
        }

        let mut cache = self.inner.write();
        if let Some(hit) = cache.get(full_name) {
            self.record_hit();
            return Ok(Arc::clone(hit));
        }

        let start = Instant::now();
        let built = build()?;

        if cache.len() >= cache.cap().get() && !self.free_slot(&mut cache) {
            log::debug!("[cache] full of pinned entries, not caching {}", full_name);
            self.record_miss(start);
            return Ok(built);
        }

        cache.put(Arc::from(full_name), Arc::clone(&built));
        self.record_miss(start);
        Ok(built)
    }

    /// Never evict `full_name` once cached.
    pub fn pin(&self, full_name: &str) {
        self.pinned.insert(Arc::from(full_name));
    }

    /// Cached schema for `full_name`, without touching LRU order or stats.
    pub fn peek(&self, full_name: &str) -> Option<Arc<Schema>> {
        let cache = self.inner.read();
        cache.peek(full_name).map(Arc::clone)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        *self.stats.read()
    }

    /// Evict the least recently used unpinned entry. Pinned entries keep
    /// their position in the recency order.
    fn free_slot(&self, cache: &mut LruCache<Arc<str>, Arc<Schema>>) -> bool {
        if cache.len() < cache.cap().get() {
            return true;
        }
        let victim = cache
            .iter()
            .rev()
            .map(|(key, _)| key)
            .find(|key| !self.pinned.contains(*key))
            .map(Arc::clone);
        match victim {
            Some(key) => {
                cache.pop(&key);
                log::trace!("[cache] evicted {}", key);
                true
            }
            None => false,
        }
    }

    fn record_hit(&self) {
        self.stats.write().hits += 1;
    }

    fn record_miss(&self, start: Instant) {
        let elapsed = start.elapsed().as_nanos();
        let mut stats = self.stats.write();
        stats.misses += 1;
        stats.last_miss_ns = u64::try_from(elapsed).unwrap_or(u64::MAX);
    }
}
