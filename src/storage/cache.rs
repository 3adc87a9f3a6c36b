// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Two-tier in-process TTL cache for chain reads.
//!
//! - **Snapshot tier**: address-independent scalars (gas price, block
//!   height), short TTL.
//! - **Response tier**: the fully composed [`AddressState`] per address,
//!   longer TTL, so repeated polling of one address skips the balance call too.
//!
//! Expiry uses `tokio::time::Instant`, so paused-clock tests can advance
//! time deterministically. There is no size bound: entries leave on read
//! after expiry or when the sweeper runs [`TieredCache::purge_expired`].

use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;

use crate::blockchain::AddressState;

/// Default TTL of the snapshot tier.
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(10);

/// Default TTL of the response tier.
pub const DEFAULT_RESPONSE_TTL: Duration = Duration::from_secs(30);

/// Cached value + absolute expiry.
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Thread-safe key/value cache with per-entry TTL.
pub struct TtlCache<K: Hash + Eq, V> {
    entries: Mutex<LruCache<K, CacheEntry<V>>>,
}

impl<K: Hash + Eq, V: Clone> TtlCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(LruCache::unbounded()),
        }
    }

    /// Lock the map, recovering it if a previous holder panicked.
    fn entries(&self) -> MutexGuard<'_, LruCache<K, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Cache lock poisoned by a panicked holder; recovering");
            self.entries.clear_poison();
            poisoned.into_inner()
        })
    }

    /// Get a live value. Returns `None` if absent or expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries();
        if let Some(entry) = entries.get(key) {
            if Instant::now() < entry.expires_at {
                return Some(entry.value.clone());
            }
            // Expired: remove it
            entries.pop(key);
        }
        None
    }

    /// Store a value for `ttl`, replacing any previous entry.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        self.entries().put(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    pub fn invalidate(&self, key: &K) {
        self.entries().pop(key);
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries();
        let now = Instant::now();
        let before = entries.len();
        // LruCache has no retain; rebuild from the live entries.
        let live: Vec<(K, CacheEntry<V>)> = std::mem::replace(&mut *entries, LruCache::unbounded())
            .into_iter()
            .filter(|(_, entry)| now < entry.expires_at)
            .collect();
        for (key, entry) in live {
            entries.put(key, entry);
        }
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Hash + Eq, V: Clone> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Keys of the snapshot tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKey {
    GasPrice,
    BlockNumber,
}

/// The two cache tiers plus their TTLs.
pub struct TieredCache {
    snapshot: TtlCache<SnapshotKey, u128>,
    responses: TtlCache<String, AddressState>,
    snapshot_ttl: Duration,
    response_ttl: Duration,
}

impl TieredCache {
    pub fn new(snapshot_ttl: Duration, response_ttl: Duration) -> Self {
        Self {
            snapshot: TtlCache::new(),
            responses: TtlCache::new(),
            snapshot_ttl,
            response_ttl,
        }
    }

    pub fn snapshot_ttl(&self) -> Duration {
        self.snapshot_ttl
    }

    pub fn response_ttl(&self) -> Duration {
        self.response_ttl
    }

    pub fn get_scalar(&self, key: SnapshotKey) -> Option<u128> {
        self.snapshot.get(&key)
    }

    pub fn set_scalar(&self, key: SnapshotKey, value: u128) {
        self.snapshot.set(key, value, self.snapshot_ttl);
    }

    /// Cached response for an address (case-insensitive).
    pub fn get_response(&self, address: &str) -> Option<AddressState> {
        self.responses.get(&address.to_lowercase())
    }

    pub fn set_response(&self, address: &str, state: AddressState) {
        self.responses
            .set(address.to_lowercase(), state, self.response_ttl);
    }

    /// Purge both tiers. Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        self.snapshot.purge_expired() + self.responses.purge_expired()
    }

    /// Number of cached address responses.
    pub fn response_count(&self) -> usize {
        self.responses.len()
    }
}

impl Default for TieredCache {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_TTL, DEFAULT_RESPONSE_TTL)
    }
}
