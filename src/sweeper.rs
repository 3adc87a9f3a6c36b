// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Cache Sweeper
//!
//! Expired entries are already ignored on read, but nothing else removes
//! them, so addresses queried once would stay in memory forever. This task
//! purges both cache tiers every `interval` (default: the snapshot TTL).
//!
//! ## Shutdown
//!
//! Stops when its `tokio_util::sync::CancellationToken` is cancelled.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::storage::TieredCache;

/// Background purger of expired cache entries.
pub struct CacheSweeper {
    cache: Arc<TieredCache>,
    interval: Duration,
}

impl CacheSweeper {
    pub fn new(cache: Arc<TieredCache>) -> Self {
        let interval = cache.snapshot_ttl().max(Duration::from_secs(1));
        Self { cache, interval }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run until the token is cancelled.
    ///
    /// ```rust,ignore
    /// tokio::spawn(sweeper.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(interval_secs = self.interval.as_secs(), "Cache sweeper starting");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Cache sweeper shutting down");
                    return;
                }
            }

            self.sweep();
        }
    }

    fn sweep(&self) {
        let purged = self.cache.purge_expired();
        if purged > 0 {
            debug!(
                purged,
                remaining = self.cache.response_count(),
                "Cache sweeper: purged expired entries"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::AddressState;

    fn state() -> AddressState {
        AddressState {
            gas_price: 1,
            block_number: 1,
            balance: "0".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_purges_expired_responses_and_stops_on_cancel() {
        let cache = Arc::new(TieredCache::new(
            Duration::from_secs(10),
            Duration::from_secs(30),
        ));
        cache.set_response("0xabc", state());

        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(CacheSweeper::new(Arc::clone(&cache)).run(shutdown.clone()));

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(cache.response_count(), 1);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(cache.response_count(), 0);

        shutdown.cancel();
        handle.await.unwrap();
    }
}
