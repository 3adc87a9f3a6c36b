// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Address-state queries over the tiered cache.
//!
//! ## Read path
//!
//! 1. Response tier hit → return as is (no RPC, no ledger write).
//! 2. Otherwise gas price and block height come from the snapshot tier,
//!    refreshed from the node on a miss.
//! 3. The balance is always read fresh; only the response tier caches it.
//! 4. The observation is handed to the ledger on a detached task, then the
//!    composed response is cached and returned.
//!
//! Upstream failures fail the whole query; no stale snapshot is served.

use std::sync::Arc;

use alloy::primitives::Address;

use crate::blockchain::{
    format_ether, AddressState, BalanceRecord, ChainClient, ChainClientError, ChainSnapshot,
};
use crate::error::GatewayError;
use crate::models::WalletAddress;
use crate::storage::{BalanceLedger, SnapshotKey, TieredCache};

/// Answers "what is address X's state" with as few node calls as possible.
pub struct BalanceQueryService {
    chain: Arc<dyn ChainClient>,
    cache: Arc<TieredCache>,
    ledger: Arc<dyn BalanceLedger>,
}

impl BalanceQueryService {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        cache: Arc<TieredCache>,
        ledger: Arc<dyn BalanceLedger>,
    ) -> Self {
        Self {
            chain,
            cache,
            ledger,
        }
    }

    pub fn cache(&self) -> &Arc<TieredCache> {
        &self.cache
    }

    pub fn ledger(&self) -> &Arc<dyn BalanceLedger> {
        &self.ledger
    }

    pub fn chain(&self) -> &Arc<dyn ChainClient> {
        &self.chain
    }

    /// Current state of `address`.
    ///
    /// The address is validated before any cache or network access.
    pub async fn get_state(&self, address: &str) -> Result<AddressState, GatewayError> {
        let parsed = WalletAddress::from(address).parse()?;

        if let Some(cached) = self.cache.get_response(address) {
            tracing::debug!(%address, "Address state served from response cache");
            return Ok(cached);
        }

        let snapshot = self.snapshot().await.map_err(upstream)?;
        let balance_wei = self.chain.balance_of(parsed).await.map_err(upstream)?;

        let state = AddressState {
            gas_price: snapshot.gas_price,
            block_number: snapshot.block_number,
            balance: format_ether(balance_wei),
        };

        self.record(BalanceRecord::new(parsed, balance_wei, snapshot));
        self.cache.set_response(address, state.clone());

        Ok(state)
    }

    /// Gas price and block height, from the snapshot tier when fresh.
    async fn snapshot(&self) -> Result<ChainSnapshot, ChainClientError> {
        let gas_price = match self.cache.get_scalar(SnapshotKey::GasPrice) {
            Some(value) => value,
            None => {
                let value = self.chain.gas_price().await?;
                self.cache.set_scalar(SnapshotKey::GasPrice, value);
                value
            }
        };

        // An out-of-range scalar is treated as a miss.
        let cached_block = self
            .cache
            .get_scalar(SnapshotKey::BlockNumber)
            .and_then(|value| u64::try_from(value).ok());
        let block_number = match cached_block {
            Some(value) => value,
            None => {
                let value = self.chain.block_number().await?;
                self.cache.set_scalar(SnapshotKey::BlockNumber, u128::from(value));
                value
            }
        };

        Ok(ChainSnapshot {
            gas_price,
            block_number,
        })
    }

    /// Fire-and-forget ledger write. Failures are logged and absorbed.
    fn record(&self, record: BalanceRecord) {
        let ledger = Arc::clone(&self.ledger);
        let address: Address = record.address;
        tokio::spawn(async move {
            if let Err(e) = ledger.upsert(record).await {
                let err = GatewayError::SinkFailure(e.to_string());
                tracing::warn!(%address, code = err.code(), error = %err, "Failed to persist balance observation");
            }
        });
    }
}

fn upstream(err: ChainClientError) -> GatewayError {
    tracing::warn!(error = %err, "Chain read failed");
    GatewayError::UpstreamUnavailable(err.to_string())
}
