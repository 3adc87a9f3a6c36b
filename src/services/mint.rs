// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Server-signed NFT minting.
//!
//! ## Flow
//!
//! `Resolving → Probing → NonceFetching → Building → Signing → Broadcasting`
//! ending in [`MintResult::Success`] or [`MintResult::Failure`]. Nothing is
//! retried or resubmitted.
//!
//! ## Nonces
//!
//! Nonce fetch through broadcast runs under a mutex keyed by signer address,
//! so concurrent mints from one key never claim the same nonce while mints
//! from different keys proceed in parallel. The critical section runs on its
//! own task: a caller that goes away stops waiting, but a broadcast already
//! under way still completes.

use std::fmt;
use std::sync::Arc;

use alloy::primitives::Address;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::blockchain::mint::MintTx;
use crate::blockchain::{ChainClientError, ChainConnector, MintResult, Network, NetworkBundle};
use crate::config::{NetworkBundles, UnknownNetworkPolicy};
use crate::error::GatewayError;
use crate::models::WalletAddress;

/// Stage of a mint, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintPhase {
    Resolving,
    Probing,
    NonceFetching,
    Building,
    Signing,
    Broadcasting,
}

impl fmt::Display for MintPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MintPhase::Resolving => "resolving",
            MintPhase::Probing => "probing",
            MintPhase::NonceFetching => "nonce_fetching",
            MintPhase::Building => "building",
            MintPhase::Signing => "signing",
            MintPhase::Broadcasting => "broadcasting",
        };
        f.write_str(name)
    }
}

/// Per-signer async mutexes.
#[derive(Default)]
pub struct SignerLocks {
    locks: DashMap<Address, Arc<Mutex<()>>>,
}

impl SignerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock guarding `signer`'s nonce sequence.
    pub fn lock_for(&self, signer: Address) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.entry(signer).or_default().value())
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Mint settings that do not depend on the network.
#[derive(Debug, Clone, Copy)]
pub struct MintSettings {
    pub gas_limit: u64,
    pub unknown_network_policy: UnknownNetworkPolicy,
}

/// Builds, signs and broadcasts mint transactions.
pub struct MintService {
    bundles: NetworkBundles,
    connector: Arc<dyn ChainConnector>,
    settings: MintSettings,
    locks: Arc<SignerLocks>,
}

impl MintService {
    pub fn new(
        bundles: NetworkBundles,
        connector: Arc<dyn ChainConnector>,
        settings: MintSettings,
    ) -> Self {
        Self {
            bundles,
            connector,
            settings,
            locks: Arc::new(SignerLocks::new()),
        }
    }

    /// Networks that have a complete bundle.
    pub fn configured_networks(&self) -> Vec<Network> {
        [Network::Primary, Network::Secondary]
            .into_iter()
            .filter(|n| self.bundles.get(*n).is_some())
            .collect()
    }

    /// Mint one token to `to_address` on `network` (primary when `None`).
    ///
    /// Never fails: every error is folded into [`MintResult::Failure`].
    pub async fn mint(&self, to_address: &str, network: Option<&str>) -> MintResult {
        match self.try_mint(to_address, network).await {
            Ok(tx_hash) => {
                tracing::info!(%tx_hash, to = %to_address, "Mint transaction broadcast");
                MintResult::Success { tx_hash }
            }
            Err((phase, reason)) => {
                tracing::warn!(
                    %phase,
                    code = reason.code(),
                    error = %reason,
                    to = %to_address,
                    "Mint failed"
                );
                MintResult::Failure { reason }
            }
        }
    }

    async fn try_mint(
        &self,
        to_address: &str,
        network: Option<&str>,
    ) -> Result<String, (MintPhase, GatewayError)> {
        let fail = |phase: MintPhase| move |reason: GatewayError| (phase, reason);

        // Resolving
        let bundle = self
            .resolve(network)
            .map_err(fail(MintPhase::Resolving))?
            .clone();
        let to = WalletAddress::from(to_address)
            .parse()
            .map_err(fail(MintPhase::Resolving))?;

        // Probing
        let client = self
            .connector
            .connect(&bundle.rpc_url)
            .map_err(|e| GatewayError::NetworkUnreachable(e.to_string()))
            .map_err(fail(MintPhase::Probing))?;
        let chain_id = client
            .chain_id()
            .await
            .map_err(|e| GatewayError::NetworkUnreachable(e.to_string()))
            .map_err(fail(MintPhase::Probing))?;

        let signer = bundle
            .signing_key
            .signer()
            .map_err(GatewayError::from)
            .map_err(fail(MintPhase::Signing))?;
        let signer_address = signer.address();

        tracing::debug!(
            network = %bundle.network,
            chain_id,
            signer = %signer_address,
            "Mint network resolved"
        );

        let lock = self.locks.lock_for(signer_address);
        let gas_limit = self.settings.gas_limit;

        // Detached so caller cancellation cannot interrupt a broadcast.
        let task = tokio::spawn(async move {
            let _guard = lock.lock_owned().await;

            let nonce = client
                .transaction_count(signer_address)
                .await
                .map_err(|e| (MintPhase::NonceFetching, read_failure(e)))?;
            let gas_price = client
                .gas_price()
                .await
                .map_err(|e| (MintPhase::NonceFetching, read_failure(e)))?;

            let tx = MintTx {
                chain_id,
                nonce,
                gas_price,
                gas_limit,
                contract: bundle.contract_address,
                to,
                token_uri: bundle.token_uri.clone(),
            };
            tracing::debug!(nonce, gas_price, gas_limit, "Mint transaction built");

            let raw = tx
                .sign(&signer)
                .map_err(|e| (MintPhase::Signing, GatewayError::from(e)))?;
            drop(signer);

            client
                .send_raw(&raw)
                .await
                .map_err(|e| (MintPhase::Broadcasting, broadcast_failure(e)))
        });

        task.await.map_err(|e| {
            (
                MintPhase::Broadcasting,
                GatewayError::UpstreamUnavailable(format!("mint task aborted: {e}")),
            )
        })?
    }

    fn resolve(&self, network: Option<&str>) -> Result<&NetworkBundle, GatewayError> {
        self.bundles
            .resolve(network, self.settings.unknown_network_policy)
    }

    /// Bundles this service mints with.
    pub fn bundles(&self) -> &NetworkBundles {
        &self.bundles
    }
}

fn read_failure(err: ChainClientError) -> GatewayError {
    GatewayError::UpstreamUnavailable(err.to_string())
}

fn broadcast_failure(err: ChainClientError) -> GatewayError {
    match err {
        ChainClientError::Rejected(msg) => GatewayError::BroadcastRejected(msg),
        other => GatewayError::UpstreamUnavailable(other.to_string()),
    }
}
