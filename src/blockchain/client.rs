// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC chain client.
//!
//! [`ChainClient`] is the stateless façade the services talk to. Every
//! operation is exactly one remote call, bounded by a timeout, with no local
//! retry. [`RpcChainClient`] is the alloy-backed implementation; tests plug
//! in their own.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::{
    network::Ethereum,
    primitives::{Address, Bytes, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    rpc::types::TransactionRequest,
    transports::TransportError,
};
use async_trait::async_trait;
use tokio::time::timeout;

/// HTTP provider type (with the default fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Default per-call timeout.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote node operations used by the gateway.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current gas price in wei.
    async fn gas_price(&self) -> Result<u128, ChainClientError>;

    /// Latest block height.
    async fn block_number(&self) -> Result<u64, ChainClientError>;

    /// Native balance in wei.
    async fn balance_of(&self, address: Address) -> Result<U256, ChainClientError>;

    /// Transaction count including pending transactions (next nonce).
    async fn transaction_count(&self, address: Address) -> Result<u64, ChainClientError>;

    /// Chain ID reported by the node. Doubles as a liveness probe.
    async fn chain_id(&self) -> Result<u64, ChainClientError>;

    /// Broadcast an EIP-2718 encoded signed transaction, returning its hash.
    async fn send_raw(&self, signed_tx: &[u8]) -> Result<String, ChainClientError>;

    /// Read-only contract call (`eth_call` at the latest block).
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainClientError>;
}

/// Builds chain clients bound to an arbitrary endpoint.
///
/// The mint path connects to the endpoint of whichever network bundle was
/// selected, so it needs a factory rather than a fixed client.
pub trait ChainConnector: Send + Sync {
    fn connect(&self, rpc_url: &str) -> Result<Arc<dyn ChainClient>, ChainClientError>;
}

/// Connector producing [`RpcChainClient`]s with a shared timeout.
#[derive(Debug, Clone)]
pub struct RpcConnector {
    timeout: Duration,
}

impl RpcConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for RpcConnector {
    fn default() -> Self {
        Self::new(DEFAULT_RPC_TIMEOUT)
    }
}

impl ChainConnector for RpcConnector {
    fn connect(&self, rpc_url: &str) -> Result<Arc<dyn ChainClient>, ChainClientError> {
        Ok(Arc::new(RpcChainClient::new(rpc_url, self.timeout)?))
    }
}

/// Alloy HTTP client for a single RPC endpoint.
pub struct RpcChainClient {
    provider: HttpProvider,
    timeout: Duration,
}

impl RpcChainClient {
    /// Create a client for the given endpoint. Does not touch the network.
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self, ChainClientError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| ChainClientError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url);

        Ok(Self { provider, timeout })
    }

    /// Await an RPC future under the configured timeout.
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, ChainClientError>
    where
        F: std::future::IntoFuture<Output = Result<T, TransportError>>,
    {
        match timeout(self.timeout, fut.into_future()).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::debug!(op, error = %e, "RPC call failed");
                Err(ChainClientError::Unavailable(format!("{op}: {e}")))
            }
            Err(_) => {
                tracing::debug!(op, timeout_ms = self.timeout.as_millis() as u64, "RPC call timed out");
                Err(ChainClientError::Timeout(self.timeout))
            }
        }
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn gas_price(&self) -> Result<u128, ChainClientError> {
        self.bounded("eth_gasPrice", self.provider.get_gas_price()).await
    }

    async fn block_number(&self) -> Result<u64, ChainClientError> {
        self.bounded("eth_blockNumber", self.provider.get_block_number()).await
    }

    async fn balance_of(&self, address: Address) -> Result<U256, ChainClientError> {
        self.bounded("eth_getBalance", self.provider.get_balance(address)).await
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, ChainClientError> {
        self.bounded(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    async fn chain_id(&self) -> Result<u64, ChainClientError> {
        self.bounded("eth_chainId", self.provider.get_chain_id()).await
    }

    async fn send_raw(&self, signed_tx: &[u8]) -> Result<String, ChainClientError> {
        match timeout(self.timeout, self.provider.send_raw_transaction(signed_tx)).await {
            Ok(Ok(pending)) => Ok(format!("{:?}", pending.tx_hash())),
            // The node answered with a JSON-RPC error: it saw and refused the tx.
            Ok(Err(e)) if e.as_error_resp().is_some() => {
                Err(ChainClientError::Rejected(e.to_string()))
            }
            Ok(Err(e)) => Err(ChainClientError::Unavailable(format!(
                "eth_sendRawTransaction: {e}"
            ))),
            Err(_) => Err(ChainClientError::Timeout(self.timeout)),
        }
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ChainClientError> {
        let request = TransactionRequest::default().to(to).input(data.into());
        match timeout(self.timeout, self.provider.call(request).into_future()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) if e.as_error_resp().is_some() => {
                Err(ChainClientError::Reverted(e.to_string()))
            }
            Ok(Err(e)) => Err(ChainClientError::Unavailable(format!("eth_call: {e}"))),
            Err(_) => Err(ChainClientError::Timeout(self.timeout)),
        }
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainClientError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Chain unavailable: {0}")]
    Unavailable(String),

    #[error("RPC call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    /// The node answered an `eth_call` with an error, usually a revert.
    #[error("Call reverted: {0}")]
    Reverted(String),

    #[error("Malformed call result: {0}")]
    Decode(String),
}

impl ChainClientError {
    /// Transport-level failure: the node could not be reached or did not answer.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ChainClientError::Unavailable(_) | ChainClientError::Timeout(_))
    }
}
